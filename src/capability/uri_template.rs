//! URI templates with named placeholders, e.g. `users://{userId}/profile`.

use crate::error::ApiError;
use regex::Regex;
use std::collections::BTreeMap;

/// Placeholder values extracted from a matched URI
pub type Bindings = BTreeMap<String, String>;

/// Compiled URI template
///
/// A placeholder matches one or more characters up to the next `/`.
#[derive(Debug, Clone)]
pub struct UriTemplate {
    pattern: String,
    regex: Regex,
    placeholders: Vec<String>,
}

impl UriTemplate {
    pub fn parse(pattern: &str) -> Result<Self, ApiError> {
        let mut expr = String::from("^");
        let mut placeholders: Vec<String> = Vec::new();
        let mut rest = pattern;

        while let Some(open) = rest.find('{') {
            expr.push_str(&regex::escape(&rest[..open]));
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                ApiError::ConfigError(format!("Unclosed placeholder in URI template '{}'", pattern))
            })?;
            let name = &after[..close];
            if !is_placeholder_name(name) {
                return Err(ApiError::ConfigError(format!(
                    "Invalid placeholder '{{{}}}' in URI template '{}'",
                    name, pattern
                )));
            }
            if placeholders.iter().any(|p| p == name) {
                return Err(ApiError::ConfigError(format!(
                    "Placeholder '{}' repeated in URI template '{}'",
                    name, pattern
                )));
            }
            expr.push_str(&format!("(?P<{}>[^/]+)", name));
            placeholders.push(name.to_string());
            rest = &after[close + 1..];
        }
        if rest.contains('}') {
            return Err(ApiError::ConfigError(format!(
                "Unbalanced '}}' in URI template '{}'",
                pattern
            )));
        }
        expr.push_str(&regex::escape(rest));
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| {
            ApiError::ConfigError(format!("URI template '{}' failed to compile: {}", pattern, e))
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            placeholders,
        })
    }

    /// True when `pattern` contains placeholders and must be treated as a template
    pub fn is_templated(pattern: &str) -> bool {
        pattern.contains('{')
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Match `uri` against the template, extracting placeholder values
    pub fn matches(&self, uri: &str) -> Option<Bindings> {
        let caps = self.regex.captures(uri)?;
        let mut bindings = Bindings::new();
        for name in &self.placeholders {
            if let Some(m) = caps.name(name) {
                bindings.insert(name.clone(), m.as_str().to_string());
            }
        }
        Some(bindings)
    }
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
