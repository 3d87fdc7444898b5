//! Capability descriptors: name, input shape, display metadata and handler.

use super::shape::{InputShape, Params};
use super::uri_template::{Bindings, UriTemplate};
use crate::envelope::{ContentBlock, PromptMessage, ResourceContents, JSON_MIME_TYPE};
use crate::error::ApiError;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The three independent capability namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Action,
    Resource,
    Prompt,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Namespace::Action => "action",
            Namespace::Resource => "resource",
            Namespace::Prompt => "prompt",
        };
        f.write_str(s)
    }
}

/// Display hints for an action. Never consulted by routing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionAnnotations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub read_only_hint: bool,
    pub destructive_hint: bool,
    pub idempotent_hint: bool,
    /// The action may have effects outside this system
    pub open_world_hint: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionMetadata {
    pub description: Option<String>,
    pub annotations: ActionAnnotations,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub mime_type: String,
}

impl Default for ResourceMetadata {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            mime_type: JSON_MIME_TYPE.to_string(),
        }
    }
}

/// What a resource handler receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub uri: String,
    /// Placeholder values; empty for fixed-URI resources
    pub bindings: Bindings,
}

impl ResourceRequest {
    pub fn binding(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }
}

pub type ActionHandler = Arc<dyn Fn(&Params) -> Result<Vec<ContentBlock>, ApiError> + Send + Sync>;
pub type ResourceHandler =
    Arc<dyn Fn(&ResourceRequest) -> Result<Vec<ResourceContents>, ApiError> + Send + Sync>;
pub type PromptHandler =
    Arc<dyn Fn(&Params) -> Result<Vec<PromptMessage>, ApiError> + Send + Sync>;

const DEFAULT_FAILURE_TEXT: &str = "Request failed";

pub struct ActionDescriptor {
    pub name: String,
    pub input_shape: InputShape,
    pub metadata: ActionMetadata,
    /// Text replied in place of the handler's failure
    pub failure_text: String,
    pub handler: ActionHandler,
}

impl ActionDescriptor {
    pub fn new<F>(
        name: impl Into<String>,
        input_shape: InputShape,
        metadata: ActionMetadata,
        handler: F,
    ) -> Self
    where
        F: Fn(&Params) -> Result<Vec<ContentBlock>, ApiError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            input_shape,
            metadata,
            failure_text: DEFAULT_FAILURE_TEXT.to_string(),
            handler: Arc::new(handler),
        }
    }

    pub fn with_failure_text(mut self, text: impl Into<String>) -> Self {
        self.failure_text = text.into();
        self
    }
}

/// Fixed URI or templated pattern a resource answers to
#[derive(Debug, Clone)]
pub enum ResourceUri {
    Fixed(String),
    Template(UriTemplate),
}

impl ResourceUri {
    /// Parse `pattern`, compiling it as a template when it has placeholders
    pub fn parse(pattern: &str) -> Result<Self, ApiError> {
        if UriTemplate::is_templated(pattern) {
            Ok(ResourceUri::Template(UriTemplate::parse(pattern)?))
        } else {
            Ok(ResourceUri::Fixed(pattern.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ResourceUri::Fixed(uri) => uri,
            ResourceUri::Template(t) => t.pattern(),
        }
    }
}

pub struct ResourceDescriptor {
    pub name: String,
    pub uri: ResourceUri,
    pub metadata: ResourceMetadata,
    pub failure_text: String,
    pub handler: ResourceHandler,
}

impl ResourceDescriptor {
    pub fn new<F>(
        name: impl Into<String>,
        uri_pattern: &str,
        metadata: ResourceMetadata,
        handler: F,
    ) -> Result<Self, ApiError>
    where
        F: Fn(&ResourceRequest) -> Result<Vec<ResourceContents>, ApiError> + Send + Sync + 'static,
    {
        Ok(Self {
            name: name.into(),
            uri: ResourceUri::parse(uri_pattern)?,
            metadata,
            failure_text: DEFAULT_FAILURE_TEXT.to_string(),
            handler: Arc::new(handler),
        })
    }

    pub fn with_failure_text(mut self, text: impl Into<String>) -> Self {
        self.failure_text = text.into();
        self
    }
}

pub struct PromptDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub input_shape: InputShape,
    pub failure_text: String,
    pub handler: PromptHandler,
}

impl PromptDescriptor {
    pub fn new<F>(name: impl Into<String>, input_shape: InputShape, handler: F) -> Self
    where
        F: Fn(&Params) -> Result<Vec<PromptMessage>, ApiError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            input_shape,
            failure_text: DEFAULT_FAILURE_TEXT.to_string(),
            handler: Arc::new(handler),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_failure_text(mut self, text: impl Into<String>) -> Self {
        self.failure_text = text.into();
        self
    }
}
