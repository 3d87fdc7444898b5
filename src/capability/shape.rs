//! Declarative parameter shapes and request validation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Basic JSON type a parameter must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
}

impl ParamKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Integer => value.is_i64() || value.is_u64(),
        }
    }

    fn schema_type(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
        }
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
    /// Reject blank strings (only meaningful for `ParamKind::String`)
    pub non_empty: bool,
    pub description: Option<String>,
}

impl ParamSpec {
    /// Required, non-empty text parameter
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::String,
            required: true,
            non_empty: true,
            description: None,
        }
    }

    pub fn of_kind(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            non_empty: false,
            description: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// What is wrong with a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum FieldProblem {
    Missing,
    WrongType { expected: ParamKind },
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    #[serde(flatten)]
    pub problem: FieldProblem,
}

/// Structured rejection listing every offending field
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Invalid parameters for {capability}: {}", describe_fields(.fields))]
pub struct ValidationError {
    pub capability: String,
    pub fields: Vec<FieldError>,
}

fn describe_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| match &f.problem {
            FieldProblem::Missing => format!("'{}' is required", f.field),
            FieldProblem::WrongType { expected } => {
                format!("'{}' must be a {}", f.field, expected.schema_type())
            }
            FieldProblem::Empty => format!("'{}' must not be empty", f.field),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parameters that passed validation. Only declared names are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Map<String, Value>,
}

impl Params {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// Text parameter the shape guaranteed to be present
    pub fn require_text(&self, name: &str) -> Result<&str, crate::error::ApiError> {
        self.text(name).ok_or_else(|| {
            crate::error::ApiError::HandlerFailed(format!("parameter '{}' unavailable", name))
        })
    }
}

/// Expected parameters of an action or prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputShape {
    params: Vec<ParamSpec>,
}

impl InputShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Check `input` for presence, basic type and non-empty text
    pub fn validate(
        &self,
        capability: &str,
        input: &Map<String, Value>,
    ) -> Result<Params, ValidationError> {
        let mut values = Map::new();
        let mut fields = Vec::new();

        for spec in &self.params {
            let value = match input.get(&spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        fields.push(FieldError {
                            field: spec.name.clone(),
                            problem: FieldProblem::Missing,
                        });
                    }
                    continue;
                }
                Some(v) => v,
            };

            if !spec.kind.accepts(value) {
                fields.push(FieldError {
                    field: spec.name.clone(),
                    problem: FieldProblem::WrongType { expected: spec.kind },
                });
                continue;
            }

            if spec.non_empty && value.as_str().map(|s| s.trim().is_empty()).unwrap_or(false) {
                fields.push(FieldError {
                    field: spec.name.clone(),
                    problem: FieldProblem::Empty,
                });
                continue;
            }

            values.insert(spec.name.clone(), value.clone());
        }

        if fields.is_empty() {
            Ok(Params { values })
        } else {
            Err(ValidationError {
                capability: capability.to_string(),
                fields,
            })
        }
    }

    /// JSON Schema object describing the shape
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for spec in &self.params {
            let mut prop = json!({ "type": spec.kind.schema_type() });
            if let Some(desc) = &spec.description {
                prop["description"] = Value::String(desc.clone());
            }
            if spec.non_empty && spec.kind == ParamKind::String {
                prop["minLength"] = json!(1);
            }
            properties.insert(spec.name.clone(), prop);
        }
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> InputShape {
        InputShape::new()
            .with(ParamSpec::text("name"))
            .with(ParamSpec::of_kind("age", ParamKind::Integer).optional())
    }

    fn input(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_input_keeps_declared_fields_only() {
        let params = shape()
            .validate("t", &input(json!({"name": "Ann", "extra": true})))
            .unwrap();
        assert_eq!(params.text("name"), Some("Ann"));
        assert!(params.get("extra").is_none());
    }

    #[test]
    fn test_missing_required_field() {
        let err = shape().validate("t", &input(json!({}))).unwrap_err();
        assert_eq!(
            err.fields,
            vec![FieldError {
                field: "name".to_string(),
                problem: FieldProblem::Missing
            }]
        );
        assert!(err.to_string().contains("'name' is required"));
    }

    #[test]
    fn test_wrong_type_and_empty_reported_together() {
        let shape = shape().with(ParamSpec::text("email"));
        let err = shape
            .validate("t", &input(json!({"name": "  ", "age": "old", "email": 3})))
            .unwrap_err();
        assert_eq!(err.fields.len(), 3);
        assert_eq!(err.fields[0].problem, FieldProblem::Empty);
        assert_eq!(
            err.fields[1].problem,
            FieldProblem::WrongType {
                expected: ParamKind::Integer
            }
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let err = shape()
            .validate("t", &input(json!({"name": null})))
            .unwrap_err();
        assert_eq!(err.fields[0].problem, FieldProblem::Missing);
    }

    #[test]
    fn test_json_schema_lists_required() {
        let schema = shape().to_json_schema();
        assert_eq!(schema["required"], json!(["name"]));
        assert_eq!(schema["properties"]["age"]["type"], "integer");
        assert_eq!(schema["properties"]["name"]["minLength"], 1);
    }
}
