//! Request Router
//!
//! Resolves a decoded request against the registry, validates its parameters, invokes
//! the handler exactly once and shapes the result into the namespace's reply envelope.
//!
//! Per request: `Received -> Validated -> Dispatched -> Completed`, or
//! `Received -> Rejected` when resolution or validation fails. A rejected request never
//! reaches a handler. A handler failure is not a rejection: it completes with a reply
//! carrying the capability's failure text.

use crate::capability::{CapabilityRegistry, Namespace, ResourceRequest};
use crate::envelope::{
    ActionReply, ContentBlock, PromptMessage, PromptReply, Reply, ResourceContents,
    ResourceReply,
};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, debug_span, warn};

/// Decoded request from the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    InvokeAction {
        name: String,
        params: Map<String, Value>,
    },
    ReadResource {
        uri: String,
    },
    GetPrompt {
        name: String,
        params: Map<String, Value>,
    },
}

impl Request {
    pub fn namespace(&self) -> Namespace {
        match self {
            Request::InvokeAction { .. } => Namespace::Action,
            Request::ReadResource { .. } => Namespace::Resource,
            Request::GetPrompt { .. } => Namespace::Prompt,
        }
    }

    /// Capability name, or URI for resources
    pub fn target(&self) -> &str {
        match self {
            Request::InvokeAction { name, .. } | Request::GetPrompt { name, .. } => name,
            Request::ReadResource { uri } => uri,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Validated,
    Dispatched,
    Completed,
    Rejected,
}

/// How handler failures show up in action replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureReporting {
    /// Failure text plus `isError: true`
    #[default]
    Flagged,
    /// Failure text only, indistinguishable from success without parsing
    Text,
}

pub struct Router {
    registry: CapabilityRegistry,
    failure_reporting: FailureReporting,
    sequence: AtomicU64,
}

impl Router {
    pub fn new(registry: CapabilityRegistry, failure_reporting: FailureReporting) -> Self {
        Self {
            registry,
            failure_reporting,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Route one request. `Err` is a rejection: `NotFound` or `Validation`.
    pub fn handle(&self, request: Request) -> Result<Reply, ApiError> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let span = debug_span!(
            "request",
            seq,
            namespace = %request.namespace(),
            capability = request.target()
        );
        let _entered = span.enter();
        transition(RequestState::Received);

        let result = match &request {
            Request::InvokeAction { name, params } => {
                self.invoke_action(name, params).map(Reply::Action)
            }
            Request::ReadResource { uri } => self.read_resource(uri).map(Reply::Resource),
            Request::GetPrompt { name, params } => self.get_prompt(name, params).map(Reply::Prompt),
        };

        match &result {
            Ok(_) => transition(RequestState::Completed),
            Err(e) => debug!(state = ?RequestState::Rejected, error = %e, "Request rejected"),
        }
        result
    }

    fn invoke_action(&self, name: &str, input: &Map<String, Value>) -> Result<ActionReply, ApiError> {
        let descriptor = self.registry.resolve_action(name)?;
        let params = descriptor.input_shape.validate(name, input)?;
        transition(RequestState::Validated);

        transition(RequestState::Dispatched);
        let reply = match (descriptor.handler)(&params) {
            Ok(content) => ActionReply {
                content,
                is_error: false,
            },
            Err(e) => {
                warn!(capability = name, error = %e, "Action handler failed");
                ActionReply {
                    content: vec![ContentBlock::text(descriptor.failure_text.clone())],
                    is_error: self.failure_reporting == FailureReporting::Flagged,
                }
            }
        };
        Ok(reply)
    }

    fn read_resource(&self, uri: &str) -> Result<ResourceReply, ApiError> {
        let resolved = self.registry.resolve_resource(uri)?;
        let descriptor = resolved.descriptor;
        // Resources declare no parameters; placeholder values are checked by the handler
        transition(RequestState::Validated);

        let request = ResourceRequest {
            uri: uri.to_string(),
            bindings: resolved.bindings,
        };
        transition(RequestState::Dispatched);
        let contents = match (descriptor.handler)(&request) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(capability = %descriptor.name, error = %e, "Resource handler failed");
                vec![ResourceContents {
                    uri: uri.to_string(),
                    text: json!({ "error": descriptor.failure_text }).to_string(),
                    mime_type: descriptor.metadata.mime_type.clone(),
                }]
            }
        };
        Ok(ResourceReply { contents })
    }

    fn get_prompt(&self, name: &str, input: &Map<String, Value>) -> Result<PromptReply, ApiError> {
        let descriptor = self.registry.resolve_prompt(name)?;
        let params = descriptor.input_shape.validate(name, input)?;
        transition(RequestState::Validated);

        transition(RequestState::Dispatched);
        let messages = match (descriptor.handler)(&params) {
            Ok(messages) => messages,
            Err(e) => {
                warn!(capability = name, error = %e, "Prompt handler failed");
                vec![PromptMessage::user(descriptor.failure_text.clone())]
            }
        };
        Ok(PromptReply {
            description: descriptor.description.clone(),
            messages,
        })
    }
}

fn transition(state: RequestState) {
    debug!(state = ?state, "Request state");
}
