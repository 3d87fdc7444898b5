//! JSON-RPC 2.0 mapping between wire messages and router requests.

use crate::capability::{ActionDescriptor, PromptDescriptor, ResourceDescriptor, ResourceUri};
use crate::error::ApiError;
use crate::router::{Request, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<JsonRpcId>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<JsonRpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC ID (string or number).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum JsonRpcId {
    String(String),
    Number(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<JsonRpcId>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<JsonRpcId>, code: i32, message: impl Into<String>) -> Self {
        Self::error_with_data(id, code, message, None)
    }

    pub fn error_with_data(
        id: Option<JsonRpcId>,
        code: i32,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data,
            }),
        }
    }
}

pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Capability (or resource URI) not registered
    pub const NOT_FOUND: i32 = -32002;
}

pub mod methods {
    pub const TOOLS_CALL: &str = "tools/call";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const RESOURCES_READ: &str = "resources/read";
    pub const RESOURCES_LIST: &str = "resources/list";
    pub const RESOURCE_TEMPLATES_LIST: &str = "resources/templates/list";
    pub const PROMPTS_GET: &str = "prompts/get";
    pub const PROMPTS_LIST: &str = "prompts/list";
}

/// Parse and handle one line. Returns `None` when no reply is owed.
pub fn handle_line(router: &Router, line: &str) -> Option<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            return Some(JsonRpcResponse::error(
                None,
                error_codes::PARSE_ERROR,
                format!("Parse error: {}", e),
            ))
        }
    };

    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::error(
            request.id,
            error_codes::INVALID_REQUEST,
            "Invalid JSON-RPC version",
        ));
    }

    // Notifications carry no id and get no reply
    let is_notification = request.id.is_none();
    let response = dispatch(router, request);
    if is_notification {
        debug!("Notification handled, no response sent");
        return None;
    }
    Some(response)
}

/// Dispatch a decoded JSON-RPC request.
pub fn dispatch(router: &Router, request: JsonRpcRequest) -> JsonRpcResponse {
    debug!(method = %request.method, "Dispatching");
    let id = request.id;
    let params = request.params.unwrap_or(Value::Null);

    let result = match request.method.as_str() {
        methods::TOOLS_LIST => Ok(list_tools(router)),
        methods::RESOURCES_LIST => Ok(list_resources(router)),
        methods::RESOURCE_TEMPLATES_LIST => Ok(list_resource_templates(router)),
        methods::PROMPTS_LIST => Ok(list_prompts(router)),
        methods::TOOLS_CALL | methods::RESOURCES_READ | methods::PROMPTS_GET => {
            match decode(&request.method, &params) {
                Ok(decoded) => route(router, decoded),
                Err(message) => {
                    return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, message)
                }
            }
        }
        other => {
            return JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )
        }
    };

    match result {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => rejection(id, e),
    }
}

/// Decode the params of a call method into a router request
pub fn decode(method: &str, params: &Value) -> Result<Request, String> {
    let field = |key: &str| -> Result<String, String> {
        params
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| format!("Missing string parameter '{}'", key))
    };
    let arguments = || -> Result<Map<String, Value>, String> {
        match params.get("arguments") {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(_) => Err("'arguments' must be an object".to_string()),
        }
    };

    match method {
        methods::TOOLS_CALL => Ok(Request::InvokeAction {
            name: field("name")?,
            params: arguments()?,
        }),
        methods::RESOURCES_READ => Ok(Request::ReadResource { uri: field("uri")? }),
        methods::PROMPTS_GET => Ok(Request::GetPrompt {
            name: field("name")?,
            params: arguments()?,
        }),
        other => Err(format!("Method not found: {}", other)),
    }
}

fn route(router: &Router, request: Request) -> Result<Value, ApiError> {
    let reply = router.handle(request)?;
    serde_json::to_value(reply).map_err(|e| ApiError::HandlerFailed(e.to_string()))
}

fn rejection(id: Option<JsonRpcId>, error: ApiError) -> JsonRpcResponse {
    match &error {
        ApiError::NotFound { namespace, name } => JsonRpcResponse::error_with_data(
            id,
            error_codes::NOT_FOUND,
            error.to_string(),
            Some(json!({ "namespace": namespace, "name": name })),
        ),
        ApiError::Validation(validation) => JsonRpcResponse::error_with_data(
            id,
            error_codes::INVALID_PARAMS,
            error.to_string(),
            serde_json::to_value(validation).ok(),
        ),
        _ => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, error.to_string()),
    }
}

fn action_entry(descriptor: &ActionDescriptor) -> Value {
    let mut entry = json!({
        "name": descriptor.name,
        "inputSchema": descriptor.input_shape.to_json_schema(),
        "annotations": descriptor.metadata.annotations,
    });
    if let Some(description) = &descriptor.metadata.description {
        entry["description"] = json!(description);
    }
    entry
}

fn resource_entry(descriptor: &ResourceDescriptor) -> Value {
    let uri_key = match descriptor.uri {
        ResourceUri::Fixed(_) => "uri",
        ResourceUri::Template(_) => "uriTemplate",
    };
    let mut entry = json!({
        "name": descriptor.name,
        "mimeType": descriptor.metadata.mime_type,
    });
    entry[uri_key] = json!(descriptor.uri.as_str());
    if let Some(title) = &descriptor.metadata.title {
        entry["title"] = json!(title);
    }
    if let Some(description) = &descriptor.metadata.description {
        entry["description"] = json!(description);
    }
    entry
}

fn prompt_entry(descriptor: &PromptDescriptor) -> Value {
    let arguments: Vec<Value> = descriptor
        .input_shape
        .params()
        .iter()
        .map(|p| {
            let mut arg = json!({ "name": p.name, "required": p.required });
            if let Some(description) = &p.description {
                arg["description"] = json!(description);
            }
            arg
        })
        .collect();
    let mut entry = json!({ "name": descriptor.name, "arguments": arguments });
    if let Some(description) = &descriptor.description {
        entry["description"] = json!(description);
    }
    entry
}

fn list_tools(router: &Router) -> Value {
    let tools: Vec<Value> = router.registry().list_actions().map(action_entry).collect();
    json!({ "tools": tools })
}

fn list_resources(router: &Router) -> Value {
    let resources: Vec<Value> = router.registry().list_resources().map(resource_entry).collect();
    json!({ "resources": resources })
}

fn list_resource_templates(router: &Router) -> Value {
    let templates: Vec<Value> = router
        .registry()
        .list_resource_templates()
        .map(resource_entry)
        .collect();
    json!({ "resourceTemplates": templates })
}

fn list_prompts(router: &Router) -> Value {
    let prompts: Vec<Value> = router.registry().list_prompts().map(prompt_entry).collect();
    json!({ "prompts": prompts })
}
