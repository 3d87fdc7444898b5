use crate::support::server;
use roster::router::FailureReporting;
use roster::transport::{handle_line, serve};
use serde_json::{json, Value};

async fn exchange(input: &str) -> Vec<Value> {
    exchange_bytes(input.as_bytes()).await
}

async fn exchange_bytes(input: &[u8]) -> Vec<Value> {
    let s = server(FailureReporting::Flagged);
    let mut output: Vec<u8> = Vec::new();
    serve(&s.router, input, &mut output).await.unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn line(id: i64, method: &str, params: Value) -> String {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string()
}

#[tokio::test]
async fn test_requests_answered_in_receipt_order() {
    let create = json!({
        "name": "create-user",
        "arguments": {"name": "Ann", "email": "a@x.io", "address": "1 Main St", "phone": "555"}
    });
    let input = [
        line(1, "tools/call", create.clone()),
        String::new(),
        line(2, "tools/call", create),
        line(3, "resources/read", json!({"uri": "users://2/profile"})),
    ]
    .join("\n");

    let responses = exchange(&input).await;
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], json!(1));
    assert_eq!(
        responses[0]["result"]["content"][0],
        json!({"type": "text", "text": "User 1 created successfully"})
    );
    assert_eq!(
        responses[1]["result"]["content"][0]["text"],
        json!("User 2 created successfully")
    );
    let contents = &responses[2]["result"]["contents"][0];
    assert_eq!(contents["uri"], json!("users://2/profile"));
    assert_eq!(contents["mimeType"], json!("application/json"));
    let record: Value = serde_json::from_str(contents["text"].as_str().unwrap()).unwrap();
    assert_eq!(record["id"], json!(2));
}

#[tokio::test]
async fn test_invalid_utf8_line_gets_parse_error_and_loop_continues() {
    let mut input: Vec<u8> = b"\xff\xfe garbage\n".to_vec();
    input.extend_from_slice(line(2, "tools/list", Value::Null).as_bytes());
    input.extend_from_slice(b"\r\n");

    let responses = exchange_bytes(&input).await;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], json!(-32700));
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[1]["id"], json!(2));
    assert_eq!(responses[1]["result"]["tools"][0]["name"], json!("create-user"));
}

#[tokio::test]
async fn test_notifications_get_no_reply() {
    let input = [
        json!({"jsonrpc": "2.0", "method": "tools/list"}).to_string(),
        line(7, "prompts/list", json!({})),
    ]
    .join("\n");
    let responses = exchange(&input).await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], json!(7));
}

#[tokio::test]
async fn test_listings_describe_registered_capabilities() {
    let input = [
        line(1, "tools/list", Value::Null),
        line(2, "resources/list", Value::Null),
        line(3, "resources/templates/list", Value::Null),
        line(4, "prompts/list", Value::Null),
    ]
    .join("\n");
    let responses = exchange(&input).await;

    let tool = &responses[0]["result"]["tools"][0];
    assert_eq!(tool["name"], json!("create-user"));
    assert_eq!(tool["annotations"]["title"], json!("Create User"));
    assert_eq!(tool["annotations"]["openWorldHint"], json!(true));
    let required = tool["inputSchema"]["required"].as_array().unwrap();
    assert_eq!(required.len(), 4);
    assert_eq!(
        tool["inputSchema"]["properties"]["email"],
        json!({"type": "string", "description": "Email address", "minLength": 1})
    );

    let resources = responses[1]["result"]["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["uri"], json!("users://all"));

    let templates = responses[2]["result"]["resourceTemplates"].as_array().unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0]["uriTemplate"], json!("users://{userId}/profile"));

    let prompt = &responses[3]["result"]["prompts"][0];
    assert_eq!(prompt["name"], json!("generate-fake-user"));
    assert_eq!(prompt["arguments"][0]["name"], json!("name"));
    assert_eq!(prompt["arguments"][0]["required"], json!(true));
    assert_eq!(
        prompt["arguments"][0]["description"],
        json!("Name of the user to generate")
    );
}

#[test]
fn test_rejections_map_to_error_codes() {
    let s = server(FailureReporting::Flagged);

    let response = handle_line(&s.router, "not json").unwrap();
    assert_eq!(response.error.unwrap().code, -32700);

    let response = handle_line(&s.router, &line(1, "tools/remove", json!({}))).unwrap();
    assert_eq!(response.error.unwrap().code, -32601);

    let response = handle_line(
        &s.router,
        &line(2, "tools/call", json!({"name": "nope", "arguments": {}})),
    )
    .unwrap();
    let error = response.error.unwrap();
    assert_eq!(error.code, -32002);
    assert_eq!(error.data.unwrap()["namespace"], json!("action"));

    let response = handle_line(
        &s.router,
        &line(3, "tools/call", json!({"name": "create-user", "arguments": {"name": "Ann"}})),
    )
    .unwrap();
    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    let fields = error.data.unwrap()["fields"].as_array().unwrap().clone();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0], json!({"field": "email", "problem": "missing"}));
    assert!(!s.data_file.exists());
}
