use roster::envelope::Reply;
use roster::router::{FailureReporting, Request, Router};
use roster::server::build_router;
use roster::store::{JsonFileStore, UserStore};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestServer {
    pub router: Router,
    pub data_file: PathBuf,
    pub store: Arc<JsonFileStore>,
    _temp_dir: TempDir,
}

pub fn server(reporting: FailureReporting) -> TestServer {
    let temp_dir = TempDir::new().unwrap();
    let data_file = temp_dir.path().join("data").join("users.json");
    let store = Arc::new(JsonFileStore::new(&data_file));
    let router = build_router(store.clone() as Arc<dyn UserStore>, reporting).unwrap();
    TestServer {
        router,
        data_file,
        store,
        _temp_dir: temp_dir,
    }
}

pub fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

pub fn user_args(name: &str) -> Map<String, Value> {
    args(json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "address": "1 Main St",
        "phone": "555-0100"
    }))
}

impl TestServer {
    pub fn create_user(&self, name: &str) -> Reply {
        self.router
            .handle(Request::InvokeAction {
                name: "create-user".to_string(),
                params: user_args(name),
            })
            .unwrap()
    }

    pub fn read(&self, uri: &str) -> Value {
        let reply = self
            .router
            .handle(Request::ReadResource {
                uri: uri.to_string(),
            })
            .unwrap();
        let contents = &reply.as_resource().unwrap().contents[0];
        assert_eq!(contents.uri, uri);
        assert_eq!(contents.mime_type, "application/json");
        serde_json::from_str(&contents.text).unwrap()
    }

    pub fn prompt(&self, name: &str) -> String {
        let reply = self
            .router
            .handle(Request::GetPrompt {
                name: "generate-fake-user".to_string(),
                params: args(json!({ "name": name })),
            })
            .unwrap();
        let prompt = reply.as_prompt().unwrap();
        assert_eq!(prompt.messages.len(), 1);
        prompt.messages[0].content.as_text().unwrap().to_string()
    }
}

pub fn first_text(reply: &Reply) -> &str {
    reply.as_action().unwrap().content[0].as_text().unwrap()
}
