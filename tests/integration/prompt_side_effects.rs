use crate::support::{server, user_args};
use roster::router::{FailureReporting, Request};
use roster::store::UserStore;

#[test]
fn test_generate_fake_user_appends_once_per_name() {
    let s = server(FailureReporting::Flagged);

    let first = s.prompt("Mary Jane");
    assert_eq!(
        first,
        "Generate a fake user with the name Mary Jane. The user should have a realistic email, address, and phone number."
    );
    let users = s.store.load_all().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, 1);
    assert_eq!(users[0].email, "mary.jane.patel92@gmail.com");

    let second = s.prompt("Mary Jane");
    assert!(second.starts_with("User already exists: "));
    let echoed: serde_json::Value =
        serde_json::from_str(second.trim_start_matches("User already exists: ")).unwrap();
    assert_eq!(echoed["id"], serde_json::json!(1));
    assert_eq!(s.store.load_all().unwrap().len(), 1);
}

#[test]
fn test_existing_match_ignores_case_and_padding() {
    let s = server(FailureReporting::Flagged);
    s.create_user("Raj");

    let text = s.prompt("  rAJ ");
    assert!(text.starts_with("User already exists: "));
    assert!(text.contains("\"email\":\"raj@example.com\""));
    assert_eq!(s.store.load_all().unwrap().len(), 1);
}

#[test]
fn test_fake_user_takes_next_id_after_created_users() {
    let s = server(FailureReporting::Flagged);
    s.create_user("Ann");
    s.create_user("Bo");
    s.prompt("Cy");
    assert_eq!(s.store.find_by_name("cy").unwrap().unwrap().id, 3);
}

#[test]
fn test_rejected_prompt_writes_nothing() {
    let s = server(FailureReporting::Flagged);
    let err = s.router.handle(Request::GetPrompt {
        name: "generate-fake-user".to_string(),
        params: serde_json::Map::new(),
    });
    assert!(err.is_err());
    assert!(!s.data_file.exists());

    // extra fields are tolerated but not stored
    let mut params = user_args("Ann");
    params.insert("role".to_string(), serde_json::json!("admin"));
    s.router
        .handle(Request::InvokeAction {
            name: "create-user".to_string(),
            params,
        })
        .unwrap();
    let raw = std::fs::read_to_string(&s.data_file).unwrap();
    assert!(!raw.contains("admin"));
}
