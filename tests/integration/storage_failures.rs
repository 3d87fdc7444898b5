use crate::support::{first_text, server};
use roster::router::FailureReporting;
use roster::store::UserStore;
use serde_json::json;
use std::fs;

fn corrupt(path: &std::path::Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "{ not json").unwrap();
}

#[test]
fn test_create_on_corrupt_collection_is_flagged_failure() {
    let s = server(FailureReporting::Flagged);
    corrupt(&s.data_file);

    let reply = s.create_user("Ann");
    let action = reply.as_action().unwrap();
    assert_eq!(first_text(&reply), "Failed to save user");
    assert!(action.is_error);
    // the damaged file is left as found
    assert_eq!(fs::read_to_string(&s.data_file).unwrap(), "{ not json");
}

#[test]
fn test_text_reporting_leaves_failure_unflagged() {
    let s = server(FailureReporting::Text);
    corrupt(&s.data_file);

    let reply = s.create_user("Ann");
    assert_eq!(first_text(&reply), "Failed to save user");
    assert!(!reply.as_action().unwrap().is_error);
    let wire = serde_json::to_value(&reply).unwrap();
    assert!(wire.get("isError").is_none());
}

#[test]
fn test_resources_report_failure_text_in_body() {
    let s = server(FailureReporting::Flagged);
    corrupt(&s.data_file);

    assert_eq!(s.read("users://all"), json!({"error": "Failed to load users"}));
    assert_eq!(s.read("users://1/profile"), json!({"error": "Failed to load user"}));
}

#[test]
fn test_prompt_on_corrupt_collection_reports_failure_message() {
    let s = server(FailureReporting::Flagged);
    corrupt(&s.data_file);
    assert_eq!(s.prompt("Ann"), "Failed to generate user");
    assert!(s.store.load_all().is_err());
}

#[test]
fn test_recovery_after_file_is_repaired() {
    let s = server(FailureReporting::Flagged);
    corrupt(&s.data_file);
    s.create_user("Ann");
    fs::write(&s.data_file, "[]").unwrap();

    assert_eq!(first_text(&s.create_user("Ann")), "User 1 created successfully");
}
