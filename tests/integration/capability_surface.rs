use crate::support::{args, first_text, server, user_args};
use roster::capability::{FieldProblem, Namespace};
use roster::error::ApiError;
use roster::router::{FailureReporting, Request};
use roster::store::UserStore;
use serde_json::json;

#[test]
fn test_sequential_creates_assign_ids_from_one() {
    let s = server(FailureReporting::Flagged);
    for (i, name) in ["Ann", "Bo", "Cy", "Di", "Ed"].iter().enumerate() {
        let reply = s.create_user(name);
        assert_eq!(first_text(&reply), format!("User {} created successfully", i + 1));
    }

    let users = s.read("users://all");
    let ids: Vec<u64> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_users_resource_reads_empty_collection_when_file_absent() {
    let s = server(FailureReporting::Flagged);
    assert!(!s.data_file.exists());
    assert_eq!(s.read("users://all"), json!([]));
}

#[test]
fn test_user_details_returns_record_or_error_body() {
    let s = server(FailureReporting::Flagged);
    s.create_user("Ann");
    s.create_user("Bo");

    let record = s.read("users://2/profile");
    assert_eq!(record["id"], json!(2));
    assert_eq!(record["name"], json!("Bo"));
    assert_eq!(record["email"], json!("bo@example.com"));

    assert_eq!(s.read("users://9/profile"), json!({"error": "User not found"}));
    assert_eq!(s.read("users://abc/profile"), json!({"error": "User not found"}));
    assert_eq!(s.read("users://2x/profile"), json!({"error": "User not found"}));
}

#[test]
fn test_record_round_trips_through_store() {
    let s = server(FailureReporting::Flagged);
    s.create_user("Ann");
    let stored = s.store.find_by_id(1).unwrap().unwrap();
    let served = s.read("users://1/profile");
    assert_eq!(served, serde_json::to_value(&stored).unwrap());
}

#[test]
fn test_validation_rejection_has_no_side_effect() {
    let s = server(FailureReporting::Flagged);
    let mut params = user_args("Ann");
    params.insert("phone".to_string(), json!(12));
    params.insert("email".to_string(), json!(""));
    params.remove("address");

    let err = s
        .router
        .handle(Request::InvokeAction {
            name: "create-user".to_string(),
            params,
        })
        .unwrap_err();
    match err {
        ApiError::Validation(v) => {
            assert_eq!(v.capability, "create-user");
            let problems: Vec<(&str, &FieldProblem)> = v
                .fields
                .iter()
                .map(|f| (f.field.as_str(), &f.problem))
                .collect();
            assert!(problems.contains(&("email", &FieldProblem::Empty)));
            assert!(problems.contains(&("address", &FieldProblem::Missing)));
            assert!(problems
                .iter()
                .any(|(field, p)| *field == "phone" && matches!(p, FieldProblem::WrongType { .. })));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(!s.data_file.exists());
}

#[test]
fn test_unknown_names_are_not_found_per_namespace() {
    let s = server(FailureReporting::Flagged);
    let err = s
        .router
        .handle(Request::InvokeAction {
            name: "delete-user".to_string(),
            params: args(json!({})),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::NotFound {
            namespace: Namespace::Action,
            ..
        }
    ));

    // prompt names do not resolve as actions
    let err = s
        .router
        .handle(Request::InvokeAction {
            name: "generate-fake-user".to_string(),
            params: args(json!({"name": "Ann"})),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));

    let err = s
        .router
        .handle(Request::ReadResource {
            uri: "users://1/settings".to_string(),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::NotFound {
            namespace: Namespace::Resource,
            ..
        }
    ));
}

#[test]
fn test_collection_file_is_pretty_printed_array() {
    let s = server(FailureReporting::Flagged);
    s.create_user("Ann");
    let raw = std::fs::read_to_string(&s.data_file).unwrap();
    assert!(raw.starts_with("[\n  {\n    \"id\": 1,"));
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}
