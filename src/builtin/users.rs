//! User capabilities: create, list, detail and the fake-user prompt.

use super::Builtin;
use crate::capability::{
    ActionAnnotations, ActionDescriptor, ActionMetadata, InputShape, ParamSpec, Params,
    PromptDescriptor, ResourceDescriptor, ResourceMetadata,
};
use crate::envelope::{ContentBlock, PromptMessage, ResourceContents};
use crate::error::ApiError;
use crate::store::{Insertion, UserStore};
use crate::types::{NewUser, UserId};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

pub const ALL_USERS_URI: &str = "users://all";
pub const USER_DETAILS_URI: &str = "users://{userId}/profile";
pub const USER_NOT_FOUND: &str = "User not found";
pub const SAVE_FAILED: &str = "Failed to save user";

const FAKE_EMAIL_SUFFIX: &str = ".patel92@gmail.com";
const FAKE_ADDRESS: &str = "742 Evergreen Terrace, Springfield, IL";
const FAKE_PHONE: &str = "312-555-0198";

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::HandlerFailed(e.to_string()))
}

fn candidate_from(params: &Params) -> Result<NewUser, ApiError> {
    Ok(NewUser {
        name: params.require_text("name")?.to_string(),
        email: params.require_text("email")?.to_string(),
        address: params.require_text("address")?.to_string(),
        phone: params.require_text("phone")?.to_string(),
    })
}

/// Action `create-user`
pub fn create_user(store: Arc<dyn UserStore>) -> ActionDescriptor {
    let shape = InputShape::new()
        .with(ParamSpec::text("name").describe("Full name"))
        .with(ParamSpec::text("email").describe("Email address"))
        .with(ParamSpec::text("address").describe("Postal address"))
        .with(ParamSpec::text("phone").describe("Phone number"));
    let metadata = ActionMetadata {
        description: Some("Creates a new user in the database".to_string()),
        annotations: ActionAnnotations {
            title: Some("Create User".to_string()),
            read_only_hint: false,
            destructive_hint: false,
            idempotent_hint: false,
            open_world_hint: true,
        },
    };

    ActionDescriptor::new(Builtin::CreateUser.name(), shape, metadata, move |params| {
        let record = store.append(candidate_from(params)?)?;
        Ok(vec![ContentBlock::text(format!(
            "User {} created successfully",
            record.id
        ))])
    })
    .with_failure_text(SAVE_FAILED)
}

/// Resource `users`: the whole collection
pub fn all_users(store: Arc<dyn UserStore>) -> Result<ResourceDescriptor, ApiError> {
    let metadata = ResourceMetadata {
        title: Some("Users".to_string()),
        description: Some("Get all users from the database".to_string()),
        ..ResourceMetadata::default()
    };
    let descriptor = ResourceDescriptor::new(
        Builtin::Users.name(),
        ALL_USERS_URI,
        metadata,
        move |request| {
            let users = store.load_all()?;
            Ok(vec![ResourceContents::json(request.uri.clone(), to_json(&users)?)])
        },
    )?;
    Ok(descriptor.with_failure_text("Failed to load users"))
}

/// Resource `user-details`: one record by id, or an error body
pub fn user_details(store: Arc<dyn UserStore>) -> Result<ResourceDescriptor, ApiError> {
    let metadata = ResourceMetadata {
        title: Some("User Details".to_string()),
        description: Some("Get a user's details from the database".to_string()),
        ..ResourceMetadata::default()
    };
    let descriptor = ResourceDescriptor::new(
        Builtin::UserDetails.name(),
        USER_DETAILS_URI,
        metadata,
        move |request| {
            let user = match request
                .binding("userId")
                .and_then(|raw| raw.parse::<UserId>().ok())
            {
                Some(id) => store.find_by_id(id)?,
                None => None,
            };
            let text = match user {
                Some(user) => to_json(&user)?,
                None => json!({ "error": USER_NOT_FOUND }).to_string(),
            };
            Ok(vec![ResourceContents::json(request.uri.clone(), text)])
        },
    )?;
    Ok(descriptor.with_failure_text("Failed to load user"))
}

/// Deterministic placeholder record for `name`
pub fn fake_user(name: &str) -> NewUser {
    let local = name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".");
    NewUser {
        name: name.to_string(),
        email: format!("{}{}", local, FAKE_EMAIL_SUFFIX),
        address: FAKE_ADDRESS.to_string(),
        phone: FAKE_PHONE.to_string(),
    }
}

/// Prompt `generate-fake-user`
///
/// Appends a placeholder record when no user has this name. This prompt writes to the
/// store.
pub fn generate_fake_user(store: Arc<dyn UserStore>) -> PromptDescriptor {
    let shape =
        InputShape::new().with(ParamSpec::text("name").describe("Name of the user to generate"));
    PromptDescriptor::new(Builtin::GenerateFakeUser.name(), shape, move |params| {
        let name = params.require_text("name")?;
        let text = match store.append_unless_named(fake_user(name))? {
            Insertion::Existing(existing) => {
                format!("User already exists: {}", to_json(&existing)?)
            }
            Insertion::Created(_) => format!(
                "Generate a fake user with the name {}. The user should have a realistic email, address, and phone number.",
                name
            ),
        };
        Ok(vec![PromptMessage::user(text)])
    })
    .describe("Generate a fake user based on a given name")
    .with_failure_text("Failed to generate user")
}
