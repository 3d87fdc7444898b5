//! Server assembly: store, registry and router from configuration.

use crate::builtin::register_builtins;
use crate::capability::CapabilityRegistry;
use crate::config::RosterConfig;
use crate::error::ApiError;
use crate::router::{FailureReporting, Router};
use crate::store::{JsonFileStore, UserStore};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Build a router over `store` with every built-in capability registered
pub fn build_router(
    store: Arc<dyn UserStore>,
    failure_reporting: FailureReporting,
) -> Result<Router, ApiError> {
    let mut registry = CapabilityRegistry::new();
    register_builtins(&mut registry, store)?;
    Ok(Router::new(registry, failure_reporting))
}

/// Build the router described by `config`, resolving the data file against `working_dir`
pub fn from_config(config: &RosterConfig, working_dir: &Path) -> Result<Router, ApiError> {
    let data_file = config.storage.resolve_path(working_dir);
    info!(
        server = %config.server.name,
        version = %config.server.version,
        data_file = %data_file.display(),
        "Opening user collection"
    );
    let store: Arc<dyn UserStore> = Arc::new(JsonFileStore::new(data_file));
    build_router(store, config.router.failure_reporting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Namespace;
    use crate::router::Request;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_from_config_registers_every_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let router = from_config(&RosterConfig::default(), temp_dir.path()).unwrap();
        assert_eq!(router.registry().len(), 4);
        assert!(router.registry().resolve_action("create-user").is_ok());
        assert!(router.registry().resolve_prompt("generate-fake-user").is_ok());
        assert!(router.registry().resolve_resource("users://all").is_ok());
        assert!(router.registry().resolve_resource("users://3/profile").is_ok());
    }

    #[test]
    fn test_from_config_writes_relative_data_file_under_working_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = RosterConfig::default();
        config.storage.data_file = PathBuf::from("nested/users.json");
        let router = from_config(&config, temp_dir.path()).unwrap();

        let params = json!({
            "name": "Ann",
            "email": "ann@example.com",
            "address": "1 Main St",
            "phone": "555-0100"
        });
        router
            .handle(Request::InvokeAction {
                name: "create-user".to_string(),
                params: params.as_object().cloned().unwrap(),
            })
            .unwrap();
        assert!(temp_dir.path().join("nested/users.json").exists());
    }

    #[test]
    fn test_registering_builtins_twice_is_a_duplicate() {
        let temp_dir = TempDir::new().unwrap();
        let store: Arc<dyn UserStore> =
            Arc::new(JsonFileStore::new(temp_dir.path().join("users.json")));
        let mut registry = CapabilityRegistry::new();
        register_builtins(&mut registry, store.clone()).unwrap();
        let err = register_builtins(&mut registry, store).unwrap_err();
        assert!(matches!(
            err,
            ApiError::DuplicateName {
                namespace: Namespace::Action,
                ..
            }
        ));
        assert_eq!(registry.len(), 4);
    }
}
