//! Built-in capability set, registered once at startup.

pub mod users;

use crate::capability::{CapabilityRegistry, Namespace};
use crate::error::ApiError;
use crate::store::UserStore;
use std::sync::Arc;

/// Every capability this server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    CreateUser,
    Users,
    UserDetails,
    GenerateFakeUser,
}

impl Builtin {
    pub const ALL: [Builtin; 4] = [
        Builtin::CreateUser,
        Builtin::Users,
        Builtin::UserDetails,
        Builtin::GenerateFakeUser,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::CreateUser => "create-user",
            Builtin::Users => "users",
            Builtin::UserDetails => "user-details",
            Builtin::GenerateFakeUser => "generate-fake-user",
        }
    }

    pub fn namespace(self) -> Namespace {
        match self {
            Builtin::CreateUser => Namespace::Action,
            Builtin::Users | Builtin::UserDetails => Namespace::Resource,
            Builtin::GenerateFakeUser => Namespace::Prompt,
        }
    }
}

/// Register every built-in against `store`. A `DuplicateName` here is a startup fault.
pub fn register_builtins(
    registry: &mut CapabilityRegistry,
    store: Arc<dyn UserStore>,
) -> Result<(), ApiError> {
    for builtin in Builtin::ALL {
        match builtin {
            Builtin::CreateUser => registry.register_action(users::create_user(store.clone()))?,
            Builtin::Users => registry.register_resource(users::all_users(store.clone())?)?,
            Builtin::UserDetails => {
                registry.register_resource(users::user_details(store.clone())?)?
            }
            Builtin::GenerateFakeUser => {
                registry.register_prompt(users::generate_fake_user(store.clone()))?
            }
        }
    }
    Ok(())
}
