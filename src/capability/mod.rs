//! Capability Registry
//!
//! Actions, resources and prompts, each a named handler with declared inputs and
//! display metadata.

pub mod descriptor;
pub mod registry;
pub mod shape;
pub mod uri_template;

pub use descriptor::{
    ActionAnnotations, ActionDescriptor, ActionHandler, ActionMetadata, Namespace,
    PromptDescriptor, PromptHandler, ResourceDescriptor, ResourceHandler, ResourceMetadata,
    ResourceRequest, ResourceUri,
};
pub use registry::{CapabilityRegistry, ResolvedResource};
pub use shape::{FieldError, FieldProblem, InputShape, ParamKind, ParamSpec, Params, ValidationError};
pub use uri_template::{Bindings, UriTemplate};
