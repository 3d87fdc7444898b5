//! Capability registry: three namespaces keyed by name.
//!
//! Names are unique per namespace; a second registration under a taken name fails with
//! `DuplicateName`. Resources are resolved by URI: an exact fixed-URI match wins, then
//! templates are tried in registration order and the first match is taken.

use super::descriptor::{
    ActionDescriptor, Namespace, PromptDescriptor, ResourceDescriptor, ResourceUri,
};
use super::uri_template::Bindings;
use crate::error::ApiError;
use std::collections::HashMap;
use tracing::debug;

/// A resource resolved from a URI, with extracted placeholder values
pub struct ResolvedResource<'a> {
    pub descriptor: &'a ResourceDescriptor,
    pub bindings: Bindings,
}

pub struct CapabilityRegistry {
    actions: Vec<ActionDescriptor>,
    action_index: HashMap<String, usize>,
    resources: Vec<ResourceDescriptor>,
    resource_index: HashMap<String, usize>,
    /// Fixed URI -> index into `resources`
    fixed_uris: HashMap<String, usize>,
    /// Indices of templated resources in registration order
    templates: Vec<usize>,
    prompts: Vec<PromptDescriptor>,
    prompt_index: HashMap<String, usize>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            action_index: HashMap::new(),
            resources: Vec::new(),
            resource_index: HashMap::new(),
            fixed_uris: HashMap::new(),
            templates: Vec::new(),
            prompts: Vec::new(),
            prompt_index: HashMap::new(),
        }
    }

    pub fn register_action(&mut self, descriptor: ActionDescriptor) -> Result<(), ApiError> {
        if self.action_index.contains_key(&descriptor.name) {
            return Err(duplicate(Namespace::Action, &descriptor.name));
        }
        debug!(name = %descriptor.name, "Registered action");
        self.action_index
            .insert(descriptor.name.clone(), self.actions.len());
        self.actions.push(descriptor);
        Ok(())
    }

    pub fn register_resource(&mut self, descriptor: ResourceDescriptor) -> Result<(), ApiError> {
        if self.resource_index.contains_key(&descriptor.name) {
            return Err(duplicate(Namespace::Resource, &descriptor.name));
        }
        let index = self.resources.len();
        match &descriptor.uri {
            ResourceUri::Fixed(uri) => {
                // A second resource on the same URI would never be reachable
                if self.fixed_uris.contains_key(uri) {
                    return Err(duplicate(Namespace::Resource, uri));
                }
                self.fixed_uris.insert(uri.clone(), index);
            }
            ResourceUri::Template(_) => self.templates.push(index),
        }
        debug!(name = %descriptor.name, uri = descriptor.uri.as_str(), "Registered resource");
        self.resource_index.insert(descriptor.name.clone(), index);
        self.resources.push(descriptor);
        Ok(())
    }

    pub fn register_prompt(&mut self, descriptor: PromptDescriptor) -> Result<(), ApiError> {
        if self.prompt_index.contains_key(&descriptor.name) {
            return Err(duplicate(Namespace::Prompt, &descriptor.name));
        }
        debug!(name = %descriptor.name, "Registered prompt");
        self.prompt_index
            .insert(descriptor.name.clone(), self.prompts.len());
        self.prompts.push(descriptor);
        Ok(())
    }

    pub fn resolve_action(&self, name: &str) -> Result<&ActionDescriptor, ApiError> {
        self.action_index
            .get(name)
            .map(|&i| &self.actions[i])
            .ok_or_else(|| ApiError::not_found(Namespace::Action, name))
    }

    pub fn resolve_resource(&self, uri: &str) -> Result<ResolvedResource<'_>, ApiError> {
        if let Some(&i) = self.fixed_uris.get(uri) {
            return Ok(ResolvedResource {
                descriptor: &self.resources[i],
                bindings: Bindings::new(),
            });
        }
        for &i in &self.templates {
            let descriptor = &self.resources[i];
            if let ResourceUri::Template(template) = &descriptor.uri {
                if let Some(bindings) = template.matches(uri) {
                    return Ok(ResolvedResource {
                        descriptor,
                        bindings,
                    });
                }
            }
        }
        Err(ApiError::not_found(Namespace::Resource, uri))
    }

    pub fn resolve_prompt(&self, name: &str) -> Result<&PromptDescriptor, ApiError> {
        self.prompt_index
            .get(name)
            .map(|&i| &self.prompts[i])
            .ok_or_else(|| ApiError::not_found(Namespace::Prompt, name))
    }

    /// Actions in registration order
    pub fn list_actions(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.actions.iter()
    }

    /// Fixed-URI resources in registration order
    pub fn list_resources(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources
            .iter()
            .filter(|r| matches!(r.uri, ResourceUri::Fixed(_)))
    }

    /// Templated resources in registration (and resolution) order
    pub fn list_resource_templates(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.templates.iter().map(move |&i| &self.resources[i])
    }

    pub fn list_prompts(&self) -> impl Iterator<Item = &PromptDescriptor> {
        self.prompts.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len() + self.resources.len() + self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate(namespace: Namespace, name: &str) -> ApiError {
    ApiError::DuplicateName {
        namespace,
        name: name.to_string(),
    }
}
