//! Integration tests for the roster capability server

mod capability_surface;
mod prompt_side_effects;
mod stdio_transport;
mod storage_failures;
mod support;
