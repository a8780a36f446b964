//! Domains module containing business logic organized by bounded contexts.
//!
//! - `tools`: the remote API operations and the engine that executes them
//! - `prompts`: canned workflows that chain those tools

pub mod prompts;
pub mod tools;
