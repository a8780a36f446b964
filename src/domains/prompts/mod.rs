//! Prompts domain module.
//!
//! Prompts are canned workflows. Each one renders a single user message that
//! tells the model which tools to call, and in which order, to reach a goal
//! such as onboarding a contact or opening a support ticket.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual workflow definitions (one file per prompt)
//! - `registry.rs` - Central prompt registration
//! - `service.rs` - Prompt service for listing and rendering
//! - `templates.rs` - Template rendering engine
//!
//! ## Adding a New Prompt
//!
//! 1. Create a new file in `definitions/` (e.g., `my_workflow.rs`)
//! 2. Implement the `PromptDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`

pub mod definitions;
mod error;
mod registry;
mod service;
pub mod templates;

pub use definitions::PromptDefinition;
pub use error::PromptError;
pub use registry::{get_all_prompts, prompt_names};
pub use service::PromptService;
pub use templates::PromptTemplate;
