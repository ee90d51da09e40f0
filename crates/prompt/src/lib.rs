//! Prompt system for the helpdesk pipeline.
//!
//! Every LLM stage is driven by a [`PromptDefinition`]: a system instruction
//! plus a Handlebars user template. Built-in definitions ship with the crate;
//! a workspace can override any of them with `.helpdesk/prompts/<id>.yml`.

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{builtin_prompt, load_prompt, PromptSet};
pub use types::{BuiltPrompt, PromptDefinition};

/// Prompt used by the analyze stage.
pub const ANALYZE_PROMPT_ID: &str = "helpdesk.analyze";

/// Prompt used by the filter stage.
pub const FILTER_PROMPT_ID: &str = "helpdesk.filter";

/// Prompt used by the answer stage.
pub const ANSWER_PROMPT_ID: &str = "helpdesk.answer";
