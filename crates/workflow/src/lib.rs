//! Helpdesk question-answering pipeline.
//!
//! A question flows through five stages:
//! - **analyze**: the completion service extracts keywords and a domain tag
//! - **route**: the tag selects one of four dataset partitions
//! - **search**: keyword overlap ranks the partition's entries
//! - **filter**: the completion service keeps only the relevant hits
//! - **answer**: the completion service writes the reply from those entries
//!
//! When nothing relevant is found the run ends with [`FALLBACK_ANSWER`]
//! instead of asking the model to answer without evidence.
//!
//! # Example
//! ```no_run
//! use helpdesk_core::AppConfig;
//! use helpdesk_workflow::HelpDeskWorkflow;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let workflow = HelpDeskWorkflow::from_config(&config)?;
//! let result = workflow.run("How do I reset my password?").await?;
//! println!("{}", result.answer);
//! # Ok(())
//! # }
//! ```

pub mod dataset;
pub mod matcher;
pub mod search;
pub mod state;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use dataset::{CsvDataset, RecordSource};
pub use search::{DomainSearcher, MAX_SEARCH_RESULTS};
pub use state::{PipelineState, Stage, StateDelta, FALLBACK_ANSWER};
pub use types::{Analysis, Domain, FilteredEntries, Record, SearchHit, WorkflowResult};
pub use workflow::{format_filtered, format_search_hits, route, HelpDeskWorkflow};
