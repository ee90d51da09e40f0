//! Search command handler.
//!
//! Runs the keyword searcher against one domain without any completion calls.

use super::{truncate, with_data_dir};
use clap::Args;
use helpdesk_core::{config::AppConfig, AppError, AppResult};
use helpdesk_workflow::{CsvDataset, Domain, DomainSearcher};
use std::sync::Arc;

/// Search one domain dataset by keywords
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Domain to search (account, project, report, system)
    #[arg(short, long)]
    pub domain: Domain,

    /// Keywords to match
    #[arg(required = true)]
    pub keywords: Vec<String>,

    /// Directory holding the ds_<domain>.csv datasets, relative to the current directory
    #[arg(long)]
    pub data_dir: Option<std::path::PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");
        tracing::debug!("Search options: {:?}", self);

        let config = with_data_dir(config, self.data_dir.as_ref());
        let dataset = CsvDataset::from_config(&config);
        let searcher = DomainSearcher::new(Arc::new(dataset));

        let hits = searcher.search(self.domain, &self.keywords);

        if self.json {
            let json = serde_json::to_string_pretty(&hits)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
            return Ok(());
        }

        println!("=== SEARCH RESULTS ({} hits) ===", hits.len());
        for (i, hit) in hits.iter().enumerate() {
            println!("{}. [{}] {}", i + 1, hit.label, truncate(&hit.content, 80));
        }

        Ok(())
    }
}
