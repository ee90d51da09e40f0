//! Ask command handler.
//!
//! Reads a question from a file and runs it through the full pipeline.

use super::{resolve_cli_path, truncate, with_data_dir};
use clap::Args;
use helpdesk_core::{config::AppConfig, AppError, AppResult};
use helpdesk_llm::default_endpoint;
use helpdesk_workflow::{HelpDeskWorkflow, WorkflowResult};
use std::path::{Path, PathBuf};

/// Question file used when `--file` is not given, relative to the workspace.
const DEFAULT_QUESTION_FILE: &str = "prompts/question.txt";

/// Characters of each search hit shown in the summary.
const HIT_PREVIEW_CHARS: usize = 80;

/// Answer the question stored in a file
#[derive(Args, Debug)]
pub struct AskCommand {
    /// Question file, relative to the current directory
    /// (default: prompts/question.txt in the workspace)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Directory holding the ds_<domain>.csv datasets, relative to the current directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Output the full result as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let prompt_file = self.question_file(config);
        let question = read_question(&prompt_file)?;

        let config = with_data_dir(config, self.data_dir.as_ref());
        let workflow = HelpDeskWorkflow::from_config(&config)?;

        if !self.json {
            let endpoint = config
                .endpoint
                .as_deref()
                .or_else(|| default_endpoint(&config.provider))
                .unwrap_or("-");

            println!("Prompt file: {}", prompt_file.display());
            println!("Question: {}", question);
            println!("Model: {} ({})", workflow.model(), endpoint);
            println!();
        }

        let result = workflow.run(&question).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            print!("{}", render_summary(&result));
        }

        Ok(())
    }

    fn question_file(&self, config: &AppConfig) -> PathBuf {
        match &self.file {
            Some(file) => resolve_cli_path(file),
            None => config.workspace.join(DEFAULT_QUESTION_FILE),
        }
    }
}

/// Read and trim the question. Missing or blank files are input errors.
fn read_question(path: &Path) -> AppResult<String> {
    if !path.is_file() {
        return Err(AppError::Input(format!("Question file not found: {:?}", path)));
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::Input(format!("Failed to read question file {:?}: {}", path, e)))?;

    let question = contents.trim();
    if question.is_empty() {
        return Err(AppError::Input(format!("Question file is empty: {:?}", path)));
    }

    Ok(question.to_string())
}

fn render_summary(result: &WorkflowResult) -> String {
    let mut out = String::new();

    out.push_str("=== ANALYSIS ===\n");
    out.push_str(&format!("Data source: {}\n", result.analysis.domain));
    out.push_str(&format!("Keywords: {}\n", result.analysis.keywords.join(", ")));
    out.push('\n');

    out.push_str(&format!("=== SEARCH RESULTS ({} hits) ===\n", result.search_hits.len()));
    for (i, hit) in result.search_hits.iter().enumerate() {
        out.push_str(&format!(
            "{}. [{}] {}\n",
            i + 1,
            hit.label,
            truncate(&hit.content, HIT_PREVIEW_CHARS)
        ));
    }
    out.push('\n');

    out.push_str("=== FINAL ANSWER ===\n");
    if result.is_fallback() {
        out.push_str("(no relevant entries found)\n");
    }
    out.push_str(&result.answer);
    out.push('\n');

    out
}
