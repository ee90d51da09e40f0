//! Prompt loader: built-in definitions with workspace overrides.

use crate::types::PromptDefinition;
use crate::{ANALYZE_PROMPT_ID, ANSWER_PROMPT_ID, FILTER_PROMPT_ID};
use helpdesk_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

const BUILTIN_PROMPTS: [(&str, &str); 3] = [
    (ANALYZE_PROMPT_ID, include_str!("../prompts/helpdesk.analyze.yml")),
    (FILTER_PROMPT_ID, include_str!("../prompts/helpdesk.filter.yml")),
    (ANSWER_PROMPT_ID, include_str!("../prompts/helpdesk.answer.yml")),
];

/// The three stage prompts a pipeline run needs.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub analyze: PromptDefinition,
    pub filter: PromptDefinition,
    pub answer: PromptDefinition,
}

impl PromptSet {
    /// Built-in prompts only.
    pub fn builtin() -> AppResult<Self> {
        Ok(Self {
            analyze: builtin_prompt(ANALYZE_PROMPT_ID)?,
            filter: builtin_prompt(FILTER_PROMPT_ID)?,
            answer: builtin_prompt(ANSWER_PROMPT_ID)?,
        })
    }

    /// Built-in prompts, each replaced by a workspace override when present.
    pub fn load(workspace_path: &Path) -> AppResult<Self> {
        Ok(Self {
            analyze: load_prompt(workspace_path, ANALYZE_PROMPT_ID)?,
            filter: load_prompt(workspace_path, FILTER_PROMPT_ID)?,
            answer: load_prompt(workspace_path, ANSWER_PROMPT_ID)?,
        })
    }
}

/// Parse one of the prompts compiled into the crate.
pub fn builtin_prompt(prompt_id: &str) -> AppResult<PromptDefinition> {
    let (_, source) = BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("No built-in prompt named {}", prompt_id)))?;

    let definition: PromptDefinition = serde_yaml::from_str(source).map_err(|e| {
        AppError::Prompt(format!("Failed to parse built-in prompt {}: {}", prompt_id, e))
    })?;

    validate_prompt(&definition)?;

    Ok(definition)
}

/// Load a prompt definition by ID.
///
/// Looks for `<workspace>/.helpdesk/prompts/<id>.yml` first and falls back
/// to the built-in definition.
///
/// # Example
/// ```no_run
/// use helpdesk_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "helpdesk.answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = override_path(workspace_path, prompt_id);

    if !prompt_file.exists() {
        tracing::debug!("No override at {:?}, using built-in {}", prompt_file, prompt_id);
        return builtin_prompt(prompt_id);
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    if definition.id != prompt_id {
        return Err(AppError::Prompt(format!(
            "Prompt file {:?} declares id {} but was loaded as {}",
            prompt_file, definition.id, prompt_id
        )));
    }

    tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);

    Ok(definition)
}

fn override_path(workspace_path: &Path, prompt_id: &str) -> PathBuf {
    workspace_path
        .join(".helpdesk/prompts")
        .join(format!("{}.yml", prompt_id))
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    // Validate API version format (simple check)
    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
