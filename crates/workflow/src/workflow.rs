//! Helpdesk pipeline orchestration.
//!
//! analyze → route → search → filter → answer. Every stage reads the
//! current [`PipelineState`] and returns a [`StateDelta`]; [`HelpDeskWorkflow::run`]
//! drives the transitions. Completion-service errors end the run.

use crate::dataset::CsvDataset;
use crate::search::DomainSearcher;
use crate::state::{PipelineState, Stage, StateDelta};
use crate::types::{Analysis, Domain, FilteredEntries, SearchHit, WorkflowResult};
use helpdesk_core::{AppConfig, AppError, AppResult};
use helpdesk_llm::{complete_structured, create_client, LlmClient, LlmRequest};
use helpdesk_prompt::{build_prompt, PromptDefinition, PromptSet};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Instrument;

/// Map the analysis domain tag to its search partition.
///
/// Unknown tags are rejected rather than defaulted.
pub fn route(analysis: &Analysis) -> AppResult<Domain> {
    analysis.domain.parse()
}

/// Render search hits as one numbered, labeled block.
pub fn format_search_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("[{}] ({})\n{}", i + 1, hit.label, hit.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render filtered entries as one block.
pub fn format_filtered(entries: &[String]) -> String {
    entries.join("\n\n")
}

/// The helpdesk question-answering pipeline.
///
/// Holds only read-only collaborators, so one instance can serve
/// concurrent runs; each run builds its own state.
pub struct HelpDeskWorkflow {
    client: Arc<dyn LlmClient>,
    model: String,
    temperature: Option<f32>,
    prompts: PromptSet,
    searcher: DomainSearcher,
}

impl HelpDeskWorkflow {
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        prompts: PromptSet,
        searcher: DomainSearcher,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: None,
            prompts,
            searcher,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build the pipeline from application config.
    ///
    /// Fails with a configuration error before any stage can run if the
    /// provider or its credential cannot be resolved.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let api_key = config.resolve_api_key();
        let client = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            api_key.as_deref(),
        )?;
        let prompts = PromptSet::load(&config.workspace)?;
        let searcher = DomainSearcher::new(Arc::new(CsvDataset::from_config(config)));

        tracing::debug!(
            "Pipeline ready (provider: {}, model: {}, data: {:?})",
            config.provider,
            config.model,
            config.data_dir()
        );

        let workflow = Self::new(client, config.model.clone(), prompts, searcher);

        Ok(match config.temperature {
            Some(temperature) => workflow.with_temperature(temperature),
            None => workflow,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer a question end to end.
    pub async fn run(&self, question: &str) -> AppResult<WorkflowResult> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::Input("Question is empty".to_string()));
        }

        let mut state = PipelineState::new(question);
        let mut stage = Stage::Analyze;

        while stage != Stage::Done {
            let span = tracing::info_span!("stage", name = %stage);
            (state, stage) = self.step(state, stage).instrument(span).await?;
        }

        state.into_result()
    }

    /// Run one stage and pick its successor.
    pub(crate) async fn step(
        &self,
        state: PipelineState,
        stage: Stage,
    ) -> AppResult<(PipelineState, Stage)> {
        match stage {
            Stage::Analyze => {
                let delta = self.analyze(&state).await?;
                let state = state.apply(delta);
                let next = self.next_after_analyze(&state)?;
                Ok((state, next))
            }
            Stage::Search(domain) => {
                let delta = self.search(&state, domain);
                Ok((state.apply(delta), Stage::Filter))
            }
            Stage::Filter => {
                let delta = self.filter(&state).await?;
                Ok((state.apply(delta), Stage::Answer))
            }
            Stage::Answer => {
                let delta = self.answer(&state).await?;
                Ok((state.apply(delta), Stage::Done))
            }
            Stage::Done => Ok((state, Stage::Done)),
        }
    }

    fn next_after_analyze(&self, state: &PipelineState) -> AppResult<Stage> {
        let analysis = state
            .analysis
            .as_ref()
            .ok_or_else(|| AppError::Other("Routing requires an analysis".to_string()))?;

        let domain = route(analysis)?;
        tracing::info!("Routing to {}", Stage::Search(domain));

        Ok(Stage::Search(domain))
    }

    /// Stage 1: extract keywords and the domain tag.
    pub async fn analyze(&self, state: &PipelineState) -> AppResult<StateDelta> {
        tracing::info!("Analyzing question");

        let request = self.request(&self.prompts.analyze, [("question", state.question.clone())])?;
        let analysis: Analysis = complete_structured(self.client.as_ref(), request).await?;

        tracing::info!(
            "Analysis complete: keywords={:?}, data_source={}",
            analysis.keywords,
            analysis.domain
        );

        Ok(StateDelta::with_analysis(analysis))
    }

    /// Stage 2: keyword search over the routed partition. Never fails.
    pub fn search(&self, state: &PipelineState, domain: Domain) -> StateDelta {
        let keywords = state
            .analysis
            .as_ref()
            .map(|analysis| analysis.keywords.as_slice())
            .unwrap_or_default();

        tracing::info!("Searching {} data with keywords={:?}", domain, keywords);

        let hits = self.searcher.search(domain, keywords);

        tracing::info!("Search complete: {} hits", hits.len());

        StateDelta::with_search_hits(hits)
    }

    /// Stage 3: ask the model which hits are relevant.
    ///
    /// No hits, or no relevant entries, yields the fallback answer.
    pub async fn filter(&self, state: &PipelineState) -> AppResult<StateDelta> {
        if state.search_hits.is_empty() {
            tracing::info!("No search hits, skipping filter (fallback)");
            return Ok(StateDelta::no_evidence());
        }

        tracing::info!("Filtering {} search hits", state.search_hits.len());

        let request = self.request(
            &self.prompts.filter,
            [
                ("question", state.question.clone()),
                ("search_results", format_search_hits(&state.search_hits)),
            ],
        )?;
        let filtered: FilteredEntries = complete_structured(self.client.as_ref(), request).await?;

        let entries: Vec<String> = filtered
            .relevant_entries
            .into_iter()
            .filter(|entry| !entry.trim().is_empty())
            .collect();

        tracing::info!("Filter complete: {} relevant entries", entries.len());

        if entries.is_empty() {
            return Ok(StateDelta::no_evidence());
        }

        Ok(StateDelta::with_filtered(entries))
    }

    /// Stage 4: compose the final answer, unless one is already set.
    pub async fn answer(&self, state: &PipelineState) -> AppResult<StateDelta> {
        if state.has_answer() {
            tracing::info!("Answer already set, skipping generation");
            return Ok(StateDelta::default());
        }

        tracing::info!("Generating answer");

        let request = self.request(
            &self.prompts.answer,
            [
                ("question", state.question.clone()),
                ("filtered_data", format_filtered(&state.filtered)),
            ],
        )?;
        let response = self.client.complete(&request).await?;

        tracing::info!("Answer generated");

        Ok(StateDelta::with_answer(response.content.trim()))
    }

    fn request<const N: usize>(
        &self,
        definition: &PromptDefinition,
        variables: [(&str, String); N],
    ) -> AppResult<LlmRequest> {
        let variables: HashMap<String, String> = variables
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        let built = build_prompt(definition, variables)?;
        let mut request = LlmRequest::new(built.user, &self.model);

        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        Ok(request)
    }
}
