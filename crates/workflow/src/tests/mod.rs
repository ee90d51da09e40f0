//! Pipeline tests against a scripted completion service.

mod pipeline;

use crate::dataset::RecordSource;
use crate::matcher::parse_keyword_cell;
use crate::search::DomainSearcher;
use crate::types::{Domain, Record};
use crate::workflow::HelpDeskWorkflow;
use helpdesk_core::{AppError, AppResult};
use helpdesk_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use helpdesk_prompt::PromptSet;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Completion client that replays queued responses and records every request.
pub(crate) struct ScriptedClient {
    responses: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new<I, S>(responses: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Result<S, S>>,
        S: Into<String>,
    {
        Arc::new(Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|r| r.map(Into::into).map_err(Into::into))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(content)) => Ok(LlmResponse {
                content,
                model: request.model.clone(),
                usage: LlmUsage::new(12, 8),
            }),
            Some(Err(message)) => Err(AppError::Llm(message)),
            None => Err(AppError::Llm("No scripted response left".to_string())),
        }
    }
}

/// In-memory partitions that remember which domains were loaded.
#[derive(Default)]
pub(crate) struct RecordingSource {
    partitions: HashMap<Domain, Vec<Record>>,
    loaded: Mutex<Vec<Domain>>,
}

impl RecordingSource {
    pub(crate) fn with_partition(mut self, domain: Domain, rows: &[(&str, &str)]) -> Self {
        let records = rows
            .iter()
            .map(|(keywords, content)| Record {
                label: domain.dataset_file(),
                keywords: parse_keyword_cell(keywords),
                content: content.to_string(),
            })
            .collect();
        self.partitions.insert(domain, records);
        self
    }

    pub(crate) fn loaded(&self) -> Vec<Domain> {
        self.loaded.lock().unwrap().clone()
    }
}

impl RecordSource for RecordingSource {
    fn load(&self, domain: Domain) -> AppResult<Vec<Record>> {
        self.loaded.lock().unwrap().push(domain);
        self.partitions
            .get(&domain)
            .cloned()
            .ok_or_else(|| AppError::Dataset(format!("No partition for {}", domain)))
    }
}

pub(crate) fn workflow(
    client: Arc<ScriptedClient>,
    source: Arc<dyn RecordSource>,
) -> HelpDeskWorkflow {
    HelpDeskWorkflow::new(
        client,
        "test-model",
        PromptSet::builtin().unwrap(),
        DomainSearcher::new(source),
    )
}

pub(crate) fn analysis_json(keywords: &[&str], data_source: &str) -> String {
    serde_json::json!({ "keywords": keywords, "data_source": data_source }).to_string()
}

pub(crate) fn filtered_json(entries: &[&str]) -> String {
    serde_json::json!({ "relevant_entries": entries }).to_string()
}
