//! Pipeline state and stage transitions.
//!
//! Stages never mutate the state they are given. Each returns a
//! [`StateDelta`]; the orchestrator merges it with [`PipelineState::apply`]
//! to get the next snapshot.

use crate::types::{Analysis, Domain, SearchHit, WorkflowResult};
use helpdesk_core::{AppError, AppResult};
use std::fmt;

/// Answer given when no dataset entry supports an answer.
pub const FALLBACK_ANSWER: &str = "I could not find information about this in the helpdesk \
knowledge base. Please contact the support team directly for further assistance.";

/// Pipeline stages. `Search` carries the partition chosen by routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Analyze,
    Search(Domain),
    Filter,
    Answer,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Analyze => f.write_str("analyze"),
            Stage::Search(domain) => write!(f, "search_{}", domain),
            Stage::Filter => f.write_str("filter"),
            Stage::Answer => f.write_str("answer"),
            Stage::Done => f.write_str("done"),
        }
    }
}

/// Everything accumulated during one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineState {
    pub question: String,
    pub analysis: Option<Analysis>,
    pub search_hits: Vec<SearchHit>,
    pub filtered: Vec<String>,
    pub answer: Option<String>,
}

/// Partial update produced by a stage. `None` fields leave the state as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDelta {
    pub analysis: Option<Analysis>,
    pub search_hits: Option<Vec<SearchHit>>,
    pub filtered: Option<Vec<String>>,
    pub answer: Option<String>,
}

impl StateDelta {
    pub fn with_analysis(analysis: Analysis) -> Self {
        Self {
            analysis: Some(analysis),
            ..Self::default()
        }
    }

    pub fn with_search_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            search_hits: Some(hits),
            ..Self::default()
        }
    }

    pub fn with_filtered(entries: Vec<String>) -> Self {
        Self {
            filtered: Some(entries),
            ..Self::default()
        }
    }

    pub fn with_answer(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..Self::default()
        }
    }

    /// Nothing relevant was found: clear the evidence and set the fallback answer.
    ///
    /// Both the zero-hit and the zero-relevant-entry cases end here.
    pub fn no_evidence() -> Self {
        Self {
            filtered: Some(Vec::new()),
            answer: Some(FALLBACK_ANSWER.to_string()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl PipelineState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    /// Merge a delta, producing the next snapshot.
    #[must_use]
    pub fn apply(mut self, delta: StateDelta) -> Self {
        if let Some(analysis) = delta.analysis {
            self.analysis = Some(analysis);
        }
        if let Some(hits) = delta.search_hits {
            self.search_hits = hits;
        }
        if let Some(filtered) = delta.filtered {
            self.filtered = filtered;
        }
        if let Some(answer) = delta.answer {
            self.answer = Some(answer);
        }
        self
    }

    /// Whether the answer has already been settled (fallback or generated).
    pub fn has_answer(&self) -> bool {
        self.answer.is_some()
    }

    /// Convert a finished state into the caller-facing result.
    pub fn into_result(self) -> AppResult<WorkflowResult> {
        let analysis = self
            .analysis
            .ok_or_else(|| AppError::Other("Pipeline finished without an analysis".to_string()))?;
        let answer = self
            .answer
            .ok_or_else(|| AppError::Other("Pipeline finished without an answer".to_string()))?;

        Ok(WorkflowResult {
            question: self.question,
            analysis,
            search_hits: self.search_hits,
            filtered: self.filtered,
            answer,
        })
    }
}
