//! Result model shared between pipeline stages.

use crate::state::FALLBACK_ANSWER;
use helpdesk_core::AppError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The four support domains, one dataset partition each.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Accounts, login, passwords, permissions
    Account,
    /// Projects, tasks, members, schedules
    Project,
    /// Reports, dashboards, exports
    Report,
    /// System settings, maintenance, integrations
    System,
}

impl Domain {
    pub const ALL: [Domain; 4] = [Domain::Account, Domain::Project, Domain::Report, Domain::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Account => "account",
            Domain::Project => "project",
            Domain::Report => "report",
            Domain::System => "system",
        }
    }

    /// File name of this domain's dataset partition.
    pub fn dataset_file(&self) -> String {
        format!("ds_{}.csv", self.as_str())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = AppError;

    /// Exact match on the lowercase tag; anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| {
                AppError::Routing(format!(
                    "Unknown domain '{}'. Expected one of: account, project, report, system",
                    s
                ))
            })
    }
}

/// Search keywords and the support domain of a helpdesk question.
// Doc comments here are sent to the model as the schema description. The
// tag stays a plain string so an unknown value reaches routing and fails there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Analysis {
    /// Search keywords extracted from the question
    pub keywords: Vec<String>,

    /// Domain the question belongs to
    #[serde(rename = "data_source")]
    #[schemars(with = "Domain")]
    pub domain: String,
}

impl Analysis {
    pub fn new(keywords: Vec<String>, domain: impl Into<String>) -> Self {
        Self {
            keywords,
            domain: domain.into(),
        }
    }
}

/// One row of a domain dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Source file name, e.g. `ds_account.csv`
    pub label: String,

    /// Normalized keyword set of the row
    pub keywords: BTreeSet<String>,

    pub content: String,
}

/// A record that matched the query keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub label: String,
    pub content: String,
}

impl From<Record> for SearchHit {
    fn from(record: Record) -> Self {
        Self {
            label: record.label,
            content: record.content,
        }
    }
}

/// Output of the filter stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilteredEntries {
    /// Entries needed to answer the question, copied from the search results
    pub relevant_entries: Vec<String>,
}

/// Final outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub question: String,
    pub analysis: Analysis,
    pub search_hits: Vec<SearchHit>,
    pub filtered: Vec<String>,
    pub answer: String,
}

impl WorkflowResult {
    /// Whether the run ended on the fallback answer.
    pub fn is_fallback(&self) -> bool {
        self.answer == FALLBACK_ANSWER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_round_trip_names() {
        for domain in Domain::ALL {
            assert_eq!(domain.as_str().parse::<Domain>().unwrap(), domain);
        }
        assert_eq!(Domain::Report.dataset_file(), "ds_report.csv");
    }

    #[test]
    fn test_domain_rejects_unknown() {
        assert!(matches!("billing".parse::<Domain>(), Err(AppError::Routing(_))));
        assert!("Account".parse::<Domain>().is_err());
        assert!("".parse::<Domain>().is_err());
    }

    #[test]
    fn test_analysis_wire_format() {
        let analysis: Analysis =
            serde_json::from_str(r#"{"keywords": ["password", "login"], "data_source": "account"}"#)
                .unwrap();
        assert_eq!(analysis.domain, "account");
        assert_eq!(analysis.keywords, vec!["password", "login"]);
    }

    #[test]
    fn test_schema_descriptions_are_plain_text() {
        for schema in [
            serde_json::to_value(schemars::schema_for!(Analysis)).unwrap(),
            serde_json::to_value(schemars::schema_for!(FilteredEntries)).unwrap(),
        ] {
            let text = schema.to_string();
            assert!(!text.contains("[`"), "rustdoc link in schema: {}", text);
            assert!(!text.contains("crate::"), "rustdoc path in schema: {}", text);
        }

        let schema = serde_json::to_value(schemars::schema_for!(Analysis)).unwrap();
        assert_eq!(
            schema["description"],
            "Search keywords and the support domain of a helpdesk question."
        );
    }

    #[test]
    fn test_analysis_schema_restricts_domain() {
        let schema = serde_json::to_value(schemars::schema_for!(Analysis)).unwrap();
        let text = schema.to_string();
        assert!(text.contains("data_source"));
        for domain in Domain::ALL {
            assert!(text.contains(domain.as_str()));
        }
    }
}
