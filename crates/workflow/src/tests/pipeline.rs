use super::{analysis_json, filtered_json, workflow, RecordingSource, ScriptedClient};
use crate::dataset::{CsvDataset, RecordSource};
use crate::state::{PipelineState, Stage, StateDelta, FALLBACK_ANSWER};
use crate::types::{Analysis, Domain, SearchHit};
use helpdesk_core::AppError;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const ACCOUNT_CSV: &str = "keywords,content
\"password,reset,login\",Use the reset link on the login page to set a new password.
\"account,create\",Accounts are created by an administrator.
\"login,sso\",Single sign-on is available for enterprise plans.
";

fn account_source() -> RecordingSource {
    RecordingSource::default().with_partition(
        Domain::Account,
        &[
            ("password,reset,login", "Use the reset link on the login page."),
            ("account,create", "Accounts are created by an administrator."),
        ],
    )
}

#[tokio::test]
async fn test_answers_from_csv_partition() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("ds_account.csv"), ACCOUNT_CSV).unwrap();

    let client = ScriptedClient::new([
        Ok(analysis_json(&["password", "login"], "account")),
        Ok(filtered_json(&[
            "Use the reset link on the login page to set a new password.",
        ])),
        Ok("  Open the login page and follow the reset link.  ".to_string()),
    ]);
    let source = Arc::new(CsvDataset::new(temp_dir.path()));
    let pipeline = workflow(client.clone(), source).with_temperature(0.0);

    let result = pipeline.run("How do I reset my password?").await.unwrap();

    assert_eq!(result.question, "How do I reset my password?");
    assert_eq!(result.analysis.domain, "account");
    assert_eq!(result.search_hits.len(), 2);
    assert_eq!(result.search_hits[0].label, "ds_account.csv");
    assert!(result.search_hits[0].content.starts_with("Use the reset link"));
    assert_eq!(result.filtered.len(), 1);
    assert_eq!(result.answer, "Open the login page and follow the reset link.");
    assert!(!result.is_fallback());

    let requests = client.requests();
    assert_eq!(requests.len(), 3);

    let analyze = &requests[0];
    assert_eq!(analyze.model, "test-model");
    assert_eq!(analyze.temperature, Some(0.0));
    assert!(analyze.system.is_some());
    assert!(analyze.prompt.contains("How do I reset my password?"));
    assert_eq!(analyze.response_schema.as_ref().unwrap().name, "Analysis");

    let filter = &requests[1];
    assert_eq!(filter.response_schema.as_ref().unwrap().name, "FilteredEntries");
    assert!(filter.prompt.contains("[1] (ds_account.csv)"));
    assert!(filter.prompt.contains("[2] (ds_account.csv)"));

    let answer = &requests[2];
    assert!(answer.response_schema.is_none());
    assert!(answer
        .prompt
        .contains("Use the reset link on the login page to set a new password."));
}

#[tokio::test]
async fn test_zero_hits_falls_back_without_filter_or_answer_calls() {
    let client = ScriptedClient::new([Ok(analysis_json(&["invoice"], "account"))]);
    let pipeline = workflow(client.clone(), Arc::new(account_source()));

    let result = pipeline.run("Where is my invoice?").await.unwrap();

    assert!(result.search_hits.is_empty());
    assert!(result.filtered.is_empty());
    assert_eq!(result.answer, FALLBACK_ANSWER);
    assert!(result.is_fallback());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_nothing_relevant_falls_back_without_answer_call() {
    let client = ScriptedClient::new([
        Ok(analysis_json(&["login"], "account")),
        Ok(filtered_json(&["", "  "])),
    ]);
    let pipeline = workflow(client.clone(), Arc::new(account_source()));

    let result = pipeline.run("Can I log in with my phone?").await.unwrap();

    assert_eq!(result.search_hits.len(), 1);
    assert!(result.filtered.is_empty());
    assert_eq!(result.answer, FALLBACK_ANSWER);
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_unknown_domain_is_a_routing_error() {
    let client = ScriptedClient::new([Ok(analysis_json(&["invoice"], "billing"))]);
    let source = Arc::new(account_source());
    let pipeline = workflow(client.clone(), source.clone());

    let result = pipeline.run("Why was I charged twice?").await;

    assert!(matches!(result, Err(AppError::Routing(_))));
    assert_eq!(client.calls(), 1);
    assert!(source.loaded().is_empty());
}

#[tokio::test]
async fn test_each_domain_searches_only_its_partition() {
    for domain in Domain::ALL {
        let source = Arc::new(
            Domain::ALL
                .into_iter()
                .fold(RecordingSource::default(), |source, d| {
                    source.with_partition(d, &[("shared", d.as_str())])
                }),
        );
        let client = ScriptedClient::new([
            Ok(analysis_json(&["shared"], domain.as_str())),
            Ok(filtered_json(&[domain.as_str()])),
            Ok(format!("From {}", domain)),
        ]);
        let pipeline = workflow(client.clone(), source.clone());

        let result = pipeline.run("Where is the shared setting?").await.unwrap();

        assert_eq!(source.loaded(), vec![domain]);
        assert_eq!(
            result.search_hits,
            vec![SearchHit {
                label: domain.dataset_file(),
                content: domain.as_str().to_string(),
            }]
        );
        assert_eq!(result.answer, format!("From {}", domain));
    }
}

#[tokio::test]
async fn test_missing_partition_falls_back() {
    let temp_dir = TempDir::new().unwrap();
    let client = ScriptedClient::new([Ok(analysis_json(&["backup"], "system"))]);
    let pipeline = workflow(client.clone(), Arc::new(CsvDataset::new(temp_dir.path())));

    let result = pipeline.run("When do backups run?").await.unwrap();

    assert_eq!(result.answer, FALLBACK_ANSWER);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_analyze_failure_ends_run() {
    let client = ScriptedClient::new([Err("service unavailable".to_string())]);
    let source = Arc::new(account_source());
    let pipeline = workflow(client.clone(), source.clone());

    let result = pipeline.run("How do I reset my password?").await;

    match result {
        Err(AppError::Llm(message)) => assert!(message.contains("service unavailable")),
        other => panic!("expected Llm error, got {:?}", other),
    }
    assert_eq!(client.calls(), 1);
    assert!(source.loaded().is_empty());
}

#[tokio::test]
async fn test_malformed_filter_response_is_an_llm_error() {
    let client = ScriptedClient::new([
        Ok(analysis_json(&["login"], "account")),
        Ok("these look relevant".to_string()),
    ]);
    let pipeline = workflow(client.clone(), Arc::new(account_source()));

    let result = pipeline.run("How do I log in?").await;

    assert!(matches!(result, Err(AppError::Llm(_))));
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_empty_question_rejected_before_any_call() {
    let client = ScriptedClient::new(Vec::<Result<String, String>>::new());
    let pipeline = workflow(client.clone(), Arc::new(account_source()));

    let result = pipeline.run("   \n").await;

    assert!(matches!(result, Err(AppError::Input(_))));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_concurrent_runs_share_one_pipeline() {
    let client = ScriptedClient::new([
        Ok(analysis_json(&["nothing"], "account")),
        Ok(analysis_json(&["nothing"], "account")),
    ]);
    let pipeline = Arc::new(workflow(client.clone(), Arc::new(account_source())));

    let (first, second) = tokio::join!(pipeline.run("first?"), pipeline.run("second?"));

    assert_eq!(first.unwrap().question, "first?");
    assert_eq!(second.unwrap().question, "second?");
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_analyze_step_keeps_state_and_routes() {
    let client = ScriptedClient::new([Ok(analysis_json(&["export", "csv"], "report"))]);
    let pipeline = workflow(client.clone(), Arc::new(account_source()));

    let (state, next) = pipeline
        .step(PipelineState::new("How do I export a report?"), Stage::Analyze)
        .await
        .unwrap();

    assert_eq!(next, Stage::Search(Domain::Report));
    assert_eq!(state.question, "How do I export a report?");
    assert_eq!(
        state.analysis,
        Some(Analysis::new(vec!["export".to_string(), "csv".to_string()], "report"))
    );
    assert!(state.search_hits.is_empty());
    assert!(!state.has_answer());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_filter_stage_short_circuits_on_no_hits() {
    let client = ScriptedClient::new(Vec::<Result<String, String>>::new());
    let pipeline = workflow(client.clone(), Arc::new(account_source()));

    let state = PipelineState::new("q")
        .apply(StateDelta::with_analysis(Analysis::new(vec!["x".to_string()], "account")));
    let delta = pipeline.filter(&state).await.unwrap();

    assert_eq!(delta, StateDelta::no_evidence());
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_answer_stage_keeps_existing_answer() {
    let client = ScriptedClient::new(Vec::<Result<String, String>>::new());
    let pipeline = workflow(client.clone(), Arc::new(account_source()));

    let state = PipelineState::new("q").apply(StateDelta::no_evidence());
    let delta = pipeline.answer(&state).await.unwrap();

    assert!(delta.is_empty());
    assert_eq!(state.apply(delta).answer.as_deref(), Some(FALLBACK_ANSWER));
    assert_eq!(client.calls(), 0);
}

#[test]
fn test_search_stage_uses_analysis_keywords() {
    let client = ScriptedClient::new(Vec::<Result<String, String>>::new());
    let source = Arc::new(account_source());
    let pipeline = workflow(client, source.clone() as Arc<dyn RecordSource>);

    let state = PipelineState::new("q").apply(StateDelta::with_analysis(Analysis::new(
        vec!["account".to_string(), "create".to_string()],
        "account",
    )));
    let delta = pipeline.search(&state, Domain::Account);

    let hits = delta.search_hits.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "Accounts are created by an administrator.");
    assert_eq!(source.loaded(), vec![Domain::Account]);
}
