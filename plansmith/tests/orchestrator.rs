//! End-to-end orchestration scenarios with scripted models and stub
//! capability handlers.
//!
//! The model script inspects the submitted history the way a real
//! orchestrating model would: search first, then write, then validate, and
//! gate the final answer on the validation verdict.

use std::sync::Arc;

use serde_json::json;

use plansmith::prelude::*;
use plansmith_core::{ModelRequestPart, ModelResponse, ToolReturnPart};
use plansmith_tools::from_fn;

/// Stub handlers forming a deterministic pipeline: the report is derived
/// from the search result, and validation passes only when the report
/// mentions exclusions.
fn stub_registry(search_result: &'static str) -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();

    registry.register(
        SearchCapability::descriptor(),
        from_fn(move |args| async move {
            let plan = args["plan_name"].as_str().unwrap_or_default();
            Ok(format!("{plan}: {search_result}").into())
        }),
    );

    registry.register(
        ReportCapability::descriptor(),
        from_fn(|args| async move {
            let plan = args["plan_name"].as_str().unwrap_or_default().to_string();
            let info = args["plan_info"].as_str().unwrap_or_default().to_string();
            Ok(format!("Report for {plan}: {info}").into())
        }),
    );

    registry.register(
        ValidationCapability::descriptor(),
        from_fn(|args| async move {
            let report = args["report"].as_str().unwrap_or_default();
            let verdict = if report.contains("exclusions") {
                Verdict::Pass
            } else {
                Verdict::Fail
            };
            Ok(verdict.as_str().into())
        }),
    );

    registry
}

/// Collect tool returns from a history, in order.
fn tool_returns(history: &ConversationHistory) -> Vec<ToolReturnPart> {
    history
        .parts()
        .filter_map(|p| match p {
            ModelRequestPart::ToolReturn(t) => Some(t.clone()),
            _ => None,
        })
        .collect()
}

/// A model script that drives the search -> report -> validate pipeline and
/// gates the final answer on the validation verdict, like the real
/// orchestrating model is instructed to.
fn pipeline_model() -> FunctionModel {
    FunctionModel::new(|history, _| {
        let returns = tool_returns(history);
        let find = |name: &str| {
            returns
                .iter()
                .find(|t| t.tool_name == name)
                .map(|t| t.content.clone())
        };

        let plan_name = "Northwind Standard";

        let Some(plan_info) = find("search_plan_docs") else {
            return ModelResponse::tool_call("search_plan_docs", json!({"plan_name": plan_name}));
        };
        let Some(report) = find("write_report") else {
            return ModelResponse::tool_call(
                "write_report",
                json!({"plan_name": plan_name, "plan_info": plan_info}),
            );
        };
        let Some(verdict) = find("validate_report") else {
            return ModelResponse::tool_call("validate_report", json!({"report": report}));
        };

        if verdict == "Pass" {
            ModelResponse::text(
                serde_json::to_string(&TurnAnswer::report(report))
                    .expect("answer serializes"),
            )
        } else {
            ModelResponse::text(
                serde_json::to_string(&TurnAnswer::explanation(format!(
                    "The report for the {plan_name} health plan could not be generated \
                     as it did not meet the required validation standards."
                )))
                .expect("answer serializes"),
            )
        }
    })
}

fn orchestrator(registry: CapabilityRegistry) -> Orchestrator {
    Orchestrator::builder()
        .model(Arc::new(pipeline_model()))
        .registry(registry)
        .build()
        .expect("orchestrator builds")
}

#[tokio::test]
async fn full_pipeline_generates_validated_report() {
    let orchestrator = orchestrator(stub_registry(
        "covers primary care; coverage exclusions: cosmetic procedures",
    ));

    let mut history = ConversationHistory::new();
    let result = orchestrator
        .process_turn(&mut history, "Northwind Standard")
        .await
        .unwrap();

    assert!(result.answer.report_generated);
    assert_eq!(
        result.answer.content,
        "Report for Northwind Standard: Northwind Standard: covers primary care; \
         coverage exclusions: cosmetic procedures"
    );

    // The history preserved the exact dispatch order.
    let order: Vec<_> = tool_returns(&history)
        .iter()
        .map(|t| t.tool_name.clone())
        .collect();
    assert_eq!(
        order,
        vec!["search_plan_docs", "write_report", "validate_report"]
    );

    // Three capability rounds plus the final answer.
    assert_eq!(result.responses.len(), 4);
    assert_eq!(result.usage.capability_calls, 3);
}

#[tokio::test]
async fn failed_validation_gates_the_report() {
    // Search result without exclusions: the stub validator fails the report.
    let orchestrator = orchestrator(stub_registry("covers primary care only"));

    let mut history = ConversationHistory::new();
    let result = orchestrator
        .process_turn(&mut history, "Northwind Standard")
        .await
        .unwrap();

    assert!(!result.answer.report_generated);
    assert!(result.answer.content.contains("could not be generated"));

    // The report capability itself succeeded; only the gate said no.
    let returns = tool_returns(&history);
    assert!(returns
        .iter()
        .any(|t| t.tool_name == "write_report" && t.content.starts_with("Report for")));
    assert!(returns
        .iter()
        .any(|t| t.tool_name == "validate_report" && t.content == "Fail"));
}

#[tokio::test]
async fn report_content_tracks_search_result_deterministically() {
    let mut history_a = ConversationHistory::new();
    let result_a = orchestrator(stub_registry("details A; exclusions: X"))
        .process_turn(&mut history_a, "Northwind Standard")
        .await
        .unwrap();

    let mut history_b = ConversationHistory::new();
    let result_b = orchestrator(stub_registry("details B; exclusions: Y"))
        .process_turn(&mut history_b, "Northwind Standard")
        .await
        .unwrap();

    assert_ne!(result_a.answer.content, result_b.answer.content);
    assert!(result_a.answer.content.contains("details A"));
    assert!(result_b.answer.content.contains("details B"));
}

#[tokio::test]
async fn second_turn_reuses_the_same_history() {
    let orchestrator = orchestrator(stub_registry("plan text; exclusions: none listed"));

    let mut history = ConversationHistory::new();
    orchestrator
        .process_turn(&mut history, "Northwind Standard")
        .await
        .unwrap();
    let after_first = history.len();

    orchestrator
        .process_turn(&mut history, "Northwind Standard")
        .await
        .unwrap();

    // History only ever grows; the second turn appended to the first.
    assert!(history.len() > after_first);
    let system_prompts = history
        .parts()
        .filter(|p| matches!(p, ModelRequestPart::SystemPrompt(_)))
        .count();
    assert_eq!(system_prompts, 1);
}
