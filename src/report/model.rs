//! Serde model of the execution report: the exact JSON shape the import
//! endpoint accepts, assembled once per run and discarded after submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level execution report envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub info: ReportInfo,
    pub tests: Vec<TestRun>,
}

/// Run-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    pub start_date: DateTime<Utc>,
    pub finish_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_plan_key: Option<String>,
}

/// Aggregated result for one issue key. A key may cover several test
/// functions; each becomes a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    pub test_key: String,
    pub status: String,
    pub steps: Vec<TestStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    pub status: String,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_result: Option<String>,
}
