use crate::report::model::{ExecutionReport, ReportInfo, TestRun, TestStep};
use crate::run::outcome::TestStatus;
use crate::run::recorder::RunSnapshot;
use chrono::Utc;
use std::collections::HashMap;

/// Aggregates a run snapshot into the wire report.
///
/// Outcomes are grouped by the issue key their test was tagged with; outcomes
/// of untagged tests are dropped. Steps within a key are emitted passed-first,
/// then failed, then skipped, preserving recorded order inside each class.
/// The aggregate status per key starts as PASSED and flips to FAILED when any
/// step failed; skips never change it.
pub fn build_report(snapshot: &RunSnapshot, plan_key: Option<&str>) -> ExecutionReport {
    let finish_date = snapshot.finished_at.unwrap_or_else(Utc::now);
    let start_date = snapshot.started_at.unwrap_or(finish_date);

    let mut key_order: Vec<String> = Vec::new();
    let mut steps_by_key: HashMap<String, Vec<TestStep>> = HashMap::new();
    let mut failed_keys: HashMap<String, bool> = HashMap::new();

    for class in [TestStatus::Passed, TestStatus::Failed, TestStatus::Skipped] {
        for outcome in snapshot.outcomes.iter().filter(|o| o.status() == class) {
            let Some(key) = snapshot.keys.get(outcome.test_id()) else {
                tracing::trace!(test_id = outcome.test_id(), "outcome has no issue key; skipped");
                continue;
            };

            if !steps_by_key.contains_key(key) {
                key_order.push(key.clone());
            }
            if class == TestStatus::Failed {
                failed_keys.insert(key.clone(), true);
            }

            let steps = steps_by_key.entry(key.clone()).or_default();
            steps.push(TestStep {
                status: class.as_report_str().to_owned(),
                comment: outcome.test_id().to_owned(),
                actual_result: match class {
                    TestStatus::Failed => outcome.diagnostic().map(str::to_owned),
                    _ => None,
                },
            });
        }
    }

    let tests = key_order
        .into_iter()
        .map(|key| {
            let failed = failed_keys.get(&key).copied().unwrap_or(false);
            let steps = steps_by_key.remove(&key).unwrap_or_default();
            TestRun {
                status: if failed { "FAILED" } else { "PASSED" }.to_owned(),
                test_key: key,
                steps,
            }
        })
        .collect();

    ExecutionReport {
        info: ReportInfo {
            start_date,
            finish_date,
            test_plan_key: plan_key.map(str::to_owned),
        },
        tests,
    }
}
