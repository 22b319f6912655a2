use crate::api::client::ReportClient;
use crate::config::settings::Settings;
use crate::report::builder::build_report;
use crate::run::observer::RunObserver;
use crate::run::recorder::RunRecorder;
use anyhow::{Context, Result};

/// Coordinates one reporting run: owns the settings, the recorder handed to
/// the host harness, and the client used for the final submission.
pub struct Reporter {
    settings: Settings,
    recorder: RunRecorder,
    client: ReportClient,
}

/// Outcome of [`Reporter::finish`].
#[derive(Debug, Clone)]
pub struct SubmissionSummary {
    /// Issue keys that made it into the report.
    pub reported_keys: usize,
    /// Whether the report was actually posted.
    pub submitted: bool,
    /// Issue key of the created execution, when the service reported one.
    pub execution_key: Option<String>,
    /// Communication error swallowed by the failure policy, if any.
    pub suppressed_error: Option<String>,
}

impl Reporter {
    /// Builds the reporter and stamps the run start time.
    pub fn new(settings: Settings) -> Result<Self> {
        let client = ReportClient::from_settings(&settings)?;
        let recorder = RunRecorder::new();
        recorder.run_started();

        tracing::info!(
            flavor = ?settings.flavor(),
            plan_key = settings.plan_key().unwrap_or("<none>"),
            "reporting run started"
        );

        Ok(Self {
            settings,
            recorder,
            client,
        })
    }

    /// Shared handle the harness uses to tag tests and record outcomes.
    pub fn recorder(&self) -> RunRecorder {
        self.recorder.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Stamps the run end time, aggregates the report, and submits it.
    ///
    /// With no tagged outcomes the HTTP call is skipped entirely. When the
    /// fail-silently policy is set, communication errors are logged and
    /// surfaced through [`SubmissionSummary::suppressed_error`] instead of
    /// propagating.
    pub async fn finish(self) -> Result<SubmissionSummary> {
        self.recorder.run_finished();
        let snapshot = self.recorder.snapshot();
        let report = build_report(&snapshot, self.settings.plan_key());

        if report.tests.is_empty() {
            tracing::info!(
                outcomes = snapshot.outcomes.len(),
                "no tagged outcomes recorded; skipping submission"
            );
            return Ok(SubmissionSummary {
                reported_keys: 0,
                submitted: false,
                execution_key: None,
                suppressed_error: None,
            });
        }

        let reported_keys = report.tests.len();
        match self.client.submit(&report).await {
            Ok(receipt) => Ok(SubmissionSummary {
                reported_keys,
                submitted: true,
                execution_key: receipt.execution_key,
                suppressed_error: None,
            }),
            Err(err) if self.settings.fail_silently() => {
                let rendered = format!("{err:#}");
                tracing::warn!(
                    error = %rendered,
                    "report submission failed; ignoring per failure policy"
                );
                Ok(SubmissionSummary {
                    reported_keys,
                    submitted: false,
                    execution_key: None,
                    suppressed_error: Some(rendered),
                })
            }
            Err(err) => Err(err).context("report submission failed"),
        }
    }
}
