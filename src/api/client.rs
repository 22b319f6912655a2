//! Report client implementation: the authenticated call sequence against the
//! test-management service. Houses the `ReportClient`, the error taxonomy,
//! and the flavor-specific submission paths.

use crate::api::auth::{basic_auth_header, bearer_auth_header};
use crate::api::options::{ClientOptions, USER_AGENT};
use crate::config::settings::{ServiceFlavor, Settings};
use crate::report::model::ExecutionReport;
use anyhow::{anyhow, bail, Context, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::fmt;

const AUTHENTICATE_PATH: &str = "/api/v1/authenticate";
const CLOUD_IMPORT_PATH: &str = "/api/v1/import/execution";
const SERVER_IMPORT_PATH: &str = "/rest/raven/1.0/import/execution";

const BODY_PREVIEW_LIMIT: usize = 256;

/// Communication failures surfaced by the client, one variant per failure
/// class so callers can match on the cause.
#[derive(Debug)]
pub enum ApiError {
    AuthRejected { status: u16 },
    SubmissionRejected { status: u16 },
    JiraRejected { status: u16 },
    Timeout { endpoint: &'static str },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::AuthRejected { status } => {
                write!(f, "authentication rejected with HTTP status {status}")
            }
            ApiError::SubmissionRejected { status } => {
                write!(f, "execution import rejected with HTTP status {status}")
            }
            ApiError::JiraRejected { status } => {
                write!(f, "jira endpoint rejected the report with HTTP status {status}")
            }
            ApiError::Timeout { endpoint } => write!(f, "{endpoint} request timed out"),
        }
    }
}

impl std::error::Error for ApiError {}

/// What a successful submission looked like.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub flavor: ServiceFlavor,
    pub tests: usize,
    /// Issue key of the created execution, when the service reports one.
    pub execution_key: Option<String>,
}

/// Thin HTTP client that authenticates and posts one execution report.
#[derive(Debug, Clone)]
pub struct ReportClient {
    http: Client,
    settings: Settings,
}

impl ReportClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let options = ClientOptions {
            request_timeout: settings.request_timeout(),
            ..ClientOptions::default()
        };
        Self::with_options(settings, options)
    }

    pub fn with_options(settings: &Settings, options: ClientOptions) -> Result<Self> {
        settings.validate()?;
        options.validate()?;

        let http = Client::builder()
            .timeout(options.request_timeout)
            .connect_timeout(options.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| anyhow!("failed to build HTTP client: {err}"))?;

        Ok(Self {
            http,
            settings: settings.clone(),
        })
    }

    pub fn flavor(&self) -> ServiceFlavor {
        self.settings.flavor()
    }

    /// Submits the report through whichever flavor the settings select.
    pub async fn submit(&self, report: &ExecutionReport) -> Result<SubmitReceipt> {
        match self.settings.flavor() {
            ServiceFlavor::Cloud => self.submit_cloud(report).await,
            ServiceFlavor::Server => self.submit_server(report).await,
        }
    }

    /// Exchanges the cloud client id/secret for a bearer token.
    async fn authenticate(&self) -> Result<String> {
        let url = join_url(self.settings.xray_host(), AUTHENTICATE_PATH);
        let body = serde_json::json!({
            "client_id": self.settings.xray_client_id(),
            "client_secret": self.settings.xray_client_secret(),
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| map_transport_error("authenticate", err))?;

        let status = response.status();
        if !status.is_success() {
            let body = preview_body(response).await;
            tracing::error!(status = status.as_u16(), body = %body, "authentication rejected");
            return Err(ApiError::AuthRejected {
                status: status.as_u16(),
            }
            .into());
        }

        let token: String = response
            .json()
            .await
            .context("token response was not a JSON string")?;
        if token.is_empty() {
            bail!("authentication returned an empty token");
        }

        tracing::debug!("bearer token acquired");
        Ok(token)
    }

    async fn submit_cloud(&self, report: &ExecutionReport) -> Result<SubmitReceipt> {
        let token = self.authenticate().await?;
        let url = join_url(self.settings.xray_host(), CLOUD_IMPORT_PATH);

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, bearer_auth_header(&token)?)
            .json(report)
            .send()
            .await
            .map_err(|err| map_transport_error("import/execution", err))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::AuthRejected {
                status: status.as_u16(),
            }
            .into());
        }
        if !status.is_success() {
            let body = preview_body(response).await;
            tracing::error!(status = status.as_u16(), body = %body, "execution import rejected");
            return Err(ApiError::SubmissionRejected {
                status: status.as_u16(),
            }
            .into());
        }

        let execution_key = extract_execution_key(response).await;
        tracing::info!(
            tests = report.tests.len(),
            execution_key = execution_key.as_deref().unwrap_or("<none>"),
            "execution report imported"
        );

        Ok(SubmitReceipt {
            flavor: ServiceFlavor::Cloud,
            tests: report.tests.len(),
            execution_key,
        })
    }

    async fn submit_server(&self, report: &ExecutionReport) -> Result<SubmitReceipt> {
        let url = join_url(self.settings.jira_host(), SERVER_IMPORT_PATH);
        let header = basic_auth_header(self.settings.jira_user(), self.settings.jira_password())?;

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, header)
            .json(report)
            .send()
            .await
            .map_err(|err| map_transport_error("raven import", err))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::AuthRejected {
                status: status.as_u16(),
            }
            .into());
        }
        if !status.is_success() {
            let body = preview_body(response).await;
            tracing::error!(status = status.as_u16(), body = %body, "jira rejected the report");
            return Err(ApiError::JiraRejected {
                status: status.as_u16(),
            }
            .into());
        }

        let execution_key = extract_execution_key(response).await;
        tracing::info!(
            tests = report.tests.len(),
            execution_key = execution_key.as_deref().unwrap_or("<none>"),
            "execution report imported via jira"
        );

        Ok(SubmitReceipt {
            flavor: ServiceFlavor::Server,
            tests: report.tests.len(),
            execution_key,
        })
    }
}

fn map_transport_error(endpoint: &'static str, err: reqwest::Error) -> anyhow::Error {
    if err.is_timeout() {
        return ApiError::Timeout { endpoint }.into();
    }
    anyhow!("{endpoint} request failed: {err}")
}

fn join_url(host: &str, path: &str) -> String {
    format!("{}{}", host.trim_end_matches('/'), path)
}

/// Issue key of the created execution, read from either response shape
/// (`key` on the cloud service, `testExecIssue.key` behind Jira).
async fn extract_execution_key(response: Response) -> Option<String> {
    let value: Value = response.json().await.ok()?;
    value
        .get("key")
        .and_then(Value::as_str)
        .or_else(|| value.pointer("/testExecIssue/key").and_then(Value::as_str))
        .map(str::to_owned)
}

async fn preview_body(response: Response) -> String {
    match response.text().await {
        Ok(mut text) => {
            if text.len() > BODY_PREVIEW_LIMIT {
                let mut cut = BODY_PREVIEW_LIMIT;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
                text.push_str("...");
            }
            text
        }
        Err(_) => "<unreadable body>".to_owned(),
    }
}
