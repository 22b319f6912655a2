use crate::config::secrets::SecretsFile;
use anyhow::{bail, Result};
use std::time::Duration;

/// Default host for the cloud-hosted service.
pub const DEFAULT_XRAY_HOST: &str = "https://xray.cloud.xpand-it.com";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Which authentication/endpoint pair a run submits through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFlavor {
    /// Cloud service: token exchange with client id/secret, bearer submission.
    Cloud,
    /// Jira-hosted service: basic auth submission against the Jira host.
    Server,
}

/// Process-wide reporting configuration.
///
/// All instances must be constructed via [`Settings::builder`] or
/// [`Settings::from_secrets`] so invariants are validated before any consumer
/// observes the values. Populated once at startup, read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    xray_host: String,
    xray_client_id: String,
    xray_client_secret: String,
    jira_host: String,
    jira_user: String,
    jira_password: String,
    plan_key: Option<String>,
    fail_silently: bool,
    request_timeout: Duration,
}

impl Settings {
    /// Returns a builder to incrementally construct and validate settings.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Returns a builder pre-populated from a secrets file, with every
    /// credential-backed field resolved as file entry, then environment
    /// variable of the same name, then default.
    pub fn from_secrets(secrets: &SecretsFile) -> SettingsBuilder {
        SettingsBuilder::default()
            .xray_host(secrets.read_or_env("XRAY_HOST", DEFAULT_XRAY_HOST))
            .xray_client_id(secrets.read_or_env("XRAY_CLIENT_ID", ""))
            .xray_client_secret(secrets.read_or_env("XRAY_CLIENT_SECRET", ""))
            .jira_host(secrets.read_or_env("JIRA_HOST", ""))
            .jira_user(secrets.read_or_env("JIRA_USER", ""))
            .jira_password(secrets.read_or_env("JIRA_PASSWORD", ""))
    }

    /// Base URL of the cloud service.
    pub fn xray_host(&self) -> &str {
        &self.xray_host
    }

    pub fn xray_client_id(&self) -> &str {
        &self.xray_client_id
    }

    pub fn xray_client_secret(&self) -> &str {
        &self.xray_client_secret
    }

    /// Base URL of the Jira host used by the server flavor.
    pub fn jira_host(&self) -> &str {
        &self.jira_host
    }

    pub fn jira_user(&self) -> &str {
        &self.jira_user
    }

    pub fn jira_password(&self) -> &str {
        &self.jira_password
    }

    /// Key of the issue representing the test plan being run, when configured.
    pub fn plan_key(&self) -> Option<&str> {
        self.plan_key.as_deref()
    }

    /// Whether communication errors are swallowed instead of propagated.
    pub fn fail_silently(&self) -> bool {
        self.fail_silently
    }

    /// Per-request timeout applied to the HTTP client.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Resolves which endpoint flavor the configured credentials select.
    ///
    /// Cloud credentials win when both halves are present; otherwise the
    /// Jira credential triple selects the server flavor.
    pub fn flavor(&self) -> ServiceFlavor {
        if !self.xray_client_id.is_empty() && !self.xray_client_secret.is_empty() {
            ServiceFlavor::Cloud
        } else {
            ServiceFlavor::Server
        }
    }

    /// Performs validation on an existing settings instance.
    pub fn validate(&self) -> Result<()> {
        validate_url(&self.xray_host, "XRAY_HOST")?;

        let cloud_ready = !self.xray_client_id.is_empty() && !self.xray_client_secret.is_empty();
        let server_ready = !self.jira_host.is_empty()
            && !self.jira_user.is_empty()
            && !self.jira_password.is_empty();

        if !cloud_ready && !server_ready {
            bail!(
                "no complete credential set: provide XRAY_CLIENT_ID/XRAY_CLIENT_SECRET \
                 or JIRA_HOST/JIRA_USER/JIRA_PASSWORD"
            );
        }

        if !cloud_ready && server_ready {
            validate_url(&self.jira_host, "JIRA_HOST")?;
        }

        if let Some(plan_key) = &self.plan_key {
            if plan_key.trim().is_empty() {
                bail!("plan key cannot be empty when set");
            }
        }

        if self.request_timeout.is_zero() {
            bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct SettingsBuilder {
    xray_host: Option<String>,
    xray_client_id: Option<String>,
    xray_client_secret: Option<String>,
    jira_host: Option<String>,
    jira_user: Option<String>,
    jira_password: Option<String>,
    plan_key: Option<String>,
    fail_silently: Option<bool>,
    request_timeout: Option<Duration>,
}

impl SettingsBuilder {
    pub fn xray_host(mut self, host: impl Into<String>) -> Self {
        self.xray_host = Some(host.into());
        self
    }

    pub fn xray_client_id(mut self, id: impl Into<String>) -> Self {
        self.xray_client_id = Some(id.into());
        self
    }

    pub fn xray_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.xray_client_secret = Some(secret.into());
        self
    }

    pub fn jira_host(mut self, host: impl Into<String>) -> Self {
        self.jira_host = Some(host.into());
        self
    }

    pub fn jira_user(mut self, user: impl Into<String>) -> Self {
        self.jira_user = Some(user.into());
        self
    }

    pub fn jira_password(mut self, password: impl Into<String>) -> Self {
        self.jira_password = Some(password.into());
        self
    }

    pub fn plan_key(mut self, key: impl Into<String>) -> Self {
        self.plan_key = Some(key.into());
        self
    }

    pub fn fail_silently(mut self, fail_silently: bool) -> Self {
        self.fail_silently = Some(fail_silently);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Settings> {
        let settings = Settings {
            xray_host: trimmed_string(self.xray_host.unwrap_or_else(|| DEFAULT_XRAY_HOST.into())),
            xray_client_id: trimmed_string(self.xray_client_id.unwrap_or_default()),
            xray_client_secret: trimmed_string(self.xray_client_secret.unwrap_or_default()),
            jira_host: trimmed_string(self.jira_host.unwrap_or_default()),
            jira_user: trimmed_string(self.jira_user.unwrap_or_default()),
            jira_password: trimmed_string(self.jira_password.unwrap_or_default()),
            plan_key: self.plan_key.map(trimmed_string),
            fail_silently: self.fail_silently.unwrap_or(true),
            request_timeout: self
                .request_timeout
                .unwrap_or_else(|| Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        };

        settings.validate()?;
        Ok(settings)
    }
}

/// Parses a yes/no style flag the way run scripts spell them.
pub fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" | "on" => Ok(true),
        "no" | "false" | "0" | "off" => Ok(false),
        other => bail!("cannot interpret '{other}' as a yes/no flag"),
    }
}

fn trimmed_string(value: String) -> String {
    value.trim().to_owned()
}

fn validate_url(url: &str, field: &str) -> Result<()> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("{field} must start with http:// or https://");
    }
    Ok(())
}
