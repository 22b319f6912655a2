//! Flat `KEY = value` secrets file parsing plus the file/environment/default
//! lookup chain used to populate credential-backed settings.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// Parsed contents of a secrets file.
///
/// The format is one `KEY = value` pair per line. Lines starting with `#` and
/// blank lines are ignored. Values keep their inner whitespace but are trimmed
/// at both ends.
#[derive(Debug, Default, Clone)]
pub struct SecretsFile {
    values: HashMap<String, String>,
}

impl SecretsFile {
    /// Loads and parses the secrets file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read secrets file {}", path.display()))?;
        Ok(Self::parse(&contents))
    }

    /// Loads the secrets file if it exists and is readable, otherwise returns
    /// an empty set so lookups fall through to the environment.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(secrets) => secrets,
            Err(err) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %err,
                    "secrets file unavailable; falling back to environment"
                );
                Self::default()
            }
        }
    }

    pub(crate) fn parse(contents: &str) -> Self {
        let mut values = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                values.insert(key.to_owned(), value.trim().to_owned());
            }
        }

        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolves a setting: secrets file entry first, then the environment
    /// variable of the same name, then `default`. Empty values are treated as
    /// absent at every stage.
    pub fn read_or_env(&self, key: &str, default: &str) -> String {
        if let Some(value) = self.get(key) {
            if !value.is_empty() {
                return value.to_owned();
            }
        }

        match env::var(key) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => default.to_owned(),
        }
    }
}
