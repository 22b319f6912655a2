//! HTTP authentication helpers for wiring service credentials into request
//! headers.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use reqwest::header::HeaderValue;

pub(crate) fn basic_auth_header(user: &str, password: &str) -> Result<HeaderValue> {
    let credentials = format!("{user}:{password}");
    let encoded = BASE64_STANDARD.encode(credentials);
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .context("failed to build Authorization header")?;
    value.set_sensitive(true);
    Ok(value)
}

pub(crate) fn bearer_auth_header(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .context("failed to build Authorization header")?;
    value.set_sensitive(true);
    Ok(value)
}
