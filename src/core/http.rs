use std::{
    sync::Arc,
    time::Duration,
};

use reqwest::{
    cookie::Jar,
    header::{
        HeaderMap,
        HeaderValue,
        USER_AGENT,
    },
    Client,
    Response,
    Url,
};

use crate::core::PortalError;

pub fn http_client(jar: Arc<Jar>, timeout: Duration) -> Result<Client, PortalError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("teacher-portal/0.1 (+reqwest)"));

    Client::builder()
        .cookie_provider(jar)
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| PortalError::Custom(format!("HTTP client build failed: {e}")))
}

/// Parses the configured server address, making sure it ends with `/` so
/// relative joins stay under it.
pub fn base_url(address: &str) -> Result<Url, PortalError> {
    let trimmed = address.trim();
    let normalized =
        if trimmed.ends_with('/') { trimmed.to_string() } else { format!("{}/", trimmed) };

    let url = Url::parse(&normalized).map_err(|e| PortalError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PortalError::InvalidUrl(format!("unsupported scheme {}", other))),
    }
}

pub fn ensure_success(resp: &Response) -> Result<(), PortalError> {
    if !resp.status().is_success() {
        return Err(PortalError::Status { status: resp.status().as_u16(), url: resp.url().to_string() });
    }
    Ok(())
}
