// ABOUTME: HTTP collaborator used by the pipeline and by adapters for outbound requests.
// ABOUTME: Sends GET/POST requests, enforces a body size cap, raises on status, decodes text and JSON.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ExtractError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// A received response. The status is recorded, not judged.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Response {
    /// Fails with a Status error unless the status is 2xx.
    pub fn raise_for_status(self, op: &str) -> Result<Self, ExtractError> {
        if (200..300).contains(&self.status) {
            Ok(self)
        } else {
            Err(ExtractError::status(&self.url, op, self.status))
        }
    }

    /// Decode the body as text, using the content-type charset or detection.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self, op: &str) -> Result<T, ExtractError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ExtractError::decode(&self.url, op, Some(anyhow::anyhow!("invalid JSON: {}", e)))
        })
    }
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

fn check_url(url: &str, op: &str) -> Result<(), ExtractError> {
    if url.is_empty() {
        return Err(ExtractError::invalid_url(url, op, None));
    }
    let parsed = url::Url::parse(url).map_err(|e| {
        ExtractError::invalid_url(url, op, Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ExtractError::invalid_url(
            url,
            op,
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }
    Ok(())
}

/// Issue a GET request.
pub async fn get(
    client: &reqwest::Client,
    url: &str,
    headers: &HashMap<String, String>,
    op: &str,
) -> Result<Response, ExtractError> {
    check_url(url, op)?;
    let mut request = client.get(url);
    for (key, value) in headers {
        request = request.header(key, value);
    }
    send(request, url, op).await
}

/// Issue a POST request with a JSON body.
pub async fn post_json(
    client: &reqwest::Client,
    url: &str,
    body: &serde_json::Value,
    headers: &HashMap<String, String>,
    op: &str,
) -> Result<Response, ExtractError> {
    check_url(url, op)?;
    let payload = serde_json::to_vec(body).map_err(|e| {
        ExtractError::decode(url, op, Some(anyhow::anyhow!("invalid JSON body: {}", e)))
    })?;
    let mut request = client.post(url).body(payload);
    if !headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
        request = request.header("Content-Type", "application/json");
    }
    for (key, value) in headers {
        request = request.header(key, value);
    }
    send(request, url, op).await
}

async fn send(
    request: reqwest::RequestBuilder,
    url: &str,
    op: &str,
) -> Result<Response, ExtractError> {
    debug!(url, op, "sending request");
    let response = request.send().await.map_err(|e| {
        ExtractError::fetch(url, op, Some(anyhow::anyhow!("request failed: {}", e)))
    })?;

    // Check Content-Length header before reading body
    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(ExtractError::fetch(
                url,
                op,
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| {
        ExtractError::fetch(
            url,
            op,
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ExtractError::fetch(
            url,
            op,
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    debug!(url, op, status, bytes = body.len(), "response received");
    Ok(Response {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}
