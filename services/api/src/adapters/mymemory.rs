//! services/api/src/adapters/mymemory.rs
//!
//! This module contains the adapter for the MyMemory translation API.
//! It implements the `TranslationService` port from the `core` crate.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use storyland_core::ports::{PortError, PortResult, TranslationService};
use storyland_core::Language;
use tracing::debug;

//=========================================================================================
// Wire Format
//=========================================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    /// Sent as a number on success and sometimes as a string on errors.
    response_status: serde_json::Value,
    response_data: Option<MyMemoryData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryData {
    translated_text: Option<String>,
}

/// Extracts the translated text from a response body. Anything other than a
/// `responseStatus` of 200 with a non-empty `translatedText` is a failure.
fn parse_response(body: &str) -> PortResult<String> {
    let parsed: MyMemoryResponse = serde_json::from_str(body)
        .map_err(|e| PortError::Unexpected(format!("malformed translation response: {e}")))?;

    let status = match &parsed.response_status {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    if status != Some(200) {
        return Err(PortError::Unexpected(format!(
            "translation service returned status {}",
            parsed.response_status
        )));
    }

    parsed
        .response_data
        .and_then(|data| data.translated_text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| PortError::Unexpected("translation response had no text".to_string()))
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TranslationService` port using MyMemory.
#[derive(Clone)]
pub struct MyMemoryAdapter {
    client: reqwest::Client,
    endpoint: String,
}

impl MyMemoryAdapter {
    /// Creates a new `MyMemoryAdapter` that gives up on a request after `timeout`.
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, endpoint }
    }
}

//=========================================================================================
// `TranslationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TranslationService for MyMemoryAdapter {
    async fn translate(&self, text: &str, target: Language) -> PortResult<String> {
        let langpair = format!("{}|{}", Language::SOURCE.code(), target.code());
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Unexpected(format!(
                "translation request failed with HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let translated = parse_response(&body)?;
        debug!(%target, "Remote translation received");
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_success() {
        let body = r#"{"responseData":{"translatedText":"مرحبا","match":1},"responseStatus":200}"#;
        assert_eq!(parse_response(body).unwrap(), "مرحبا");
    }

    #[test]
    fn rejects_error_statuses_and_empty_text() {
        let quota = r#"{"responseData":{"translatedText":"MYMEMORY WARNING"},"responseStatus":"429"}"#;
        assert!(parse_response(quota).is_err());

        let empty = r#"{"responseData":{"translatedText":"  "},"responseStatus":200}"#;
        assert!(parse_response(empty).is_err());

        let missing = r#"{"responseStatus":200}"#;
        assert!(parse_response(missing).is_err());
    }

    #[test]
    fn rejects_malformed_bodies() {
        assert!(parse_response("<html>busy</html>").is_err());
    }

    #[test]
    fn string_status_of_200_is_success() {
        let body = r#"{"responseData":{"translatedText":"دب"},"responseStatus":"200"}"#;
        assert_eq!(parse_response(body).unwrap(), "دب");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_port_error() {
        let adapter = MyMemoryAdapter::new(
            "http://127.0.0.1:9/get".to_string(),
            Duration::from_millis(500),
        );
        let result = adapter.translate("Hello", Language::Arabic).await;
        assert!(matches!(result, Err(PortError::Unexpected(_))));
    }
}
