//! Text translation through Google Translate.
//!
//! Two endpoints are used: the keyed v2 REST API for the text translator,
//! and the keyless `translate_a/single` endpoint for text read off images.

use serde::{Deserialize, Serialize};

use super::backend::check_status;
use super::error::ServiceError;

/// The environment variable name for the Translate API key.
pub const TRANSLATE_API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

/// Default base URL of the v2 REST API.
pub const TRANSLATE_API_BASE_URL: &str = "https://translation.googleapis.com";

/// Default base URL of the keyless endpoint.
pub const QUICK_TRANSLATE_BASE_URL: &str = "https://translate.googleapis.com";

/// Target language used when the caller doesn't pick one (Malay).
pub const DEFAULT_TARGET_LANGUAGE: &str = "ms";

#[derive(Debug, Serialize)]
struct V2Request<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct V2Response {
    #[serde(default)]
    data: Option<V2Data>,
}

#[derive(Debug, Deserialize)]
struct V2Data {
    #[serde(default)]
    translations: Vec<V2Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct V2Translation {
    translated_text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

/// Read the API key from the environment; empty counts as unset.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(TRANSLATE_API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
}

/// A finished translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    /// Source language as detected by the service, when none was given
    pub detected_source: Option<String>,
    pub target: String,
}

/// Client for the translation endpoints.
#[derive(Debug, Clone)]
pub struct TranslateClient {
    api_key: Option<String>,
    api_base_url: String,
    quick_base_url: String,
    default_target: String,
    http_client: reqwest::Client,
}

impl TranslateClient {
    /// Create a client, reading the API key from `GOOGLE_TRANSLATE_API_KEY`.
    ///
    /// A missing key is not an error here: the keyless endpoint still works,
    /// and [`TranslateClient::translate`] reports `MissingApiKey` when called.
    pub fn new() -> Result<Self, ServiceError> {
        Self::with_base_urls(
            api_key_from_env(),
            TRANSLATE_API_BASE_URL.to_string(),
            QUICK_TRANSLATE_BASE_URL.to_string(),
        )
    }

    /// Create a client with an explicit API key.
    pub fn with_api_key(api_key: String) -> Result<Self, ServiceError> {
        if api_key.is_empty() {
            return Err(ServiceError::MissingApiKey);
        }
        Self::with_base_urls(
            Some(api_key),
            TRANSLATE_API_BASE_URL.to_string(),
            QUICK_TRANSLATE_BASE_URL.to_string(),
        )
    }

    /// Create a client with custom base URLs.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_urls(
        api_key: Option<String>,
        api_base_url: String,
        quick_base_url: String,
    ) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder().build()?;
        Ok(Self {
            api_key,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            quick_base_url: quick_base_url.trim_end_matches('/').to_string(),
            default_target: DEFAULT_TARGET_LANGUAGE.to_string(),
            http_client,
        })
    }

    /// Replace the target language used when none is given.
    pub fn with_default_target(mut self, lang: &str) -> Self {
        self.default_target = lang.to_string();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn default_target(&self) -> &str {
        &self.default_target
    }

    fn resolve_target<'a>(&'a self, target: Option<&'a str>) -> &'a str {
        target
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.default_target.as_str())
    }

    /// Translate `text` with the keyed v2 API.
    ///
    /// `source` of `None` lets the service detect the language; the detected
    /// code is returned in [`Translation::detected_source`].
    ///
    /// # Errors
    ///
    /// `ServiceError::MissingApiKey` without a key, `ServiceError::InvalidRequest`
    /// for empty text, `ServiceError::NoResult` if no translation comes back.
    pub async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: Option<&str>,
    ) -> Result<Translation, ServiceError> {
        let api_key = self.api_key.as_deref().ok_or(ServiceError::MissingApiKey)?;
        if text.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("Nothing to translate.".to_string()));
        }
        let target = self.resolve_target(target);
        let source = source.map(str::trim).filter(|s| !s.is_empty());

        let request = V2Request {
            q: text,
            source,
            target,
            format: "text",
        };
        let url = format!("{}/language/translate/v2", self.api_base_url);
        let response = self
            .http_client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;
        let body: V2Response = check_status(response).await?.json().await?;

        let first = body
            .data
            .and_then(|d| d.translations.into_iter().next())
            .ok_or_else(|| ServiceError::NoResult("Translation failed. Try again.".to_string()))?;

        log::debug!("Translated {} chars into {}", text.len(), target);
        Ok(Translation {
            text: first.translated_text,
            detected_source: if source.is_none() {
                first.detected_source_language
            } else {
                None
            },
            target: target.to_string(),
        })
    }

    /// Translate `text` with the keyless endpoint, auto-detecting the source.
    pub async fn quick_translate(
        &self,
        text: &str,
        target: Option<&str>,
    ) -> Result<Translation, ServiceError> {
        if text.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("Nothing to translate.".to_string()));
        }
        let target = self.resolve_target(target);

        let url = format!("{}/translate_a/single", self.quick_base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;
        let body: serde_json::Value = check_status(response).await?.json().await?;

        let translated = join_segments(&body)
            .ok_or_else(|| ServiceError::NoResult("Translation failed. Try again.".to_string()))?;

        Ok(Translation {
            text: translated,
            detected_source: body.get(2).and_then(|v| v.as_str()).map(str::to_string),
            target: target.to_string(),
        })
    }
}

/// Join the translated segments of a keyless-endpoint response.
///
/// The response is a nested array whose first element lists segments as
/// `[translated, original, ...]`.
fn join_segments(body: &serde_json::Value) -> Option<String> {
    let segments: Vec<&str> = body
        .get(0)?
        .as_array()?
        .iter()
        .filter_map(|seg| seg.get(0).and_then(|s| s.as_str()))
        .collect();
    if segments.is_empty() {
        return None;
    }
    Some(segments.join(" "))
}
