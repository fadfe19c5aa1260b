//! HTTP client for an OpenAI-compatible chat-completions API.
//!
//! One entry point, [`ChatClient::complete_json`]: send a prompt, force a
//! JSON-object response, decode the first choice's content as JSON. The
//! request timeout set at construction bounds every call, so a hung upstream
//! fails that call rather than stalling the caller indefinitely.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::AiError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for a chat-completions endpoint.
///
/// Use [`ChatClient::new`] for production or [`ChatClient::with_base_url`] to
/// point at a mock server in tests.
pub struct ChatClient {
    client: Client,
    auth_header: HeaderValue,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`AiError::InvalidApiKey`] if the key is not a
    /// valid header value.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, AiError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock,
    /// or for OpenAI-compatible gateways).
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed, [`AiError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`AiError::InvalidApiKey`] if the key is not a valid header value.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("signaldesk/0.1 (sales-intelligence)")
            .build()?;

        // Keep the base URL as a string so an empty path stays empty; Url
        // would normalise "http://host" to "http://host/" and the joined
        // endpoint would gain a double slash.
        let normalised = base_url.trim_end_matches('/').to_string();
        Url::parse(&normalised).map_err(|_| AiError::InvalidBaseUrl(normalised.clone()))?;

        let auth_header = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| AiError::InvalidApiKey)?;

        Ok(Self {
            client,
            auth_header,
            model: model.to_owned(),
            base_url: normalised,
        })
    }

    /// Sends `prompt` as a single user message, requesting a JSON-object
    /// response at the given sampling temperature, and returns the decoded
    /// JSON payload of the first choice.
    ///
    /// # Errors
    ///
    /// - [`AiError::Http`] on network failure or timeout.
    /// - [`AiError::Api`] if the API answers with a non-2xx status.
    /// - [`AiError::EmptyResponse`] if the completion has no content.
    /// - [`AiError::Deserialize`] if the body or the completion content is
    ///   not valid JSON.
    pub async fn complete_json(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<serde_json::Value, AiError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            temperature,
        };

        tracing::debug!(model = %self.model, temperature, "chat completion request");

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api { status, body });
        }

        let body = response.text().await?;
        let completion: ChatResponse =
            serde_json::from_str(&body).map_err(|e| AiError::Deserialize {
                context: "chat completion envelope".to_string(),
                source: e,
            })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AiError::EmptyResponse)?;

        serde_json::from_str(&content).map_err(|e| AiError::Deserialize {
            context: "completion content".to_string(),
            source: e,
        })
    }
}
