//! DescriptionClient - asks a vision model to describe an image.

use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Serialize};

use super::retry::{is_transient_network_error, parse_retry_after, RetryPolicy};
use crate::codec;

/// The environment variable name for the OpenAI API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default base URL for the chat completions API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default vision model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Token cap for a description.
pub const MAX_TOKENS: u32 = 300;

/// Instructions sent with every image.
pub const DESCRIPTION_PROMPT: &str = "This is ASCII art converted to an image. Please describe it for someone who is visually impaired. Your description should help them understand what the ASCII art represents:\n\n1. **If it contains text**: Read the letters/words clearly and spell them out\n2. **If it's an object/scene**: Describe what it shows in detail\n3. **Character details**: Explain what specific ASCII characters are used (like | for lines, o for eyes, ^ for ears, etc.)\n4. **Layout and structure**: Describe how the characters are arranged\n\nFocus on being descriptive and helpful for someone who cannot see the image. Be specific about the visual elements and what they represent.";

/// Default timeout for HTTP requests (60 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP status code for rate limiting.
const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Mask an API key for display, keeping the first and last 4 characters.
/// Keys of 8 characters or fewer are masked entirely.
pub fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull the message out of an OpenAI style error body, or return the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Encode image bytes as a `data:` URL with the sniffed MIME type.
pub fn image_data_url(image: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        codec::mime_type(image),
        base64::engine::general_purpose::STANDARD.encode(image)
    )
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct DescriptionClient {
    api_key: String,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl DescriptionClient {
    /// Create a client from the `OPENAI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns `DescribeError::MissingApiKey` if the variable is unset or empty.
    pub fn from_env() -> Result<Self, DescribeError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| DescribeError::MissingApiKey)?;
        Self::with_api_key(api_key)
    }

    /// Create a client with an explicit API key.
    pub fn with_api_key(api_key: String) -> Result<Self, DescribeError> {
        if api_key.trim().is_empty() {
            return Err(DescribeError::MissingApiKey);
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            http_client,
        })
    }

    /// Point the client at a different endpoint (a mock server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model to describe an encoded image, in a single attempt.
    ///
    /// # Errors
    ///
    /// `RateLimit` on a 429 response, `Api` for any other error status,
    /// `EmptyResponse` when the reply carries no text, and `Http` when the
    /// request itself fails.
    pub async fn describe(&self, image: &[u8]) -> Result<String, DescribeError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: DESCRIPTION_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_url(image),
                        },
                    },
                ],
            }],
            max_tokens: MAX_TOKENS,
        };

        log::debug!(
            "requesting description of {} byte image from {} with key {}",
            image.len(),
            self.model,
            mask_api_key(&self.api_key)
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == HTTP_STATUS_TOO_MANY_REQUESTS {
                let retry_after_secs = parse_retry_after(&response);
                let text = response.text().await.unwrap_or_default();
                log::warn!(
                    "Rate limited by description API. Retry-After: {:?} seconds",
                    retry_after_secs
                );
                return Err(DescribeError::RateLimit {
                    message: error_message(&text),
                    retry_after_secs,
                });
            }

            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DescribeError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(DescribeError::EmptyResponse)
    }

    /// [`describe`](Self::describe) with the default [`RetryPolicy`].
    pub async fn describe_with_retry(&self, image: &[u8]) -> Result<String, DescribeError> {
        self.describe_with_policy(image, &RetryPolicy::default())
            .await
    }

    /// Describe an image, retrying rate limits and transient network errors
    /// under `policy`.
    ///
    /// # Errors
    ///
    /// `Network` once network retries are exhausted, the last `RateLimit`
    /// once rate limit retries are exhausted, and any other error unchanged.
    pub async fn describe_with_policy(
        &self,
        image: &[u8],
        policy: &RetryPolicy,
    ) -> Result<String, DescribeError> {
        let mut network_attempt = 0u32;
        let mut rate_limit_attempt = 0u32;

        loop {
            let delay = match self.describe(image).await {
                Ok(description) => return Ok(description),

                Err(DescribeError::Http(ref err)) if is_transient_network_error(err) => {
                    network_attempt += 1;
                    if network_attempt > policy.network_retries {
                        log::error!(
                            "Network error after {} attempts. Giving up. Error: {}",
                            network_attempt,
                            err
                        );
                        return Err(DescribeError::Network {
                            message: err.to_string(),
                            attempts: network_attempt,
                        });
                    }
                    let delay = policy.backoff(network_attempt - 1);
                    log::warn!(
                        "Network error (attempt {}/{}): {}. Retrying in {:?}...",
                        network_attempt,
                        policy.network_retries + 1,
                        err,
                        delay
                    );
                    delay
                }

                Err(DescribeError::RateLimit {
                    message,
                    retry_after_secs,
                }) => {
                    rate_limit_attempt += 1;
                    if rate_limit_attempt > policy.rate_limit_retries {
                        log::error!(
                            "Rate limit exceeded after {} attempts. Giving up.",
                            rate_limit_attempt
                        );
                        return Err(DescribeError::RateLimit {
                            message,
                            retry_after_secs,
                        });
                    }
                    let delay = policy.rate_limit_delay(retry_after_secs, rate_limit_attempt - 1);
                    log::info!(
                        "Rate limited (attempt {}/{}). Retrying in {:?}...",
                        rate_limit_attempt,
                        policy.rate_limit_retries + 1,
                        delay
                    );
                    delay
                }

                Err(e) => return Err(e),
            };

            tokio::time::sleep(delay).await;
        }
    }
}

/// Errors that can occur when requesting an image description.
#[derive(Debug, thiserror::Error)]
pub enum DescribeError {
    #[error("API key not configured (set OPENAI_API_KEY or add it to .env)")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: {message}")]
    RateLimit {
        message: String,
        /// Retry-After header value in seconds, if provided
        retry_after_secs: Option<u64>,
    },

    #[error("Network error: {message} (after {attempts} attempts)")]
    Network { message: String, attempts: u32 },

    #[error("Model returned an empty description")]
    EmptyResponse,
}
