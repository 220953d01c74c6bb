//! Text-to-image API client
//!
//! Talks to an OpenAI-compatible `/images/generations` endpoint. One call per
//! Generate press, no retries: the model is stochastic, so a second call is a
//! new image rather than a recovery.

use std::time::Duration;

use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{ImageGenConfig, GENERATION_QUALITY, GENERATION_SIZE};
use crate::error::{AssetError, Result};

/// API key for the image service. Only ever held in memory.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for the Authorization header only
    pub fn expose(&self) -> &str {
        self.0.trim()
    }

    /// Empty or whitespace-only keys count as missing
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Number of characters typed, for the masked input
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Where the generated image can be found
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Remote URL that must be downloaded
    Url(String),
    /// Image bytes returned inline (decoded `b64_json`)
    Inline(Vec<u8>),
}

/// Anything that can turn a prompt into an image.
pub trait ImageGenerator {
    fn generate(&self, prompt: &str, credential: &Credential) -> Result<ImageSource>;
}

/// Image generation request body
#[derive(Serialize, Debug)]
struct ImageGenRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u32,
}

/// Image generation response body
#[derive(Deserialize, Debug)]
struct ImageGenResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize, Debug)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

/// `{"error": {"message": ...}}` as returned on failures
#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    message: String,
}

/// Blocking HTTP client for the image generation API
pub struct ImageGenClient {
    config: ImageGenConfig,
    client: reqwest::blocking::Client,
}

impl ImageGenClient {
    pub fn new(config: ImageGenConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ImageGenConfig {
        &self.config
    }
}

impl ImageGenerator for ImageGenClient {
    fn generate(&self, prompt: &str, credential: &Credential) -> Result<ImageSource> {
        let request = ImageGenRequest {
            model: &self.config.model,
            prompt,
            size: GENERATION_SIZE,
            quality: GENERATION_QUALITY,
            n: 1,
        };

        info!(model = %self.config.model, "requesting image generation");

        let response = self
            .client
            .post(self.config.generations_url())
            .bearer_auth(credential.expose())
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            let err = describe_failure(status, &body);
            warn!(%status, "image generation rejected");
            return Err(err);
        }

        let source = parse_generation_response(&body)?;
        debug!(
            inline = matches!(source, ImageSource::Inline(_)),
            "image generation succeeded"
        );
        Ok(source)
    }
}

/// Pull the first image out of a successful response body.
///
/// A URL wins over inline data when both are present.
fn parse_generation_response(body: &str) -> Result<ImageSource> {
    let response: ImageGenResponse = serde_json::from_str(body)
        .map_err(|e| AssetError::NetworkFailure(format!("unexpected API response: {}", e)))?;

    let first = response.data.into_iter().next().ok_or_else(|| {
        AssetError::NetworkFailure("unexpected API response: no images returned".to_string())
    })?;

    if let Some(url) = first.url.filter(|u| !u.is_empty()) {
        return Ok(ImageSource::Url(url));
    }
    if let Some(b64) = first.b64_json {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64.trim())
            .map_err(|e| AssetError::NetworkFailure(format!("unexpected API response: {}", e)))?;
        return Ok(ImageSource::Inline(bytes));
    }

    Err(AssetError::NetworkFailure(
        "unexpected API response: image has neither url nor b64_json".to_string(),
    ))
}

/// Turn a non-success status into a user-facing error.
fn describe_failure(status: StatusCode, body: &str) -> AssetError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().chars().take(200).collect());

    let class = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "authentication rejected",
        StatusCode::TOO_MANY_REQUESTS => "rate limited",
        _ => "API error",
    };

    if detail.is_empty() {
        AssetError::NetworkFailure(format!("{} ({})", class, status))
    } else {
        AssetError::NetworkFailure(format!("{} ({}): {}", class, status, detail))
    }
}
