//! Runtime settings for the asset maker

use std::path::PathBuf;

/// Fixed output resolution requested from the image model.
pub const GENERATION_SIZE: &str = "1024x1024";

/// Quality tier requested from the image model.
pub const GENERATION_QUALITY: &str = "standard";

/// Configuration for the image generation API
#[derive(Clone, Debug)]
pub struct ImageGenConfig {
    /// Base URL of an OpenAI-compatible API (e.g., "https://api.openai.com/v1")
    pub api_base: String,
    /// Image model name
    pub model: String,
    /// Request timeout in seconds, applied to both the generation call and the image download
    pub timeout_secs: u64,
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "dall-e-3".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ImageGenConfig {
    /// Endpoint for text-to-image requests
    pub fn generations_url(&self) -> String {
        format!("{}/images/generations", self.api_base.trim_end_matches('/'))
    }
}

/// Everything the interactive app needs at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub image_gen: ImageGenConfig,
    /// Directory that saved PNGs are written to
    pub output_dir: PathBuf,
    /// Directory for the session log file
    pub log_dir: PathBuf,
    /// Default tracing filter when RUST_LOG is not set
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            image_gen: ImageGenConfig::default(),
            output_dir: PathBuf::from("."),
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_url_handles_trailing_slash() {
        let mut config = ImageGenConfig::default();
        assert_eq!(config.generations_url(), "https://api.openai.com/v1/images/generations");

        config.api_base = "http://localhost:8080/v1/".to_string();
        assert_eq!(config.generations_url(), "http://localhost:8080/v1/images/generations");
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.image_gen.model, "dall-e-3");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.log_level, "info");
    }
}
