//! Download and decode generated images

use std::time::Duration;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::client::ImageSource;
use crate::error::{AssetError, Result};

/// Anything that can GET the bytes behind a URL.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Plain unauthenticated HTTP GET
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "image download failed");
            return Err(AssetError::NetworkFailure(format!(
                "image download failed with status {}",
                status
            )));
        }

        let bytes = response.bytes()?;
        debug!(bytes = bytes.len(), "image downloaded");
        Ok(bytes.to_vec())
    }
}

/// Decode image bytes, sniffing the format from the content.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| AssetError::DecodeFailure(e.to_string()))
}

/// Resolve an [`ImageSource`] to a decoded image, downloading if needed.
pub fn load_source(source: ImageSource, fetcher: &dyn ImageFetcher) -> Result<DynamicImage> {
    match source {
        ImageSource::Url(url) => decode_image(&fetcher.fetch(&url)?),
        ImageSource::Inline(bytes) => decode_image(&bytes),
    }
}
