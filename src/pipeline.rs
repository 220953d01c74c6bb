//! End-to-end generation: credential check → prompt → API → fetch → resize → PNG
//!
//! All state that outlives a single call lives in [`Session`], which the UI
//! owns and passes around explicitly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use image::RgbaImage;
use tracing::{error, info};

use crate::asset::GenerationRequest;
use crate::client::{Credential, ImageGenerator};
use crate::error::{AssetError, Result};
use crate::fetch::{load_source, ImageFetcher};
use crate::png::{download_filename, encode_png, PNG_MIME};
use crate::prompts::prompt_for;
use crate::resample::{display_copy, resize_nearest};

/// The result of one successful Generate press
#[derive(Clone, Debug)]
pub struct GeneratedAsset {
    pub request: GenerationRequest,
    /// Tile at the requested pixel size; this is what gets saved
    pub tile: RgbaImage,
    /// Enlarged copy for the preview only
    pub preview: RgbaImage,
    /// PNG encoding of `tile`
    pub png: Vec<u8>,
    pub filename: String,
}

impl GeneratedAsset {
    pub fn caption(&self) -> String {
        format!("{} asset ({})", self.request.category.label(), self.request.size)
    }
}

/// Run the whole pipeline once.
///
/// Without a usable credential this returns before touching the generator or
/// the fetcher.
pub fn generate_asset(
    credential: &Credential,
    request: GenerationRequest,
    generator: &dyn ImageGenerator,
    fetcher: &dyn ImageFetcher,
) -> Result<GeneratedAsset> {
    if credential.is_blank() {
        return Err(AssetError::CredentialMissing);
    }

    let prompt = prompt_for(request.category)?;
    let source = generator.generate(prompt, credential)?;
    let full = load_source(source, fetcher)?;

    let tile = resize_nearest(&full, request.size);
    let preview = display_copy(&tile);
    let png = encode_png(&tile)?;

    Ok(GeneratedAsset {
        request,
        tile,
        preview,
        png,
        filename: download_filename(request.category, request.size),
    })
}

/// Where the interaction currently stands
#[derive(Clone, Debug, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Generating,
    Previewing(GeneratedAsset),
    Failed(String),
}

/// Per-run context: the API key and whatever the last Generate produced.
#[derive(Debug, Default)]
pub struct Session {
    pub credential: Credential,
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mark the session busy; the UI draws this before blocking on [`Session::trigger`].
    pub fn begin(&mut self) {
        self.state = SessionState::Generating;
    }

    /// Run one generation and replace the previous result with its outcome.
    pub fn trigger(
        &mut self,
        request: GenerationRequest,
        generator: &dyn ImageGenerator,
        fetcher: &dyn ImageFetcher,
    ) -> &SessionState {
        let started = Instant::now();

        self.state = match generate_asset(&self.credential, request, generator, fetcher) {
            Ok(asset) => {
                info!(
                    category = %request.category,
                    size = %request.size,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "asset generated"
                );
                SessionState::Previewing(asset)
            }
            Err(e) => {
                error!(category = %request.category, size = %request.size, "generation failed: {}", e);
                SessionState::Failed(e.to_string())
            }
        };
        &self.state
    }

    /// The asset available for download, if the last trigger succeeded.
    pub fn asset(&self) -> Option<&GeneratedAsset> {
        match &self.state {
            SessionState::Previewing(asset) => Some(asset),
            _ => None,
        }
    }

    /// Download payload as (file name, PNG bytes)
    pub fn download(&self) -> Option<(&str, &[u8])> {
        self.asset().map(|a| (a.filename.as_str(), a.png.as_slice()))
    }

    /// Write the current download into `dir`, returning the full path.
    ///
    /// Returns `Ok(None)` when there is nothing to save.
    pub fn save_download(&self, dir: &Path) -> io::Result<Option<PathBuf>> {
        let Some((filename, bytes)) = self.download() else {
            return Ok(None);
        };
        fs::create_dir_all(dir)?;
        let path = dir.join(filename);
        fs::write(&path, bytes)?;
        info!(path = %path.display(), mime = PNG_MIME, bytes = bytes.len(), "asset saved");
        Ok(Some(path))
    }
}

#[cfg(test)]
pub(crate) mod stubs {
    //! In-memory stand-ins for the network side of the pipeline.

    use std::cell::Cell;
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    use crate::client::{Credential, ImageGenerator, ImageSource};
    use crate::error::{AssetError, Result};
    use crate::fetch::ImageFetcher;

    pub const GREY: Rgba<u8> = Rgba([128, 128, 128, 255]);

    pub fn grey_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(1024, 1024, GREY);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    /// Returns a fixed URL, or a network error when `fail` is set
    pub struct StubGenerator {
        pub calls: Cell<usize>,
        pub fail: bool,
    }

    impl StubGenerator {
        pub fn ok() -> Self {
            Self { calls: Cell::new(0), fail: false }
        }

        pub fn failing() -> Self {
            Self { calls: Cell::new(0), fail: true }
        }
    }

    impl ImageGenerator for StubGenerator {
        fn generate(&self, _prompt: &str, _credential: &Credential) -> Result<ImageSource> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(AssetError::NetworkFailure("connection refused".to_string()))
            } else {
                Ok(ImageSource::Url("https://img.example/grey.png".to_string()))
            }
        }
    }

    /// Serves the same body for every URL
    pub struct StubFetcher {
        pub calls: Cell<usize>,
        pub body: Vec<u8>,
    }

    impl StubFetcher {
        pub fn grey() -> Self {
            Self { calls: Cell::new(0), body: grey_png() }
        }

        pub fn serving(body: &[u8]) -> Self {
            Self { calls: Cell::new(0), body: body.to_vec() }
        }
    }

    impl ImageFetcher for StubFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.body.clone())
        }
    }
}
