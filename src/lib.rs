//! RPG tile asset maker
//!
//! Generates pixel-art map tiles through a text-to-image API, shrinks them
//! with nearest-neighbor resampling and saves them as PNG.

pub mod app;
pub mod asset;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod png;
pub mod prompts;
pub mod resample;
pub mod viewer;

pub use asset::{AssetCategory, GenerationRequest, PixelSize};
pub use client::{Credential, ImageGenClient, ImageGenerator, ImageSource};
pub use error::AssetError;
pub use fetch::{HttpFetcher, ImageFetcher};
pub use pipeline::{generate_asset, GeneratedAsset, Session, SessionState};
