#![warn(missing_docs)]
//! Vintify - vintage photo stylization via Gemini image models.
//!
//! Takes an uploaded photo plus style parameters, builds a single
//! instruction for a remote multimodal model, and turns the reply into a
//! data-URI image or a classified error.
//!
//! # Quick Start
//!
//! ```no_run
//! use vintify::{ApiKey, GenerationRequest, QualityTier, StyleStudio, UploadedFile};
//!
//! #[tokio::main]
//! async fn main() -> vintify::Result<()> {
//!     let api_key = ApiKey::from_env()?;
//!     let studio = StyleStudio::builder().build();
//!
//!     let upload = UploadedFile::from_path("portrait.jpg")?;
//!     let request = GenerationRequest::from_upload(&upload, "1920s silent film still")
//!         .with_influence(80)
//!         .with_quality(QualityTier::High);
//!
//!     let result = studio.generate_stylized_image(&api_key, &request).await?;
//!     println!("{}", result.require_image()?);
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `vintify` command-line tool

mod config;
mod error;
pub mod image;

pub use config::{
    ApiKey, ModelProfile, ModelTable, API_KEY_ENV_VARS, BASE_URL_ENV, DEFAULT_BASE_URL,
    HIGH_MODEL_ENV, STANDARD_MODEL_ENV,
};
pub use error::{Result, VintifyError};
pub use image::{
    GeneratedImage, GenerationHistory, GenerationRequest, GenerationResult, GuidanceBand,
    HttpTransport, ImageFormat, ImageSize, QualityTier, RequestBuilder, Session, StyleSettings,
    StyleStudio, StyleStudioBuilder, Transport, TransportError, UploadedFile,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::ApiKey;
    pub use crate::error::{Result, VintifyError};
    pub use crate::image::{
        GenerationRequest, GenerationResult, QualityTier, Session, StyleSettings, StyleStudio,
        UploadedFile,
    };
}
