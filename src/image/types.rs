//! Core types for stylization requests and results.

use crate::error::{Result, VintifyError};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Mime type assumed when a payload does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

const BASE64_MARKER: &str = "base64,";

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Maps a declared MIME type back to a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// Output quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Fast, economical model with default output size.
    #[default]
    Standard,
    /// Higher-capability model with a 2K output hint.
    High,
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Output size hint understood by the image models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    /// ~1024px on the long edge.
    #[serde(rename = "1K")]
    OneK,
    /// ~2048px on the long edge.
    #[serde(rename = "2K")]
    TwoK,
    /// ~4096px on the long edge.
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    /// Returns the size as the service expects it (e.g., "2K").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneK => "1K",
            Self::TwoK => "2K",
            Self::FourK => "4K",
        }
    }
}

/// Removes an optional data-URI header, leaving only the base64 payload.
pub fn strip_data_uri_prefix(image: &str) -> &str {
    match image.find(BASE64_MARKER) {
        Some(idx) => &image[idx + BASE64_MARKER.len()..],
        None => image,
    }
}

/// Builds a `data:<mime>;base64,<payload>` URI.
pub fn to_data_uri(mime_type: &str, payload: &str) -> String {
    let mime = if mime_type.trim().is_empty() {
        DEFAULT_MIME_TYPE
    } else {
        mime_type
    };
    format!("data:{};{}{}", mime, BASE64_MARKER, payload)
}

/// Splits a data URI into `(mime_type, payload)`.
pub fn parse_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    Some((mime, payload))
}

/// A request to restyle an uploaded photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Base64 image payload, data-URI header already removed.
    pub image: String,
    /// Declared MIME type of the image.
    pub mime_type: String,
    /// Free-text style and atmosphere description.
    pub prompt: String,
    /// How closely to follow the source image, 0-100.
    pub influence: u8,
    /// Who is in the picture.
    pub character_description: Option<String>,
    /// What is happening in the picture.
    pub scene_action: Option<String>,
    /// Model tier.
    pub quality_tier: QualityTier,
}

impl GenerationRequest {
    /// Default influence applied when none is set.
    pub const DEFAULT_INFLUENCE: u8 = 50;

    /// Creates a new request. Any data-URI header on `image` is stripped.
    pub fn new(
        image: impl AsRef<str>,
        mime_type: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            image: strip_data_uri_prefix(image.as_ref()).to_string(),
            mime_type: mime_type.into(),
            prompt: prompt.into(),
            influence: Self::DEFAULT_INFLUENCE,
            character_description: None,
            scene_action: None,
            quality_tier: QualityTier::default(),
        }
    }

    /// Creates a request from a previously uploaded file.
    pub fn from_upload(upload: &UploadedFile, prompt: impl Into<String>) -> Self {
        Self::new(&upload.base64, upload.mime_type.clone(), prompt)
    }

    /// Sets the influence, clamped to 100.
    pub fn with_influence(mut self, influence: u8) -> Self {
        self.influence = influence.min(100);
        self
    }

    /// Sets the character description.
    pub fn with_character(mut self, description: impl Into<String>) -> Self {
        self.character_description = Some(description.into());
        self
    }

    /// Sets the scene/action description.
    pub fn with_scene(mut self, scene: impl Into<String>) -> Self {
        self.scene_action = Some(scene.into());
        self
    }

    /// Sets the quality tier.
    pub fn with_quality(mut self, tier: QualityTier) -> Self {
        self.quality_tier = tier;
        self
    }
}

/// Normalized outcome of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// The chosen image as a data URI.
    pub image_url: Option<String>,
    /// Accompanying text from the model, if any.
    pub text: Option<String>,
    /// Every image found in the response, in order. The last one is `image_url`.
    #[serde(default)]
    pub images: Vec<String>,
}

impl GenerationResult {
    /// Returns the chosen image URL, or `EmptyResponse` if there is none.
    pub fn require_image(&self) -> Result<&str> {
        self.image_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(VintifyError::EmptyResponse)
    }
}

/// The photo currently loaded into a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Data URI suitable for previewing.
    pub preview_url: String,
    /// Raw base64 payload.
    pub base64: String,
    /// Declared MIME type.
    pub mime_type: String,
}

impl UploadedFile {
    /// Builds an upload from raw file bytes.
    ///
    /// The MIME type is sniffed from magic bytes, then from `extension_hint`,
    /// then defaults to PNG.
    pub fn from_bytes(data: &[u8], extension_hint: Option<&str>) -> Result<Self> {
        if data.is_empty() {
            return Err(VintifyError::InvalidImage("file is empty".into()));
        }
        let mime_type = ImageFormat::from_magic_bytes(data)
            .or_else(|| extension_hint.and_then(ImageFormat::from_extension))
            .map(|f| f.mime_type())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        let base64 = base64::engine::general_purpose::STANDARD.encode(data);
        Ok(Self {
            preview_url: to_data_uri(&mime_type, &base64),
            base64,
            mime_type,
        })
    }

    /// Reads an upload from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let ext = path.extension().and_then(|e| e.to_str());
        Self::from_bytes(&data, ext)
    }

    /// Builds an upload from a data URI, e.g. a background-removal result.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let (mime, payload) = parse_data_uri(uri)
            .ok_or_else(|| VintifyError::InvalidImage("not a base64 data URI".into()))?;
        let mime_type = if mime.is_empty() {
            DEFAULT_MIME_TYPE
        } else {
            mime
        };
        Ok(Self {
            preview_url: to_data_uri(mime_type, payload),
            base64: payload.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    /// Decodes the payload back to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        decode_payload(&self.base64)
    }
}

/// A completed generation kept in session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "generated image should be saved or added to history"]
pub struct GeneratedImage {
    /// Unique id.
    pub id: Uuid,
    /// The image as a data URI.
    pub image_url: String,
    /// When the generation completed.
    pub timestamp: DateTime<Utc>,
    /// The user prompt that produced it.
    pub prompt_used: String,
}

impl GeneratedImage {
    /// Creates a new entry stamped with the current time.
    pub fn new(image_url: impl Into<String>, prompt_used: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_url: image_url.into(),
            timestamp: Utc::now(),
            prompt_used: prompt_used.into(),
        }
    }

    /// Returns the image format declared by the data URI.
    pub fn format(&self) -> Option<ImageFormat> {
        parse_data_uri(&self.image_url).and_then(|(mime, _)| ImageFormat::from_mime_type(mime))
    }

    /// Decodes the image to raw bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let (_, payload) = parse_data_uri(&self.image_url)
            .ok_or_else(|| VintifyError::InvalidImage("not a base64 data URI".into()))?;
        decode_payload(payload)
    }

    /// Saves the decoded image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| VintifyError::InvalidImage(e.to_string()))
}
