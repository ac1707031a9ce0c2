//! Credentials and the tier-to-model table.

use crate::error::{Result, VintifyError};
use crate::image::{ImageSize, QualityTier};
use serde::{Deserialize, Serialize};

/// Environment variables checked, in order, by [`ApiKey::from_env`].
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Overrides the model used for [`QualityTier::Standard`].
pub const STANDARD_MODEL_ENV: &str = "VINTIFY_STANDARD_MODEL";

/// Overrides the model used for [`QualityTier::High`].
pub const HIGH_MODEL_ENV: &str = "VINTIFY_HIGH_MODEL";

/// Overrides the API base URL.
pub const BASE_URL_ENV: &str = "VINTIFY_BASE_URL";

/// Default Gemini Developer API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A non-blank API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key, rejecting blank input.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(VintifyError::MissingCredential);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Reads the key from `GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolves the key through `lookup`, trying [`API_KEY_ENV_VARS`] in
    /// order and skipping blank values.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| lookup(var))
            .find_map(|value| Self::new(value).ok())
            .ok_or(VintifyError::MissingCredential)
    }

    /// Returns the raw key for use in request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Model id plus the configuration block sent with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Remote model identifier.
    pub model: String,
    /// Output size hint; `None` sends no configuration block.
    pub image_size: Option<ImageSize>,
}

impl ModelProfile {
    /// Creates a profile with no configuration block.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            image_size: None,
        }
    }

    /// Attaches an output size hint.
    pub fn with_image_size(mut self, size: ImageSize) -> Self {
        self.image_size = Some(size);
        self
    }
}

/// Maps each [`QualityTier`] to a [`ModelProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTable {
    standard: ModelProfile,
    high: ModelProfile,
}

impl Default for ModelTable {
    fn default() -> Self {
        Self {
            standard: ModelProfile::new("gemini-2.5-flash-image"),
            high: ModelProfile::new("gemini-3-pro-image-preview").with_image_size(ImageSize::TwoK),
        }
    }
}

impl ModelTable {
    /// Returns the profile for a tier.
    pub fn profile(&self, tier: QualityTier) -> &ModelProfile {
        match tier {
            QualityTier::Standard => &self.standard,
            QualityTier::High => &self.high,
        }
    }

    /// Replaces the profile for a tier.
    pub fn with_profile(mut self, tier: QualityTier, profile: ModelProfile) -> Self {
        match tier {
            QualityTier::Standard => self.standard = profile,
            QualityTier::High => self.high = profile,
        }
        self
    }

    /// Applies `VINTIFY_STANDARD_MODEL` / `VINTIFY_HIGH_MODEL` overrides.
    ///
    /// Only the model id changes; each tier keeps its configuration block.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(model) = non_blank_env(STANDARD_MODEL_ENV) {
            self.standard.model = model;
        }
        if let Some(model) = non_blank_env(HIGH_MODEL_ENV) {
            self.high.model = model;
        }
        self
    }
}

pub(crate) fn non_blank_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
