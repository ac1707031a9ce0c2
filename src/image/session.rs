//! Per-user session state around a [`StyleStudio`].

use crate::config::ApiKey;
use crate::error::{Result, VintifyError};
use crate::image::history::GenerationHistory;
use crate::image::studio::StyleStudio;
use crate::image::transport::{HttpTransport, Transport};
use crate::image::types::{GeneratedImage, GenerationRequest, QualityTier, UploadedFile};
use serde::{Deserialize, Serialize};

/// Style settings applied to the current upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSettings {
    /// Style and atmosphere description.
    pub prompt: String,
    /// 0-100.
    pub influence: u8,
    /// Optional character description.
    pub character_description: String,
    /// Optional scene/action description.
    pub scene_action: String,
    /// Model tier.
    pub quality_tier: QualityTier,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            influence: GenerationRequest::DEFAULT_INFLUENCE,
            character_description: String::new(),
            scene_action: String::new(),
            quality_tier: QualityTier::default(),
        }
    }
}

impl StyleSettings {
    /// Creates settings with the given prompt and defaults elsewhere.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    fn to_request(&self, upload: &UploadedFile) -> GenerationRequest {
        GenerationRequest::from_upload(upload, self.prompt.clone())
            .with_influence(self.influence)
            .with_character(self.character_description.clone())
            .with_scene(self.scene_action.clone())
            .with_quality(self.quality_tier)
    }
}

/// One user's working state: the current photo and recent results.
///
/// Remote operations borrow the session mutably, so a session never has
/// more than one call in flight.
pub struct Session<T = HttpTransport> {
    studio: StyleStudio<T>,
    upload: Option<UploadedFile>,
    history: GenerationHistory,
}

impl<T: Transport> Session<T> {
    /// Starts an empty session.
    pub fn new(studio: StyleStudio<T>) -> Self {
        Self {
            studio,
            upload: None,
            history: GenerationHistory::new(),
        }
    }

    /// Replaces the current photo.
    pub fn set_upload(&mut self, upload: UploadedFile) {
        self.upload = Some(upload);
    }

    /// The current photo.
    pub fn upload(&self) -> Option<&UploadedFile> {
        self.upload.as_ref()
    }

    /// Recent generations, newest first.
    pub fn history(&self) -> &GenerationHistory {
        &self.history
    }

    /// Removes the background of the current photo and makes the result the
    /// new current photo.
    pub async fn remove_background(&mut self, api_key: &ApiKey) -> Result<&UploadedFile> {
        let upload = self.current_upload()?;
        let result = self
            .studio
            .remove_background(api_key, &upload.base64, &upload.mime_type)
            .await?;
        let cleaned = UploadedFile::from_data_uri(result.require_image()?)?;
        Ok(self.upload.insert(cleaned))
    }

    /// Stylizes the current photo and records the result in history.
    pub async fn generate(
        &mut self,
        api_key: &ApiKey,
        settings: &StyleSettings,
    ) -> Result<&GeneratedImage> {
        let request = settings.to_request(self.current_upload()?);
        let result = self.studio.generate_stylized_image(api_key, &request).await?;
        let image = GeneratedImage::new(result.require_image()?, settings.prompt.clone());
        Ok(self.history.record(image))
    }

    fn current_upload(&self) -> Result<&UploadedFile> {
        self.upload
            .as_ref()
            .ok_or_else(|| VintifyError::InvalidImage("no photo uploaded".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::prompt::ModelRequest;
    use crate::image::transport::TransportError;
    use crate::image::wire::{Candidate, Content, GenerateContentResponse, Part};

    /// Returns a fixed image payload, tagged by instruction text.
    struct CannedTransport;

    #[async_trait::async_trait]
    impl Transport for CannedTransport {
        async fn generate_content(
            &self,
            _api_key: &ApiKey,
            request: &ModelRequest,
        ) -> std::result::Result<GenerateContentResponse, TransportError> {
            let data = if request.instruction().unwrap_or_default().contains("white background") {
                "V0hJVEU="
            } else {
                "U1RZTEU="
            };
            Ok(GenerateContentResponse {
                candidates: vec![Candidate {
                    content: Some(Content {
                        parts: vec![Part::inline("image/png", data)],
                    }),
                    finish_reason: None,
                }],
                prompt_feedback: None,
            })
        }
    }

    fn session() -> Session<CannedTransport> {
        Session::new(StyleStudio::builder().build_with_transport(CannedTransport))
    }

    fn key() -> ApiKey {
        ApiKey::new("test-key").unwrap()
    }

    #[tokio::test]
    async fn test_requires_upload() {
        let mut session = session();
        assert!(matches!(
            session.generate(&key(), &StyleSettings::new("sepia")).await,
            Err(VintifyError::InvalidImage(_))
        ));
    }

    #[tokio::test]
    async fn test_background_removal_replaces_upload() {
        let mut session = session();
        session.set_upload(UploadedFile::from_data_uri("data:image/jpeg;base64,/9j/").unwrap());

        let cleaned = session.remove_background(&key()).await.unwrap();
        assert_eq!(cleaned.base64, "V0hJVEU=");
        assert_eq!(cleaned.mime_type, "image/png");
        assert_eq!(session.upload().unwrap().preview_url, "data:image/png;base64,V0hJVEU=");
    }

    #[tokio::test]
    async fn test_generate_records_history() {
        let mut session = session();
        session.set_upload(UploadedFile::from_data_uri("data:image/png;base64,AAAA").unwrap());

        for i in 0..6 {
            let settings = StyleSettings::new(format!("style {i}"));
            let image = session.generate(&key(), &settings).await.unwrap();
            assert_eq!(image.image_url, "data:image/png;base64,U1RZTEU=");
        }

        let history = session.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history.latest().unwrap().prompt_used, "style 5");
    }
}
