//! Entry points: stylize a photo or remove its background.

use crate::config::{ApiKey, ModelTable};
use crate::error::{Result, VintifyError};
use crate::image::interpret::interpret;
use crate::image::prompt::{ModelRequest, RequestBuilder};
use crate::image::transport::{HttpTransport, Transport};
use crate::image::types::{GenerationRequest, GenerationResult};
use crate::image::wire::GenerateContentResponse;
use std::time::Instant;

/// Builder for [`StyleStudio`].
#[derive(Debug, Clone, Default)]
pub struct StyleStudioBuilder {
    models: ModelTable,
    style_qualifier: Option<String>,
    base_url: Option<String>,
}

impl StyleStudioBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the builder from `VINTIFY_*` environment overrides.
    pub fn from_env() -> Self {
        Self {
            models: ModelTable::default().with_env_overrides(),
            ..Self::default()
        }
    }

    /// Sets the tier-to-model table.
    pub fn models(mut self, models: ModelTable) -> Self {
        self.models = models;
        self
    }

    /// Replaces the vintage-aesthetic sentence appended to every prompt.
    pub fn style_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.style_qualifier = Some(qualifier.into());
        self
    }

    /// Sets the API base URL. Falls back to `VINTIFY_BASE_URL`, then the
    /// public endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    fn request_builder(&self) -> RequestBuilder {
        let builder = RequestBuilder::new(self.models.clone());
        match &self.style_qualifier {
            Some(q) => builder.with_style_qualifier(q.clone()),
            None => builder,
        }
    }

    /// Builds a studio backed by [`HttpTransport`].
    pub fn build(self) -> StyleStudio {
        let transport = match &self.base_url {
            Some(url) => HttpTransport::new(url.clone()),
            None => HttpTransport::from_env(),
        };
        self.build_with_transport(transport)
    }

    /// Builds a studio backed by a custom transport.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> StyleStudio<T> {
        StyleStudio {
            requests: self.request_builder(),
            transport,
        }
    }
}

/// Stylization and background-removal front door.
///
/// Stateless between calls: the API key is passed on every call, so a
/// changed key takes effect immediately.
pub struct StyleStudio<T = HttpTransport> {
    requests: RequestBuilder,
    transport: T,
}

impl StyleStudio {
    /// Creates a new `StyleStudioBuilder`.
    pub fn builder() -> StyleStudioBuilder {
        StyleStudioBuilder::new()
    }
}

impl<T: Transport> StyleStudio<T> {
    /// The request builder in use.
    pub fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    /// Restyles the photo in `request`.
    pub async fn generate_stylized_image(
        &self,
        api_key: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<GenerationResult> {
        let start = Instant::now();
        let call = self.requests.build(request);
        tracing::debug!(
            model = call.model(),
            influence = request.influence,
            tier = %request.quality_tier,
            "generating stylized image"
        );

        let response = self.send(api_key, &call).await.inspect_err(|e| {
            tracing::warn!(model = call.model(), "stylization failed: {e}");
        })?;
        let result = interpret(&response).inspect_err(|e| {
            tracing::warn!(model = call.model(), "stylization returned no image: {e}");
        })?;

        tracing::info!(
            model = call.model(),
            images = result.images.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "stylized image generated"
        );
        Ok(result)
    }

    /// Removes the background from a photo, leaving the subject on white.
    ///
    /// Provisioning errors are reported as-is; anything else is wrapped in
    /// [`VintifyError::BackgroundRemovalFailed`].
    pub async fn remove_background(
        &self,
        api_key: &ApiKey,
        image: &str,
        mime_type: &str,
    ) -> Result<GenerationResult> {
        let start = Instant::now();
        let call = self.requests.build_background_removal(image, mime_type);
        tracing::debug!(model = call.model(), "removing background");

        let outcome = match self.send(api_key, &call).await {
            Ok(response) => interpret(&response),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => {
                tracing::info!(
                    model = call.model(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "background removed"
                );
                Ok(result)
            }
            Err(e @ VintifyError::EntityNotFound(_)) => {
                tracing::warn!(model = call.model(), "background removal failed: {e}");
                Err(e)
            }
            Err(e) => {
                tracing::warn!(model = call.model(), "background removal failed: {e}");
                Err(VintifyError::BackgroundRemovalFailed(e.to_string()))
            }
        }
    }

    async fn send(&self, api_key: &ApiKey, call: &ModelRequest) -> Result<GenerateContentResponse> {
        self.transport
            .generate_content(api_key, call)
            .await
            .map_err(|e| VintifyError::classify(&e.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::transport::TransportError;
    use crate::image::wire::{Candidate, Content, Part};
    use crate::image::QualityTier;
    use std::sync::Mutex;

    /// Echoes the request's image back as the generated image.
    #[derive(Default)]
    struct EchoTransport {
        seen: Mutex<Vec<ModelRequest>>,
    }

    #[async_trait::async_trait]
    impl Transport for EchoTransport {
        async fn generate_content(
            &self,
            _api_key: &ApiKey,
            request: &ModelRequest,
        ) -> std::result::Result<GenerateContentResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            let image = request.image().cloned().unwrap();
            Ok(GenerateContentResponse {
                candidates: vec![Candidate {
                    content: Some(Content {
                        parts: vec![Part::inline(image.mime_type, image.data)],
                    }),
                    finish_reason: Some("STOP".into()),
                }],
                prompt_feedback: None,
            })
        }
    }

    /// Always fails with a fixed message.
    struct FailingTransport(&'static str);

    #[async_trait::async_trait]
    impl Transport for FailingTransport {
        async fn generate_content(
            &self,
            _api_key: &ApiKey,
            _request: &ModelRequest,
        ) -> std::result::Result<GenerateContentResponse, TransportError> {
            Err(TransportError::new(self.0))
        }
    }

    /// Answers with text only.
    struct DecliningTransport;

    #[async_trait::async_trait]
    impl Transport for DecliningTransport {
        async fn generate_content(
            &self,
            _api_key: &ApiKey,
            _request: &ModelRequest,
        ) -> std::result::Result<GenerateContentResponse, TransportError> {
            Ok(GenerateContentResponse {
                candidates: vec![Candidate {
                    content: Some(Content {
                        parts: vec![Part::text("I can't edit this photo.")],
                    }),
                    finish_reason: Some("STOP".into()),
                }],
                prompt_feedback: None,
            })
        }
    }

    fn key() -> ApiKey {
        ApiKey::new("test-key").unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_through_echo() {
        let studio = StyleStudio::builder().build_with_transport(EchoTransport::default());
        let request =
            GenerationRequest::new("data:image/png;base64,iVBORw0KGgo=", "image/png", "sepia");

        let result = studio.generate_stylized_image(&key(), &request).await.unwrap();
        assert_eq!(
            result.image_url.as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
    }

    #[tokio::test]
    async fn test_high_tier_reaches_transport() {
        let studio = StyleStudio::builder().build_with_transport(EchoTransport::default());
        let request =
            GenerationRequest::new("AAAA", "image/png", "noir").with_quality(QualityTier::High);

        studio.generate_stylized_image(&key(), &request).await.unwrap();
        let seen = studio.transport.seen.lock().unwrap();
        assert_eq!(seen[0].model(), "gemini-3-pro-image-preview");
        assert!(seen[0].config().is_some());
    }

    #[tokio::test]
    async fn test_transport_errors_are_classified() {
        let request = GenerationRequest::new("AAAA", "image/png", "noir");

        let studio = StyleStudio::builder().build_with_transport(FailingTransport(
            "403 Forbidden: Requested entity was not found.",
        ));
        assert!(matches!(
            studio.generate_stylized_image(&key(), &request).await,
            Err(VintifyError::EntityNotFound(_))
        ));

        let studio = StyleStudio::builder()
            .build_with_transport(FailingTransport("503 Service Unavailable: try later"));
        assert!(matches!(
            studio.generate_stylized_image(&key(), &request).await,
            Err(VintifyError::ServiceOverloaded)
        ));
    }

    #[tokio::test]
    async fn test_background_removal_uses_fixed_request() {
        let studio = StyleStudio::builder().build_with_transport(EchoTransport::default());
        let result = studio
            .remove_background(&key(), "data:image/jpeg;base64,/9j/", "image/jpeg")
            .await
            .unwrap();
        assert_eq!(result.image_url.as_deref(), Some("data:image/jpeg;base64,/9j/"));

        let seen = studio.transport.seen.lock().unwrap();
        assert_eq!(seen[0].model(), "gemini-2.5-flash-image");
        assert!(seen[0].config().is_none());
    }

    #[tokio::test]
    async fn test_background_removal_wraps_errors() {
        let studio =
            StyleStudio::builder().build_with_transport(FailingTransport("400 Bad Request"));
        match studio.remove_background(&key(), "AAAA", "image/png").await {
            Err(VintifyError::BackgroundRemovalFailed(msg)) => {
                assert!(msg.contains("Invalid request"))
            }
            other => panic!("expected BackgroundRemovalFailed, got {other:?}"),
        }

        let studio = StyleStudio::builder().build_with_transport(DecliningTransport);
        assert!(matches!(
            studio.remove_background(&key(), "AAAA", "image/png").await,
            Err(VintifyError::BackgroundRemovalFailed(_))
        ));

        let studio = StyleStudio::builder()
            .build_with_transport(FailingTransport("Requested entity was not found."));
        assert!(matches!(
            studio.remove_background(&key(), "AAAA", "image/png").await,
            Err(VintifyError::EntityNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_declined_generation() {
        let studio = StyleStudio::builder().build_with_transport(DecliningTransport);
        let request = GenerationRequest::new("AAAA", "image/png", "noir");
        match studio.generate_stylized_image(&key(), &request).await {
            Err(VintifyError::ModelDeclined(text)) => assert_eq!(text, "I can't edit this photo."),
            other => panic!("expected ModelDeclined, got {other:?}"),
        }
    }
}
