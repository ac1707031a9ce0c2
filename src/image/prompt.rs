//! Request construction: instruction text, model choice and config block.

use crate::config::{ModelProfile, ModelTable};
use crate::image::types::{strip_data_uri_prefix, GenerationRequest, QualityTier};
use crate::image::wire::{
    Content, GenerateContentBody, GenerationConfig, ImageConfig, InlineData, Part,
};
use serde::{Deserialize, Serialize};

/// Sentence appended to every style description.
pub const DEFAULT_STYLE_QUALIFIER: &str =
    "Give the result an authentic vintage aesthetic with faded film tones and soft analog grain.";

/// Fixed instruction used for background removal.
pub const BACKGROUND_REMOVAL_INSTRUCTION: &str =
    "Remove the background from this image. Keep the main subject exactly as it is and place it on a solid white background.";

/// Structural guidance derived from influence.
///
/// Bands are contiguous over 0..=100: `0`, `1..30`, `30..70`, `70..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceBand {
    /// Influence 0: the source image only supplies content, not layout.
    Ignore,
    /// Influence 1-29.
    Loose,
    /// Influence 30-69.
    Balanced,
    /// Influence 70 and above.
    Strict,
}

impl GuidanceBand {
    /// Classifies an influence value.
    pub fn from_influence(influence: u8) -> Self {
        if influence == 0 {
            Self::Ignore
        } else if influence < 30 {
            Self::Loose
        } else if influence < 70 {
            Self::Balanced
        } else {
            Self::Strict
        }
    }

    /// Returns the instruction sentence for this band.
    pub fn sentence(&self) -> &'static str {
        match self {
            Self::Ignore => {
                "ignore input image structure entirely; composition determined solely by the prompt."
            }
            Self::Loose => {
                "use input image as loose reference; pose/structure may change significantly."
            }
            Self::Balanced => {
                "maintain general structure and subject placement; adapt details to style."
            }
            Self::Strict => {
                "strictly adhere to exact structure, pose, and composition; only change artistic rendering."
            }
        }
    }
}

/// A fully built call: model id plus request body.
///
/// Produced by [`RequestBuilder`] and handed to a
/// [`Transport`](crate::image::Transport) unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    model: String,
    body: GenerateContentBody,
}

impl ModelRequest {
    fn new(profile: &ModelProfile, instruction: String, mime_type: &str, image: &str) -> Self {
        let generation_config = profile.image_size.map(|image_size| GenerationConfig {
            image_config: ImageConfig { image_size },
        });

        Self {
            model: profile.model.clone(),
            body: GenerateContentBody {
                contents: vec![Content {
                    parts: vec![
                        Part::text(instruction),
                        Part::inline(mime_type, strip_data_uri_prefix(image)),
                    ],
                }],
                generation_config,
            },
        }
    }

    /// Remote model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// JSON body to POST.
    pub fn body(&self) -> &GenerateContentBody {
        &self.body
    }

    /// The instruction text.
    pub fn instruction(&self) -> Option<&str> {
        self.parts().iter().find_map(|p| p.text.as_deref())
    }

    /// The source image payload.
    pub fn image(&self) -> Option<&InlineData> {
        self.parts().iter().find_map(|p| p.inline_data.as_ref())
    }

    /// The configuration block, if the tier attaches one.
    pub fn config(&self) -> Option<&GenerationConfig> {
        self.body.generation_config.as_ref()
    }

    fn parts(&self) -> &[Part] {
        self.body
            .contents
            .first()
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }
}

/// Turns caller parameters into [`ModelRequest`]s. Pure.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBuilder {
    models: ModelTable,
    style_qualifier: String,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(ModelTable::default())
    }
}

impl RequestBuilder {
    /// Creates a builder with the default style qualifier.
    pub fn new(models: ModelTable) -> Self {
        Self {
            models,
            style_qualifier: DEFAULT_STYLE_QUALIFIER.to_string(),
        }
    }

    /// Replaces the sentence appended to every style description.
    pub fn with_style_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.style_qualifier = qualifier.into();
        self
    }

    /// The tier-to-model table in use.
    pub fn models(&self) -> &ModelTable {
        &self.models
    }

    /// Assembles the instruction text for a stylization request.
    pub fn instruction(&self, request: &GenerationRequest) -> String {
        let mut sections = Vec::with_capacity(4);

        if let Some(character) = non_empty(request.character_description.as_deref()) {
            sections.push(format!("Character: {}", character));
        }
        if let Some(scene) = non_empty(request.scene_action.as_deref()) {
            sections.push(format!("Scene/Action: {}", scene));
        }

        let style = match non_empty(Some(&request.prompt)) {
            Some(prompt) => format!("{} {}", prompt, self.style_qualifier),
            None => self.style_qualifier.clone(),
        };
        sections.push(format!("Style & Atmosphere: {}", style));

        let influence = request.influence.min(100);
        let band = GuidanceBand::from_influence(influence);
        sections.push(format!(
            "Structure Guidance ({}% influence): {}",
            influence,
            band.sentence()
        ));

        sections.join("\n\n")
    }

    /// Builds the stylization call.
    pub fn build(&self, request: &GenerationRequest) -> ModelRequest {
        let profile = self.models.profile(request.quality_tier);
        ModelRequest::new(
            profile,
            self.instruction(request),
            &request.mime_type,
            &request.image,
        )
    }

    /// Builds the background-removal call: fixed instruction, standard
    /// model, no configuration block.
    pub fn build_background_removal(&self, image: &str, mime_type: &str) -> ModelRequest {
        let profile = ModelProfile::new(self.models.profile(QualityTier::Standard).model.clone());
        ModelRequest::new(
            &profile,
            BACKGROUND_REMOVAL_INSTRUCTION.to_string(),
            mime_type,
            image,
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
