//! Response interpretation.

use crate::error::{Result, VintifyError};
use crate::image::types::{to_data_uri, GenerationResult};
use crate::image::wire::GenerateContentResponse;

const SAFETY_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "IMAGE_SAFETY",
    "IMAGE_PROHIBITED_CONTENT",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
];

/// Normalizes a `generateContent` response.
///
/// Only the first candidate is read. The last inline image wins, as does the
/// last text part; earlier images are still listed in
/// [`GenerationResult::images`].
pub fn interpret(response: &GenerateContentResponse) -> Result<GenerationResult> {
    let candidate = response.candidates.first();
    let parts = candidate
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.as_slice())
        .unwrap_or_default();

    let mut images = Vec::new();
    let mut text = None;
    for part in parts {
        if let Some(inline) = &part.inline_data {
            images.push(to_data_uri(&inline.mime_type, &inline.data));
        }
        if let Some(t) = &part.text {
            text = Some(t.clone());
        }
    }

    let Some(image_url) = images.last().cloned() else {
        if let Some(reason) = text {
            return Err(VintifyError::ModelDeclined(reason));
        }
        if let Some(reason) = block_reason(response) {
            tracing::warn!(reason, "response carried no image or text");
        }
        return Err(VintifyError::EmptyResponse);
    };

    Ok(GenerationResult {
        image_url: Some(image_url),
        text,
        images,
    })
}

fn block_reason(response: &GenerateContentResponse) -> Option<&str> {
    response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
        .or_else(|| {
            response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .filter(|r| SAFETY_FINISH_REASONS.contains(r))
        })
}
