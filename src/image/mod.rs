//! Photo stylization module.

mod history;
mod interpret;
mod prompt;
mod session;
mod studio;
mod transport;
mod types;
pub mod wire;

pub use history::{GenerationHistory, HISTORY_LIMIT};
pub use interpret::interpret;
pub use prompt::{
    GuidanceBand, ModelRequest, RequestBuilder, BACKGROUND_REMOVAL_INSTRUCTION,
    DEFAULT_STYLE_QUALIFIER,
};
pub use session::{Session, StyleSettings};
pub use studio::{StyleStudio, StyleStudioBuilder};
pub use transport::{HttpTransport, Transport, TransportError};
pub use types::{
    parse_data_uri, strip_data_uri_prefix, to_data_uri, GeneratedImage, GenerationRequest,
    GenerationResult, ImageFormat, ImageSize, QualityTier, UploadedFile, DEFAULT_MIME_TYPE,
};
