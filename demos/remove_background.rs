//! Removes the background from a photo.
//!
//! Run with: `cargo run --example remove_background -- <photo.jpg>`
//!
//! Requires `GEMINI_API_KEY` environment variable.

use vintify::{ApiKey, StyleStudio, UploadedFile};

#[tokio::main]
async fn main() -> vintify::Result<()> {
    let input_path = std::env::args()
        .nth(1)
        .expect("Usage: remove_background <photo.jpg>");

    let api_key = ApiKey::from_env()?;
    let studio = StyleStudio::builder().build();
    let upload = UploadedFile::from_path(&input_path)?;

    let result = studio
        .remove_background(&api_key, &upload.base64, &upload.mime_type)
        .await?;
    let cleaned = UploadedFile::from_data_uri(result.require_image()?)?;
    std::fs::write("no_background.png", cleaned.to_bytes()?)?;
    println!("Saved no_background.png ({})", cleaned.mime_type);

    Ok(())
}
