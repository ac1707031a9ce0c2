//! Stylizes a photo with a vintage look.
//!
//! Run with: `cargo run --example stylize -- <photo.jpg>`
//!
//! Requires `GEMINI_API_KEY` environment variable.

use vintify::{ApiKey, QualityTier, Session, StyleSettings, StyleStudio, UploadedFile};

#[tokio::main]
async fn main() -> vintify::Result<()> {
    let input_path = std::env::args()
        .nth(1)
        .expect("Usage: stylize <photo.jpg>");

    let api_key = ApiKey::from_env()?;
    let mut session = Session::new(StyleStudio::builder().build());
    session.set_upload(UploadedFile::from_path(&input_path)?);

    let settings = StyleSettings {
        influence: 75,
        character_description: "a jazz trumpeter in a pinstripe suit".into(),
        quality_tier: QualityTier::High,
        ..StyleSettings::new("smoky 1950s nightclub, hand-tinted photograph")
    };

    let image = session.generate(&api_key, &settings).await?;
    image.save("stylized.png")?;
    println!("Stylized image saved to stylized.png (id {})", image.id);

    Ok(())
}
