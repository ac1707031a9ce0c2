//! CLI for Vintify - vintage photo stylization.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vintify::{
    ApiKey, GeneratedImage, GenerationRequest, GenerationResult, ModelTable, QualityTier,
    StyleStudioBuilder, UploadedFile,
};

#[derive(Parser)]
#[command(name = "vintify")]
#[command(about = "Restyle photos with a vintage look or strip their background (Gemini)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// API key (defaults to GEMINI_API_KEY, then GOOGLE_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a stylized variant of a photo
    Generate(GenerateArgs),

    /// Remove the background, leaving the subject on white
    RemoveBg(RemoveBgArgs),

    /// Show which model each quality tier uses
    Models,
}

#[derive(Args)]
struct GenerateArgs {
    /// The style and atmosphere description
    prompt: String,

    /// Source photo
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// How closely to follow the source photo (0-100)
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    influence: u8,

    /// Who is in the picture
    #[arg(long)]
    character: Option<String>,

    /// What is happening in the picture
    #[arg(long)]
    scene: Option<String>,

    /// Quality tier
    #[arg(short, long, value_enum, default_value = "standard")]
    quality: QualityArg,
}

#[derive(Args)]
struct RemoveBgArgs {
    /// Source photo
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QualityArg {
    Standard,
    High,
}

impl From<QualityArg> for QualityTier {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Standard => QualityTier::Standard,
            QualityArg::High => QualityTier::High,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(ref args) => {
            let api_key = resolve_api_key(cli.api_key.as_deref())?;
            generate(args, &api_key, cli.json).await?;
        }
        Commands::RemoveBg(ref args) => {
            let api_key = resolve_api_key(cli.api_key.as_deref())?;
            remove_background(args, &api_key, cli.json).await?;
        }
        Commands::Models => {
            list_models(cli.json)?;
        }
    }

    Ok(())
}

fn resolve_api_key(explicit: Option<&str>) -> anyhow::Result<ApiKey> {
    let key = match explicit {
        Some(k) => ApiKey::new(k)?,
        None => ApiKey::from_env()?,
    };
    Ok(key)
}

async fn generate(args: &GenerateArgs, api_key: &ApiKey, json_output: bool) -> anyhow::Result<()> {
    let upload = UploadedFile::from_path(&args.input)?;

    let mut request = GenerationRequest::from_upload(&upload, &args.prompt)
        .with_influence(args.influence)
        .with_quality(args.quality.into());
    if let Some(ref character) = args.character {
        request = request.with_character(character);
    }
    if let Some(ref scene) = args.scene {
        request = request.with_scene(scene);
    }

    let studio = StyleStudioBuilder::from_env().build();
    let result = studio.generate_stylized_image(api_key, &request).await?;
    report(&result, &args.output, &args.prompt, json_output)
}

async fn remove_background(
    args: &RemoveBgArgs,
    api_key: &ApiKey,
    json_output: bool,
) -> anyhow::Result<()> {
    let upload = UploadedFile::from_path(&args.input)?;

    let studio = StyleStudioBuilder::from_env().build();
    let result = studio
        .remove_background(api_key, &upload.base64, &upload.mime_type)
        .await?;
    report(&result, &args.output, "background removal", json_output)
}

fn report(
    result: &GenerationResult,
    output: &Path,
    prompt: &str,
    json_output: bool,
) -> anyhow::Result<()> {
    let image = GeneratedImage::new(result.require_image()?, prompt);
    image.save(output)?;
    let size = std::fs::metadata(output)?.len();

    if json_output {
        let report = serde_json::json!({
            "success": true,
            "id": image.id,
            "output": output.display().to_string(),
            "size_bytes": size,
            "format": image.format().map(|f| f.extension()),
            "text": result.text,
            "images_returned": result.images.len(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Saved: {} ({} bytes)", output.display(), size);
        if let Some(ref text) = result.text {
            println!("Model says: {}", text);
        }
        if result.images.len() > 1 {
            println!(
                "Note: model returned {} images; kept the last one",
                result.images.len()
            );
        }
    }

    Ok(())
}

fn list_models(json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct TierInfo {
        tier: QualityTier,
        model: String,
        image_size: Option<&'static str>,
        env_var: &'static str,
    }

    let table = ModelTable::default().with_env_overrides();
    let tiers = [
        (QualityTier::Standard, vintify::STANDARD_MODEL_ENV),
        (QualityTier::High, vintify::HIGH_MODEL_ENV),
    ]
    .into_iter()
    .map(|(tier, env_var)| {
        let profile = table.profile(tier);
        TierInfo {
            tier,
            model: profile.model.clone(),
            image_size: profile.image_size.map(|s| s.as_str()),
            env_var,
        }
    })
    .collect::<Vec<_>>();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&tiers)?);
    } else {
        println!("Quality tiers:\n");
        for t in &tiers {
            println!(
                "  {:<9} {} (size: {})",
                t.tier.to_string(),
                t.model,
                t.image_size.unwrap_or("default")
            );
            println!("    override: {}", t.env_var);
        }
    }

    Ok(())
}
