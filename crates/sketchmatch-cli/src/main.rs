use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sketchmatch_core::validate::validate_upload;
use sketchmatch_core::{Profile, Session, WeightConfig};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "sketchmatch", about = "Sketch-based identification CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a sketch image and print its descriptor
    Analyze {
        /// Path to the sketch image (JPEG, PNG, or WebP)
        image: PathBuf,
        /// Fixed seed for the heuristic tiers
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Match a sketch against a profile gallery
    Match {
        /// Path to the sketch image (JPEG, PNG, or WebP)
        image: PathBuf,
        /// JSON file containing the candidate profiles
        #[arg(short, long)]
        profiles: Option<PathBuf>,
        /// Relative weight of the shape-label comparison
        #[arg(long)]
        features: Option<f32>,
        /// Relative weight of the embedding comparison
        #[arg(long)]
        descriptor: Option<f32>,
        /// Relative weight of the age/gender comparison
        #[arg(long = "age-gender")]
        age_gender: Option<f32>,
        /// Print at most this many matches
        #[arg(long)]
        limit: Option<usize>,
        /// Fixed seed for the heuristic tiers
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Check whether a file would be accepted as an upload
    Validate {
        image: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Analyze { image, seed } => {
            let bytes = read_upload(&image)?;
            let session = open_session(seed.or(config.seed));
            let descriptor = session.analyze(&bytes).await;
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Commands::Match {
            image,
            profiles,
            features,
            descriptor,
            age_gender,
            limit,
            seed,
        } => {
            let bytes = read_upload(&image)?;
            let gallery_path = profiles
                .or(config.profiles)
                .context("no profile gallery: pass --profiles or set SKETCHMATCH_PROFILES")?;
            let gallery = load_profiles(&gallery_path)?;

            let defaults = WeightConfig::default();
            let weights = WeightConfig {
                features: features.unwrap_or(defaults.features),
                descriptor: descriptor.unwrap_or(defaults.descriptor),
                age_gender: age_gender.unwrap_or(defaults.age_gender),
            };

            let session = open_session(seed.or(config.seed));
            let mut output = session.identify(&bytes, &gallery, &weights).await;
            if let Some(limit) = limit {
                output.matches.truncate(limit);
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Validate { image } => {
            let bytes =
                std::fs::read(&image).with_context(|| format!("reading {}", image.display()))?;
            match validate_upload(&bytes) {
                Ok(format) => println!("accepted: {format:?}, {} bytes", bytes.len()),
                Err(error) => {
                    println!("rejected: {error}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// No detection backend ships with the CLI; analysis always runs on the
/// heuristic tiers.
fn open_session(seed: Option<u64>) -> Session {
    let session = Session::heuristic_only();
    match seed {
        Some(seed) => session.with_seed(seed),
        None => session,
    }
}

/// Read and validate an upload, mirroring the upload-time checks of the
/// identification service.
fn read_upload(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    validate_upload(&bytes).with_context(|| format!("rejected upload {}", path.display()))?;
    Ok(bytes)
}

fn load_profiles(path: &Path) -> Result<Vec<Profile>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading profiles from {}", path.display()))?;
    let profiles: Vec<Profile> =
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
    tracing::debug!(count = profiles.len(), "loaded profile gallery");
    Ok(profiles)
}
