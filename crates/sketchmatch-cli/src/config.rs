use std::path::PathBuf;

/// CLI defaults, loaded from `SKETCHMATCH_*` environment variables.
/// Command-line flags take precedence over these.
pub struct Config {
    /// Fixed seed for the heuristic tiers (deterministic output).
    pub seed: Option<u64>,
    /// Default profile gallery path.
    pub profiles: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            seed: env_u64("SKETCHMATCH_SEED"),
            profiles: std::env::var("SKETCHMATCH_PROFILES").ok().map(PathBuf::from),
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
