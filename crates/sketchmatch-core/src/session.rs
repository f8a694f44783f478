//! Session layer: one backend load per session, one cached query
//! descriptor.
//!
//! The backend load is attempted exactly once when the session opens and
//! its outcome (present or unavailable) is reused by every subsequent
//! analysis. The cached descriptor is overwritten by each new upload;
//! there is no cancellation, a new upload simply supersedes the old state.

use std::future::Future;
use std::sync::RwLock;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::backend::{BackendError, FaceBackend};
use crate::extractor;
use crate::insights::{self, Insights};
use crate::matcher;
use crate::types::{Descriptor, Profile, RankedMatch, WeightConfig};

/// Full output of one identification run.
#[derive(Debug, Clone, Serialize)]
pub struct Identification {
    pub descriptor: Descriptor,
    pub matches: Vec<RankedMatch>,
    pub insights: Insights,
}

pub struct Session {
    backend: Option<Mutex<Box<dyn FaceBackend>>>,
    cached: RwLock<Option<Descriptor>>,
    seed: Option<u64>,
}

impl Session {
    /// Open a session, attempting the backend load once.
    ///
    /// A failed load is a supported condition: the session proceeds with
    /// the heuristic tiers only and never retries.
    pub async fn open<F>(load: F) -> Self
    where
        F: Future<Output = Result<Box<dyn FaceBackend>, BackendError>>,
    {
        let backend = match load.await {
            Ok(backend) => {
                tracing::info!("face analysis backend loaded");
                Some(Mutex::new(backend))
            }
            Err(error) => {
                tracing::warn!(%error, "face analysis backend unavailable; using heuristic tiers");
                None
            }
        };
        Self {
            backend,
            cached: RwLock::new(None),
            seed: None,
        }
    }

    /// A session with no backend at all.
    pub fn heuristic_only() -> Self {
        Self {
            backend: None,
            cached: RwLock::new(None),
            seed: None,
        }
    }

    /// Fix the seed of the heuristic tiers' random source, making every
    /// analysis in this session deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Analyze an upload and cache the descriptor, superseding any
    /// previous analysis.
    pub async fn analyze(&self, bytes: &[u8]) -> Descriptor {
        let mut rng = self.rng();
        let descriptor = match &self.backend {
            Some(backend) => {
                let mut guard = backend.lock().await;
                extractor::extract_bytes(Some(guard.as_mut()), bytes, &mut rng)
            }
            None => extractor::extract_bytes(None, bytes, &mut rng),
        };

        *self
            .cached
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(descriptor.clone());

        descriptor
    }

    /// The descriptor from the most recent analysis, if any.
    pub fn cached(&self) -> Option<Descriptor> {
        self.cached
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Score the cached descriptor against a gallery. `None` when nothing
    /// has been analyzed yet.
    pub fn score_cached(
        &self,
        candidates: &[Profile],
        weights: &WeightConfig,
    ) -> Option<Vec<RankedMatch>> {
        self.cached()
            .map(|descriptor| matcher::score(&descriptor, candidates, weights))
    }

    /// Analyze an upload and score it against a gallery in one step.
    pub async fn identify(
        &self,
        bytes: &[u8],
        candidates: &[Profile],
        weights: &WeightConfig,
    ) -> Identification {
        let descriptor = self.analyze(bytes).await;
        let matches = matcher::score(&descriptor, candidates, weights);
        let insights = insights::generate(&descriptor, &matches);
        Identification {
            descriptor,
            matches,
            insights,
        }
    }
}
