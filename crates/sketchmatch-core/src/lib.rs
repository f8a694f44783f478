//! sketchmatch-core — facial sketch feature extraction and weighted
//! match scoring.
//!
//! A query image goes through tiered feature extraction (a pluggable
//! detection backend with graceful degradation to image-statistic
//! heuristics), producing a [`Descriptor`]. The scorer ranks a gallery of
//! candidate [`Profile`]s against that descriptor under user-adjustable
//! component weights.

pub mod backend;
pub mod extractor;
pub mod geometry;
pub mod insights;
pub mod matcher;
pub mod session;
pub mod types;
pub mod validate;

pub use session::{Identification, Session};
pub use types::{Descriptor, Profile, RankedMatch, WeightConfig};
