//! Weighted match scoring against a candidate gallery.
//!
//! Each candidate is scored independently over three optional components
//! (shape labels, embedding distance, age/gender), normalized by the sum
//! of the weights that actually applied, and dampened by the query's
//! quality score. Candidates are returned sorted by score, best first;
//! ties keep their input order.

use crate::types::{
    AgeGender, ConfidenceTier, Descriptor, Profile, RankedMatch, ScoreBreakdown, Shapes,
    WeightConfig,
};

// --- Age/gender component weighting ---
const AGE_WEIGHT: f32 = 0.6;
const GENDER_WEIGHT: f32 = 0.4;
const AGE_RANGE: f32 = 50.0;

/// Accumulator for optional weighted terms.
///
/// Absent terms contribute neither score nor weight, so the normalizer
/// only covers the components that were actually compared.
#[derive(Default)]
struct WeightedSum {
    total: f32,
    weight: f32,
}

impl WeightedSum {
    fn add(&mut self, term: Option<f32>, weight: f32) {
        if let Some(value) = term {
            self.total += value * weight;
            self.weight += weight;
        }
    }

    /// Normalized average, or 0 when no term applied.
    fn finish(&self) -> f32 {
        if self.weight > 0.0 {
            self.total / self.weight
        } else {
            0.0
        }
    }
}

/// Fraction of shape labels that match exactly, over the labels present on
/// both sides. `None` when nothing is comparable.
pub fn feature_match(a: &Shapes, b: &Shapes) -> Option<f32> {
    let mut matches = 0u32;
    let mut comparisons = 0u32;

    let mut compare = |equal: Option<bool>| {
        if let Some(equal) = equal {
            comparisons += 1;
            if equal {
                matches += 1;
            }
        }
    };

    compare(a.eye.zip(b.eye).map(|(x, y)| x == y));
    compare(a.nose.zip(b.nose).map(|(x, y)| x == y));
    compare(a.mouth.zip(b.mouth).map(|(x, y)| x == y));
    compare(a.face.zip(b.face).map(|(x, y)| x == y));

    if comparisons == 0 {
        return None;
    }
    Some(matches as f32 / comparisons as f32)
}

/// Euclidean-distance similarity between two embeddings, clamped to [0, 1].
///
/// Vectors of unequal length are compared up to the shorter length; that is
/// a defensive guarantee, not a correctness one.
pub fn descriptor_match(a: &[f32], b: &[f32]) -> f32 {
    let distance: f32 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt();
    (1.0 - distance).max(0.0)
}

/// Demographic similarity: age closeness (floored at a 50-year difference)
/// blended with gender equality.
pub fn age_gender_match(a: &AgeGender, b: &AgeGender) -> f32 {
    let age_diff = a.age.abs_diff(b.age) as f32;
    let age_score = (1.0 - age_diff / AGE_RANGE).max(0.0);
    let gender_score = if a.gender == b.gender { 1.0 } else { 0.0 };
    AGE_WEIGHT * age_score + GENDER_WEIGHT * gender_score
}

/// Score one candidate against the query descriptor.
fn score_candidate(query: &Descriptor, profile: &Profile, weights: &WeightConfig) -> RankedMatch {
    let feature = feature_match(&query.shapes, &profile.shapes);

    let descriptor = profile
        .vector
        .as_deref()
        .filter(|v| !v.is_empty() && !query.vector.is_empty())
        .map(|v| descriptor_match(&query.vector, v));

    let age_gender = profile
        .age_gender
        .as_ref()
        .map(|ag| age_gender_match(&query.age_gender, ag));

    let mut sum = WeightedSum::default();
    sum.add(feature, weights.features);
    sum.add(descriptor, weights.descriptor);
    sum.add(age_gender, weights.age_gender);

    let quality_factor = query.quality_score.min(1.0);
    let combined_score = sum.finish() * quality_factor;

    RankedMatch {
        profile: profile.clone(),
        combined_score,
        tier: ConfidenceTier::from_score(combined_score),
        breakdown: ScoreBreakdown {
            feature_match: feature,
            descriptor_match: descriptor,
            age_gender_match: age_gender,
        },
    }
}

/// Score every candidate and rank them, best first.
///
/// Uses a stable sort so candidates with equal scores keep their input
/// order.
pub fn score(query: &Descriptor, candidates: &[Profile], weights: &WeightConfig) -> Vec<RankedMatch> {
    let mut results: Vec<RankedMatch> = candidates
        .iter()
        .map(|profile| score_candidate(query, profile, weights))
        .collect();

    results.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    tracing::debug!(
        candidates = candidates.len(),
        top_score = results.first().map(|r| r.combined_score),
        "scoring run complete"
    );

    results
}
