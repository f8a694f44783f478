use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which extraction tier produced a descriptor.
///
/// `Basic` and `Fallback` descriptors carry synthesized values; downstream
/// logic may inspect this tag before trusting the vector fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Advanced,
    Basic,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeShape {
    Round,
    Almond,
    Narrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoseShape {
    Narrow,
    Medium,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouthShape {
    Thin,
    Medium,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceShape {
    Oval,
    Round,
    Square,
    Heart,
}

/// Categorical shape classification for the four compared facial regions.
///
/// A query descriptor always carries all four labels; candidate profiles may
/// carry any subset. Scoring compares only the labels present on both sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shapes {
    pub eye: Option<EyeShape>,
    pub nose: Option<NoseShape>,
    pub mouth: Option<MouthShape>,
    pub face: Option<FaceShape>,
}

impl Shapes {
    /// True when no region carries a label.
    pub fn is_empty(&self) -> bool {
        self.eye.is_none() && self.nose.is_none() && self.mouth.is_none() && self.face.is_none()
    }
}

/// Named landmark-derived measurements, in source-image pixel units
/// (ratios for `eyebrow_arch` and `jawline_sharpness`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkMetrics {
    pub eye_distance: f32,
    pub nose_width: f32,
    pub mouth_width: f32,
    pub face_width: f32,
    pub face_height: f32,
    pub eyebrow_arch: f32,
    pub jawline_sharpness: f32,
}

/// Estimated demographics for one face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGender {
    pub age: u32,
    pub gender: Gender,
    /// Confidence in the gender estimate, [0, 1].
    pub gender_probability: f32,
}

/// The highest-confidence entry of an expression distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantExpression {
    pub label: String,
    pub confidence: f32,
}

impl DominantExpression {
    /// Pick the max entry of an expression distribution.
    ///
    /// Defaults to a zero-confidence "neutral" for an empty distribution.
    /// Ties keep the first entry in map order.
    pub fn from_distribution(expressions: &BTreeMap<String, f32>) -> Self {
        let mut label = "neutral".to_string();
        let mut confidence = 0.0f32;
        for (name, &value) in expressions {
            if value > confidence {
                confidence = value;
                label = name.clone();
            }
        }
        Self { label, confidence }
    }
}

/// Structured output of facial feature extraction for one image.
///
/// Every descriptor has the same field shape regardless of which tier
/// produced it; only `landmarks` may be absent (landmark detection failed
/// or never ran).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Detector confidence that a face was found, [0, 1].
    pub confidence: f32,
    /// Fixed-length embedding; meaningful only under Euclidean comparison
    /// against another vector of equal length.
    pub vector: Vec<f32>,
    pub landmarks: Option<LandmarkMetrics>,
    pub shapes: Shapes,
    /// Per-expression confidence; not required to sum to 1.
    pub expressions: BTreeMap<String, f32>,
    pub dominant_expression: DominantExpression,
    pub age_gender: AgeGender,
    /// Composite quality signal, [0, 1].
    pub quality_score: f32,
    pub provenance: Provenance,
}

/// A static candidate record compared against a query descriptor.
///
/// Profiles are immutable reference data; the core never creates or
/// mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub charges: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub shapes: Shapes,
    #[serde(default)]
    pub age_gender: Option<AgeGender>,
    #[serde(default)]
    pub vector: Option<Vec<f32>>,
}

/// Relative contribution of each comparison component.
///
/// Weights need not sum to 1; the scorer normalizes by the sum of weights
/// actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    #[serde(default = "WeightConfig::default_features")]
    pub features: f32,
    #[serde(default = "WeightConfig::default_descriptor")]
    pub descriptor: f32,
    #[serde(default = "WeightConfig::default_age_gender")]
    pub age_gender: f32,
}

impl WeightConfig {
    fn default_features() -> f32 {
        0.3
    }

    fn default_descriptor() -> f32 {
        0.4
    }

    fn default_age_gender() -> f32 {
        0.2
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            features: Self::default_features(),
            descriptor: Self::default_descriptor(),
            age_gender: Self::default_age_gender(),
        }
    }
}

/// Human-readable confidence band for a combined score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceTier {
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            Self::VeryHigh
        } else if score >= 0.6 {
            Self::High
        } else if score >= 0.4 {
            Self::Medium
        } else if score >= 0.2 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::VeryHigh => "very_high",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::VeryLow => "very_low",
        };
        f.write_str(s)
    }
}

/// Per-component scores for one candidate. `None` means the component
/// could not be compared and contributed no weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub feature_match: Option<f32>,
    pub descriptor_match: Option<f32>,
    pub age_gender_match: Option<f32>,
}

/// One candidate's scored result. Created fresh per scoring run, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub profile: Profile,
    pub combined_score: f32,
    pub tier: ConfidenceTier,
    pub breakdown: ScoreBreakdown,
}
