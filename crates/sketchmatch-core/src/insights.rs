//! Human-readable analysis insights.
//!
//! Pure threshold rules over a descriptor and a ranked match list. No
//! state, no side effects; the strings are display copy for the results
//! view.

use serde::{Deserialize, Serialize};

use crate::types::{Descriptor, RankedMatch};

const STRONG_QUALITY: f32 = 0.8;
const PRECISION_QUALITY: f32 = 0.7;
const LOW_QUALITY: f32 = 0.5;
const CONFIDENT_GENDER: f32 = 0.8;
const CONFIDENT_EXPRESSION: f32 = 0.6;
const STRONG_TOP_SCORE: f32 = 0.8;
const MANY_MATCHES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub level: QualityLevel,
    pub description: String,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub sketch_quality: QualityAssessment,
    pub matching_strategy: Vec<String>,
    pub confidence_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Generate insights for one analysis and its ranked matches.
pub fn generate(descriptor: &Descriptor, matches: &[RankedMatch]) -> Insights {
    Insights {
        sketch_quality: assess_quality(descriptor),
        matching_strategy: recommend_strategy(descriptor),
        confidence_factors: confidence_factors(descriptor, matches),
        recommendations: recommendations(descriptor, matches),
    }
}

fn assess_quality(descriptor: &Descriptor) -> QualityAssessment {
    let quality = descriptor.quality_score;

    if quality >= 0.8 {
        QualityAssessment {
            level: QualityLevel::Excellent,
            description: "High-quality sketch with clear facial features".into(),
            factors: vec![
                "Clear facial boundaries".into(),
                "Detailed features".into(),
                "Good contrast".into(),
            ],
        }
    } else if quality >= 0.6 {
        QualityAssessment {
            level: QualityLevel::Good,
            description: "Good quality sketch suitable for identification".into(),
            factors: vec![
                "Visible features".into(),
                "Adequate detail".into(),
                "Recognizable structure".into(),
            ],
        }
    } else if quality >= 0.4 {
        QualityAssessment {
            level: QualityLevel::Fair,
            description: "Fair quality sketch with some limitations".into(),
            factors: vec![
                "Some unclear features".into(),
                "Limited detail".into(),
                "Partial visibility".into(),
            ],
        }
    } else {
        QualityAssessment {
            level: QualityLevel::Poor,
            description: "Poor quality sketch may limit identification accuracy".into(),
            factors: vec![
                "Unclear features".into(),
                "Low detail".into(),
                "Poor contrast".into(),
            ],
        }
    }
}

fn recommend_strategy(descriptor: &Descriptor) -> Vec<String> {
    let mut strategies = Vec::new();

    if descriptor.quality_score > PRECISION_QUALITY {
        strategies.push("Use high-precision feature matching".into());
    }
    if descriptor.age_gender.gender_probability > CONFIDENT_GENDER {
        strategies.push("Filter by gender for better accuracy".into());
    }
    if descriptor.dominant_expression.confidence > CONFIDENT_EXPRESSION {
        strategies.push("Consider expression-based filtering".into());
    }

    if strategies.is_empty() {
        strategies.push("Use broad matching criteria".into());
    }
    strategies
}

fn confidence_factors(descriptor: &Descriptor, matches: &[RankedMatch]) -> Vec<String> {
    let mut factors = Vec::new();

    if descriptor.quality_score > STRONG_QUALITY {
        factors.push("High sketch quality increases match confidence".into());
    }
    if let Some(top) = matches.first() {
        if top.combined_score > STRONG_TOP_SCORE {
            factors.push("Strong feature correlation with top match".into());
        }
    }
    if descriptor.landmarks.is_some() {
        factors.push("Facial landmarks successfully detected".into());
    }

    factors
}

fn recommendations(descriptor: &Descriptor, matches: &[RankedMatch]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if descriptor.quality_score < LOW_QUALITY {
        recommendations
            .push("Consider uploading a higher quality sketch for better results".into());
    }
    if matches.is_empty() {
        recommendations.push("Try adjusting feature confidence levels".into());
        recommendations.push("Consider expanding search criteria".into());
    }
    if matches.len() > MANY_MATCHES {
        recommendations
            .push("Results show many potential matches - consider narrowing criteria".into());
    }

    recommendations
}
