//! Pluggable face-analysis backend.
//!
//! The advanced extraction tier delegates detection to a [`FaceBackend`].
//! No real model ships with this crate; the trait exists so a detector can
//! be plugged in, and so the tier is testable with scripted detections.
//! Absence of a backend is a supported condition, not an error.

use std::collections::BTreeMap;

use image::DynamicImage;
use thiserror::Error;

use crate::types::Gender;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("face analysis backend unavailable: {0}")]
    Unavailable(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

/// Axis-aligned bounding box for a detected face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FaceBox {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// One detected face with everything the extractor consumes.
#[derive(Debug, Clone)]
pub struct DetectedFace {
    pub bounding_box: FaceBox,
    /// Detector confidence for this face, [0, 1].
    pub detection_score: f32,
    /// 68-point landmark set in source-image coordinates.
    pub landmarks: Vec<(f32, f32)>,
    /// 128-dimensional face embedding.
    pub descriptor: Vec<f32>,
    pub expressions: BTreeMap<String, f32>,
    pub age: f32,
    pub gender: Gender,
    pub gender_probability: f32,
}

/// Face-analysis capability for the advanced extraction tier.
///
/// Implementations return detected faces sorted by detection score,
/// best first. An empty result is a valid outcome (no face in frame).
pub trait FaceBackend: Send {
    fn detect_faces(&mut self, image: &DynamicImage) -> Result<Vec<DetectedFace>, BackendError>;
}

/// Backend returning a fixed set of detections for every image.
///
/// Used to exercise the advanced tier without a model.
pub struct ScriptedBackend {
    faces: Vec<DetectedFace>,
}

impl ScriptedBackend {
    pub fn new(faces: Vec<DetectedFace>) -> Self {
        Self { faces }
    }

    /// A backend that never finds a face.
    pub fn empty() -> Self {
        Self { faces: Vec::new() }
    }
}

impl FaceBackend for ScriptedBackend {
    fn detect_faces(&mut self, _image: &DynamicImage) -> Result<Vec<DetectedFace>, BackendError> {
        Ok(self.faces.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_box_area() {
        let b = FaceBox {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
        };
        assert!((b.area() - 5000.0).abs() < 1e-6);
    }

    #[test]
    fn test_scripted_backend_empty() {
        let mut backend = ScriptedBackend::empty();
        let image = DynamicImage::new_rgb8(4, 4);
        let faces = backend.detect_faces(&image).unwrap();
        assert!(faces.is_empty());
    }
}
