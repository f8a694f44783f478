//! Landmark geometry — measurements and shape classification over the
//! standard 68-point facial landmark layout.
//!
//! Point indices follow the usual 68-point convention: jaw 0–16, left brow
//! 17–21, right brow 22–26, nose 27–35, left eye 36–41, right eye 42–47,
//! mouth 48–67.

use crate::types::{EyeShape, FaceShape, LandmarkMetrics, MouthShape, NoseShape, Shapes};

/// Required landmark count for all geometric helpers.
pub const LANDMARK_COUNT: usize = 68;

// --- Classification thresholds ---
const EYE_ROUND_RATIO: f32 = 0.35;
const EYE_ALMOND_RATIO: f32 = 0.25;
const NOSE_WIDE_RATIO: f32 = 0.8;
const NOSE_MEDIUM_RATIO: f32 = 0.6;
const MOUTH_FULL_RATIO: f32 = 0.4;
const MOUTH_MEDIUM_RATIO: f32 = 0.25;
const FACE_OVAL_RATIO: f32 = 1.3;
const FACE_SQUARE_RATIO: f32 = 1.1;
const FACE_SQUARE_JAW_RATIO: f32 = 0.8;
const FACE_ROUND_RATIO: f32 = 0.9;

/// Euclidean distance between two 2D points.
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

/// Arch ratio of a brow curve: midpoint deviation from the start/end
/// baseline, normalized by baseline length. Zero for degenerate curves.
fn arch_ratio(points: &[(f32, f32)]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let start = points[0];
    let end = points[points.len() - 1];
    let middle = points[points.len() / 2];

    let base = distance(start, end);
    if base <= 0.0 {
        return 0.0;
    }
    (middle.1 - (start.1 + end.1) / 2.0).abs() / base
}

/// Average arch ratio over both eyebrows.
pub fn eyebrow_arch(landmarks: &[(f32, f32)]) -> f32 {
    let left = arch_ratio(&landmarks[17..22]);
    let right = arch_ratio(&landmarks[22..27]);
    (left + right) / 2.0
}

/// Angle at `b` formed by the segments `b→a` and `b→c`, in radians.
/// Zero when either segment is degenerate.
fn angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let v1 = (a.0 - b.0, a.1 - b.1);
    let v2 = (c.0 - b.0, c.1 - b.1);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    if mag1 <= 0.0 || mag2 <= 0.0 {
        return 0.0;
    }
    (dot / (mag1 * mag2)).clamp(-1.0, 1.0).acos()
}

/// Mean absolute turning angle across consecutive jaw-point triples.
pub fn jawline_sharpness(landmarks: &[(f32, f32)]) -> f32 {
    let jaw = &landmarks[0..17];
    let mut total = 0.0f32;
    for i in 1..jaw.len() - 1 {
        total += angle(jaw[i - 1], jaw[i], jaw[i + 1]).abs();
    }
    total / (jaw.len() - 2) as f32
}

/// Openness ratio of a 6-point eye contour: mean vertical span over
/// horizontal span.
fn eye_ratio(eye: &[(f32, f32)]) -> f32 {
    let width = distance(eye[0], eye[3]);
    let height = (distance(eye[1], eye[5]) + distance(eye[2], eye[4])) / 2.0;
    if width <= 0.0 {
        return 0.0;
    }
    height / width
}

pub fn eye_shape_from_ratio(ratio: f32) -> EyeShape {
    if ratio > EYE_ROUND_RATIO {
        EyeShape::Round
    } else if ratio > EYE_ALMOND_RATIO {
        EyeShape::Almond
    } else {
        EyeShape::Narrow
    }
}

pub fn classify_eyes(landmarks: &[(f32, f32)]) -> EyeShape {
    let left = eye_ratio(&landmarks[36..42]);
    let right = eye_ratio(&landmarks[42..48]);
    eye_shape_from_ratio((left + right) / 2.0)
}

pub fn nose_shape_from_ratio(ratio: f32) -> NoseShape {
    if ratio > NOSE_WIDE_RATIO {
        NoseShape::Wide
    } else if ratio > NOSE_MEDIUM_RATIO {
        NoseShape::Medium
    } else {
        NoseShape::Narrow
    }
}

pub fn classify_nose(landmarks: &[(f32, f32)]) -> NoseShape {
    let width = distance(landmarks[31], landmarks[35]);
    let length = distance(landmarks[27], landmarks[30]);
    if length <= 0.0 {
        return NoseShape::Narrow;
    }
    nose_shape_from_ratio(width / length)
}

pub fn mouth_shape_from_ratio(ratio: f32) -> MouthShape {
    if ratio > MOUTH_FULL_RATIO {
        MouthShape::Full
    } else if ratio > MOUTH_MEDIUM_RATIO {
        MouthShape::Medium
    } else {
        MouthShape::Thin
    }
}

pub fn classify_mouth(landmarks: &[(f32, f32)]) -> MouthShape {
    let width = distance(landmarks[48], landmarks[54]);
    let height = distance(landmarks[51], landmarks[57]);
    if width <= 0.0 {
        return MouthShape::Thin;
    }
    mouth_shape_from_ratio(height / width)
}

pub fn face_shape_from_ratios(height_width: f32, jaw_width: f32) -> FaceShape {
    if height_width > FACE_OVAL_RATIO {
        FaceShape::Oval
    } else if height_width > FACE_SQUARE_RATIO && jaw_width > FACE_SQUARE_JAW_RATIO {
        FaceShape::Square
    } else if height_width < FACE_ROUND_RATIO {
        FaceShape::Round
    } else {
        FaceShape::Heart
    }
}

pub fn classify_face(landmarks: &[(f32, f32)]) -> FaceShape {
    let face_width = distance(landmarks[0], landmarks[16]);
    let face_height = distance(landmarks[19], landmarks[8]);
    let jaw_width = distance(landmarks[4], landmarks[12]);
    if face_width <= 0.0 {
        return FaceShape::Heart;
    }
    face_shape_from_ratios(face_height / face_width, jaw_width / face_width)
}

/// Classify all four regions at once.
pub fn classify_shapes(landmarks: &[(f32, f32)]) -> Shapes {
    Shapes {
        eye: Some(classify_eyes(landmarks)),
        nose: Some(classify_nose(landmarks)),
        mouth: Some(classify_mouth(landmarks)),
        face: Some(classify_face(landmarks)),
    }
}

/// Named measurements off a full landmark set.
pub fn metrics(landmarks: &[(f32, f32)]) -> LandmarkMetrics {
    LandmarkMetrics {
        eye_distance: distance(landmarks[36], landmarks[45]),
        nose_width: distance(landmarks[31], landmarks[35]),
        mouth_width: distance(landmarks[48], landmarks[54]),
        face_width: distance(landmarks[0], landmarks[16]),
        face_height: distance(landmarks[19], landmarks[8]),
        eyebrow_arch: eyebrow_arch(landmarks),
        jawline_sharpness: jawline_sharpness(landmarks),
    }
}

/// Synthetic 68-point landmark set with known classifications:
/// round eyes, medium nose, medium mouth, square face.
#[cfg(test)]
pub(crate) mod testutil {
    pub fn landmarks() -> Vec<(f32, f32)> {
        let mut pts = vec![(0.0f32, 0.0f32); super::LANDMARK_COUNT];

        // Jaw 0-16: face width 140, chin at (70, 196), jaw width 120.
        pts[0] = (0.0, 100.0);
        pts[1] = (2.0, 115.0);
        pts[2] = (5.0, 130.0);
        pts[3] = (7.0, 140.0);
        pts[4] = (10.0, 150.0);
        pts[5] = (20.0, 165.0);
        pts[6] = (35.0, 180.0);
        pts[7] = (52.0, 190.0);
        pts[8] = (70.0, 196.0);
        pts[9] = (88.0, 190.0);
        pts[10] = (105.0, 180.0);
        pts[11] = (120.0, 165.0);
        pts[12] = (130.0, 150.0);
        pts[13] = (133.0, 140.0);
        pts[14] = (135.0, 130.0);
        pts[15] = (138.0, 115.0);
        pts[16] = (140.0, 100.0);

        // Brows 17-26: arch ratio 0.25 each side.
        pts[17] = (20.0, 30.0);
        pts[18] = (30.0, 24.0);
        pts[19] = (40.0, 20.0);
        pts[20] = (50.0, 24.0);
        pts[21] = (60.0, 30.0);
        pts[22] = (80.0, 30.0);
        pts[23] = (90.0, 24.0);
        pts[24] = (100.0, 20.0);
        pts[25] = (110.0, 24.0);
        pts[26] = (120.0, 30.0);

        // Nose 27-35: length 30, width 20 → ratio 0.667 (medium).
        pts[27] = (70.0, 60.0);
        pts[28] = (70.0, 70.0);
        pts[29] = (70.0, 80.0);
        pts[30] = (70.0, 90.0);
        pts[31] = (60.0, 95.0);
        pts[32] = (65.0, 96.0);
        pts[33] = (70.0, 97.0);
        pts[34] = (75.0, 96.0);
        pts[35] = (80.0, 95.0);

        // Eyes 36-47: width 20, heights 8 → ratio 0.4 (round).
        pts[36] = (30.0, 60.0);
        pts[37] = (35.0, 56.0);
        pts[38] = (45.0, 56.0);
        pts[39] = (50.0, 60.0);
        pts[40] = (45.0, 64.0);
        pts[41] = (35.0, 64.0);
        pts[42] = (90.0, 60.0);
        pts[43] = (95.0, 56.0);
        pts[44] = (105.0, 56.0);
        pts[45] = (110.0, 60.0);
        pts[46] = (105.0, 64.0);
        pts[47] = (95.0, 64.0);

        // Mouth 48-67: width 40, height 12 → ratio 0.3 (medium).
        pts[48] = (50.0, 150.0);
        pts[49] = (57.0, 146.0);
        pts[50] = (63.0, 144.0);
        pts[51] = (70.0, 144.0);
        pts[52] = (77.0, 144.0);
        pts[53] = (83.0, 146.0);
        pts[54] = (90.0, 150.0);
        pts[55] = (83.0, 154.0);
        pts[56] = (77.0, 156.0);
        pts[57] = (70.0, 156.0);
        pts[58] = (63.0, 156.0);
        pts[59] = (57.0, 154.0);
        pts[60] = (55.0, 150.0);
        pts[61] = (63.0, 148.0);
        pts[62] = (70.0, 148.0);
        pts[63] = (77.0, 148.0);
        pts[64] = (85.0, 150.0);
        pts[65] = (77.0, 152.0);
        pts[66] = (70.0, 152.0);
        pts[67] = (63.0, 152.0);

        pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert!((distance((0.0, 0.0), (3.0, 4.0)) - 5.0).abs() < 1e-6);
        assert_eq!(distance((1.0, 1.0), (1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_eye_shape_thresholds() {
        assert_eq!(eye_shape_from_ratio(0.40), EyeShape::Round);
        assert_eq!(eye_shape_from_ratio(0.30), EyeShape::Almond);
        assert_eq!(eye_shape_from_ratio(0.10), EyeShape::Narrow);
    }

    #[test]
    fn test_eye_ratio_from_points() {
        // Width 20, vertical spans 8 and 8 → ratio 0.4
        let eye = [
            (0.0, 0.0),
            (5.0, -4.0),
            (15.0, -4.0),
            (20.0, 0.0),
            (15.0, 4.0),
            (5.0, 4.0),
        ];
        assert!((eye_ratio(&eye) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_nose_shape_thresholds() {
        assert_eq!(nose_shape_from_ratio(0.85), NoseShape::Wide);
        assert_eq!(nose_shape_from_ratio(0.7), NoseShape::Medium);
        assert_eq!(nose_shape_from_ratio(0.5), NoseShape::Narrow);
    }

    #[test]
    fn test_mouth_shape_thresholds() {
        assert_eq!(mouth_shape_from_ratio(0.45), MouthShape::Full);
        assert_eq!(mouth_shape_from_ratio(0.3), MouthShape::Medium);
        assert_eq!(mouth_shape_from_ratio(0.2), MouthShape::Thin);
    }

    #[test]
    fn test_face_shape_rules() {
        assert_eq!(face_shape_from_ratios(1.35, 0.7), FaceShape::Oval);
        assert_eq!(face_shape_from_ratios(1.2, 0.85), FaceShape::Square);
        assert_eq!(face_shape_from_ratios(0.85, 0.85), FaceShape::Round);
        assert_eq!(face_shape_from_ratios(1.0, 0.7), FaceShape::Heart);
    }

    #[test]
    fn test_arch_ratio() {
        // Baseline 40, mid deviation 10 → 0.25
        let brow = [
            (0.0, 10.0),
            (10.0, 4.0),
            (20.0, 0.0),
            (30.0, 4.0),
            (40.0, 10.0),
        ];
        assert!((arch_ratio(&brow) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_arch_ratio_degenerate() {
        assert_eq!(arch_ratio(&[(0.0, 0.0), (1.0, 1.0)]), 0.0);
        // Coincident start/end → zero baseline
        let flat = [(5.0, 5.0); 5];
        assert_eq!(arch_ratio(&flat), 0.0);
    }

    #[test]
    fn test_angle_right() {
        let a = (1.0, 0.0);
        let b = (0.0, 0.0);
        let c = (0.0, 1.0);
        assert!((angle(a, b, c) - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_angle_degenerate_is_zero() {
        assert_eq!(angle((0.0, 0.0), (0.0, 0.0), (1.0, 0.0)), 0.0);
    }

    #[test]
    fn test_jawline_straight_vs_angular() {
        // A straight jaw has turning angles of π at every interior point;
        // a sharply bent jaw deviates from π. Compare mean angles.
        let straight: Vec<(f32, f32)> = (0..17).map(|i| (i as f32, 0.0)).collect();
        let mut bent = straight.clone();
        bent[8] = (8.0, 6.0);

        let mut full_straight = straight;
        full_straight.resize(LANDMARK_COUNT, (0.0, 0.0));
        let mut full_bent = bent;
        full_bent.resize(LANDMARK_COUNT, (0.0, 0.0));

        let s = jawline_sharpness(&full_straight);
        let b = jawline_sharpness(&full_bent);
        assert!((s - std::f32::consts::PI).abs() < 1e-4, "straight jaw mean angle {s}");
        assert!(b < s, "bent jaw mean angle {b} should drop below the straight jaw's {s}");
    }

    #[test]
    fn test_synthetic_landmark_classification() {
        let pts = testutil::landmarks();
        assert_eq!(classify_eyes(&pts), EyeShape::Round);
        assert_eq!(classify_nose(&pts), NoseShape::Medium);
        assert_eq!(classify_mouth(&pts), MouthShape::Medium);
        assert_eq!(classify_face(&pts), FaceShape::Square);
    }

    #[test]
    fn test_synthetic_landmark_metrics() {
        let pts = testutil::landmarks();
        let m = metrics(&pts);
        assert!((m.eye_distance - 80.0).abs() < 1e-4);
        assert!((m.nose_width - 20.0).abs() < 1e-4);
        assert!((m.mouth_width - 40.0).abs() < 1e-4);
        assert!((m.face_width - 140.0).abs() < 1e-4);
        assert!((m.eyebrow_arch - 0.25).abs() < 1e-4);
        assert!(m.jawline_sharpness > 0.0);
    }
}
