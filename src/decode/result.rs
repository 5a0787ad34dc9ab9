// SPDX-License-Identifier: MPL-2.0
//! Result types returned by the decoding engine.
//!
//! Positions are reported in the image's natural pixel coordinates; the
//! overlay canvas maps them into display space when drawing.

use serde::{Deserialize, Serialize};

/// A point in natural pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Four-point bounding quadrilateral of a detected symbol.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Quad {
    /// Corner points in stroke order.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }
}

/// One decoded symbol as reported by the engine.
///
/// Consumed as an opaque record: the engine decides what `is_valid`
/// means and how `text` was derived from `bytes`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeResult {
    pub is_valid: bool,
    /// Format name as reported by the engine.
    #[serde(default)]
    pub format: String,
    /// Decoded text, rendered per the configured text mode.
    #[serde(default)]
    pub text: String,
    /// Raw decoded bytes.
    #[serde(default)]
    pub bytes: Vec<u8>,
    /// Engine error description for invalid results, when requested.
    #[serde(default)]
    pub error: Option<String>,
    /// Bounding quadrilateral in natural pixel coordinates.
    #[serde(default)]
    pub position: Quad,
}

/// Aggregate verdict over the results of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every reported result is valid.
    Full,
    /// Some results are valid, some are not.
    Partial,
    /// No valid result (including "no result at all").
    Empty,
}

impl ScanOutcome {
    /// Summarizes a batch of results into a single verdict.
    #[must_use]
    pub fn summarize(results: &[DecodeResult]) -> Self {
        let valid = results.iter().filter(|result| result.is_valid).count();
        if valid == 0 {
            ScanOutcome::Empty
        } else if valid < results.len() {
            ScanOutcome::Partial
        } else {
            ScanOutcome::Full
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(is_valid: bool) -> DecodeResult {
        DecodeResult {
            is_valid,
            ..DecodeResult::default()
        }
    }

    #[test]
    fn summarize_empty_batch_is_empty() {
        assert_eq!(ScanOutcome::summarize(&[]), ScanOutcome::Empty);
    }

    #[test]
    fn summarize_all_valid_is_full() {
        assert_eq!(
            ScanOutcome::summarize(&[result(true), result(true)]),
            ScanOutcome::Full
        );
    }

    #[test]
    fn summarize_mixed_batch_is_partial() {
        assert_eq!(
            ScanOutcome::summarize(&[result(true), result(false)]),
            ScanOutcome::Partial
        );
    }

    #[test]
    fn summarize_all_invalid_is_empty() {
        assert_eq!(
            ScanOutcome::summarize(&[result(false)]),
            ScanOutcome::Empty
        );
    }

    #[test]
    fn quad_corners_are_in_stroke_order() {
        let quad = Quad {
            top_left: Point::new(0.0, 0.0),
            top_right: Point::new(10.0, 0.0),
            bottom_right: Point::new(10.0, 5.0),
            bottom_left: Point::new(0.0, 5.0),
        };
        let corners = quad.corners();
        assert_eq!(corners[0], quad.top_left);
        assert_eq!(corners[2], quad.bottom_right);
    }

    #[test]
    fn results_deserialize_from_engine_payload() {
        let payload = r#"[{
            "isValid": true,
            "format": "QRCode",
            "text": "hello",
            "bytes": [104, 101, 108, 108, 111],
            "position": {
                "topLeft": {"x": 1.0, "y": 2.0},
                "topRight": {"x": 3.0, "y": 2.0},
                "bottomRight": {"x": 3.0, "y": 4.0},
                "bottomLeft": {"x": 1.0, "y": 4.0}
            }
        }]"#;

        let results: Vec<DecodeResult> = serde_json::from_str(payload).expect("parse payload");
        assert_eq!(results.len(), 1);
        assert!(results[0].is_valid);
        assert_eq!(results[0].text, "hello");
        assert_eq!(results[0].position.top_right.x, 3.0);
    }
}
