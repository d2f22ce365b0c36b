//! Response parsing: pulls the move token and self-reported confidence out
//! of a model response.

use std::sync::LazyLock;

use tracing::debug;

use crate::fields::{CharClass, LabeledField};

/// Confidence assumed when the response does not state one.
pub const DEFAULT_CONFIDENCE: f64 = 100.0;

/// Stated confidences above this are clamped.
pub const MAX_CONFIDENCE: f64 = 100.0;

static MOVE_FIELD: LazyLock<LabeledField> =
    LazyLock::new(|| LabeledField::new("Move", CharClass::MoveChars).expect("valid move pattern"));

static CONFIDENCE_FIELD: LazyLock<LabeledField> = LazyLock::new(|| {
    LabeledField::new("Confidence", CharClass::Digits).expect("valid confidence pattern")
});

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    /// `None` when the response carries no `Move:` label
    pub model_move: Option<String>,
    /// In [0, 100]
    pub confidence: f64,
}

pub fn parse_response(text: &str) -> ParsedResponse {
    ParsedResponse {
        model_move: extract_move(text),
        confidence: extract_confidence(text),
    }
}

pub fn extract_move(text: &str) -> Option<String> {
    MOVE_FIELD.extract(text).map(str::to_string)
}

pub fn extract_confidence(text: &str) -> f64 {
    CONFIDENCE_FIELD
        .extract(text)
        .and_then(|digits| digits.parse::<f64>().ok())
        .map(clamp_confidence)
        .unwrap_or(DEFAULT_CONFIDENCE)
}

fn clamp_confidence(stated: f64) -> f64 {
    if stated > MAX_CONFIDENCE {
        debug!(stated, clamped = MAX_CONFIDENCE, "Confidence above maximum, clamping");
        return MAX_CONFIDENCE;
    }
    stated
}
