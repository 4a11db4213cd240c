//! Text response normalization
//!
//! Text-generation models answer either `[{"generated_text": ...}, ...]` or
//! `{"generated_text": ...}`. Anything else maps to a fixed fallback string.

use serde_json::Value;

/// Returned when a response carries no usable text
pub const NO_TEXT_FALLBACK: &str = "No response generated";

/// Recognized text response shapes
#[derive(Debug, PartialEq)]
enum TextShape<'a> {
    /// Non-empty array whose first element carries `generated_text`
    Sequence(&'a str),
    /// Single object carrying `generated_text`
    Single(&'a str),
    Unrecognized,
}

impl<'a> TextShape<'a> {
    fn classify(response: &'a Value) -> Self {
        match response {
            Value::Array(items) => items
                .first()
                .and_then(generated_text)
                .map_or(TextShape::Unrecognized, TextShape::Sequence),
            Value::Object(_) => {
                generated_text(response).map_or(TextShape::Unrecognized, TextShape::Single)
            }
            _ => TextShape::Unrecognized,
        }
    }
}

fn generated_text(value: &Value) -> Option<&str> {
    value.as_object()?.get("generated_text")?.as_str()
}

/// Extract display text from a text-generation response. Never fails.
pub fn extract_generated_text(response: &Value) -> String {
    match TextShape::classify(response) {
        TextShape::Sequence(text) | TextShape::Single(text) => text.to_string(),
        TextShape::Unrecognized => NO_TEXT_FALLBACK.to_string(),
    }
}
