//! Structured-output extraction from free-text model replies.
//!
//! ```rust
//! use mclient::extract_emotion;
//! use mexpress::Emotion;
//!
//! let reply = r#"Sure! {"emotion": "happy", "intensity": 1.4} Have a nice day"#;
//! let result = extract_emotion(reply).expect("reply carries an object");
//!
//! assert_eq!(result.emotion, Emotion::Happy);
//! assert_eq!(result.intensity, 1.0);
//! ```

use mexpress::{DEFAULT_INTENSITY, Emotion, EmotionResult};
use serde_json::Value;

use crate::error::ClientError;

/// Pulls an emotion reading out of a noisy text reply.
///
/// The first balanced `{...}` substring is parsed as JSON; braces inside
/// JSON strings do not count toward balance. Field-level defects are
/// repaired with defaults, so only a reply with no parseable object at
/// all is an error. Error messages name the text length rather than the
/// text itself.
pub fn extract_emotion(text: &str) -> Result<EmotionResult, ClientError> {
    let snippet = first_balanced_object(text).ok_or_else(|| {
        ClientError::malformed_response(format!(
            "no JSON object found in reply text ({} chars)",
            text.chars().count()
        ))
    })?;
    let value: Value = serde_json::from_str(snippet).map_err(|_| {
        ClientError::malformed_response(format!(
            "reply carries a brace-delimited block that is not valid JSON ({} chars)",
            text.chars().count()
        ))
    })?;
    Ok(repair_fields(&value))
}

/// Applies the documented defaults: unknown or missing emotion labels
/// become neutral, bad intensities become 0.5, and the result is clamped.
fn repair_fields(value: &Value) -> EmotionResult {
    let emotion = value
        .get("emotion")
        .and_then(Value::as_str)
        .and_then(Emotion::from_label)
        .unwrap_or_default();
    let intensity = value
        .get("intensity")
        .map(coerce_intensity)
        .unwrap_or(DEFAULT_INTENSITY);
    EmotionResult::new(emotion, intensity)
}

fn coerce_intensity(value: &Value) -> f32 {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .map(|number| number as f32)
        .filter(|number| number.is_finite())
        .unwrap_or(DEFAULT_INTENSITY)
}

/// Finds the first substring that forms a balanced top-level object.
/// Candidates that never close (for instance a stray `{` in prose) are
/// skipped in favor of the next opening brace.
fn first_balanced_object(text: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(found) = text[search_from..].find('{') {
        let start = search_from + found;
        if let Some(end) = balanced_end(text, start) {
            return Some(&text[start..end]);
        }
        search_from = start + 1;
    }
    None
}

fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}
