//! Response schemas declared to the model for structured (JSON) replies.
//!
//! The provider enforces these shapes on its side; callers still validate the
//! reply into typed structs, since nothing guarantees the schema was honoured.

use serde_json::{Value, json};

/// `{ corrections: [{ original, improved, why }], confidenceScore }`
#[must_use]
pub fn review_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "corrections": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "original": { "type": "STRING" },
                        "improved": { "type": "STRING" },
                        "why": { "type": "STRING" }
                    }
                }
            },
            "confidenceScore": { "type": "NUMBER" }
        },
        "required": ["corrections", "confidenceScore"]
    })
}

/// `{ type, exercise_id, instructions, pairs: [{ id, text, audio_text }] }`
#[must_use]
pub fn match_pairs_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "type": { "type": "STRING" },
            "exercise_id": { "type": "STRING" },
            "instructions": { "type": "STRING" },
            "pairs": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "text": { "type": "STRING" },
                        "audio_text": { "type": "STRING" }
                    },
                    "required": ["id", "text", "audio_text"]
                }
            }
        },
        "required": ["type", "exercise_id", "instructions", "pairs"]
    })
}

/// `{ feedback }`
#[must_use]
pub fn feedback_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "feedback": { "type": "STRING" }
        },
        "required": ["feedback"]
    })
}
