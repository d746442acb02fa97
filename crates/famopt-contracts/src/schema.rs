use serde_json::{json, Value};

use crate::analysis::{Impact, SuggestionKind};

pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// Mime type claimed for every inline screenshot, whatever the uploaded format.
pub const INLINE_IMAGE_MIME_TYPE: &str = "image/png";

const REQUIRED_FIELDS: [&str; 8] = [
    "isOverModeled",
    "complexityScore",
    "polygonEstimate",
    "unusedParams",
    "suggestions",
    "lodRecommendations",
    "symbolicCandidates",
    "overallAnalysis",
];

/// Gemini `responseSchema` describing one `OptimizationResult` object.
pub fn response_schema() -> Value {
    let impacts: Vec<&str> = Impact::ALL.iter().map(|impact| impact.as_str()).collect();
    let kinds: Vec<&str> = SuggestionKind::ALL
        .iter()
        .map(|kind| kind.as_str())
        .collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "isOverModeled": { "type": "BOOLEAN" },
            "complexityScore": { "type": "NUMBER" },
            "polygonEstimate": { "type": "STRING" },
            "unusedParams": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
            },
            "suggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "impact": { "type": "STRING", "enum": impacts },
                        "type": { "type": "STRING", "enum": kinds },
                    },
                    "required": ["title", "description", "impact", "type"],
                },
            },
            "lodRecommendations": { "type": "STRING" },
            "symbolicCandidates": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
            },
            "overallAnalysis": { "type": "STRING" },
        },
        "required": REQUIRED_FIELDS,
    })
}
