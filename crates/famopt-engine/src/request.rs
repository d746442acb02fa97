use famopt_contracts::analysis::{AnalysisInput, FamilyCategory};
use famopt_contracts::schema::{response_schema, INLINE_IMAGE_MIME_TYPE, RESPONSE_MIME_TYPE};
use serde_json::{json, Value};

pub const CONTEXT_PLACEHOLDER: &str = "None provided";

#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

/// Everything sent to the model for one analysis.
///
/// `category` and `file_size_mb` are kept for providers and logs; the model only
/// sees them through the instruction text.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub category: FamilyCategory,
    pub file_size_mb: f64,
    pub instruction: String,
    pub image: Option<InlineImage>,
    pub response_mime_type: String,
    pub response_schema: Value,
}

impl AnalysisRequest {
    /// Body for a Gemini `generateContent` call.
    pub fn to_generate_content_payload(&self) -> Value {
        let mut parts = vec![json!({ "text": self.instruction })];
        if let Some(image) = self.image.as_ref() {
            parts.push(json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": image.data,
                }
            }));
        }
        json!({
            "contents": [{
                "role": "user",
                "parts": parts,
            }],
            "generationConfig": {
                "responseMimeType": self.response_mime_type,
                "responseSchema": self.response_schema,
            },
        })
    }
}

pub fn build_analysis_request(input: &AnalysisInput) -> AnalysisRequest {
    let image = input.image.as_ref().map(|image| InlineImage {
        mime_type: INLINE_IMAGE_MIME_TYPE.to_string(),
        data: image.payload().to_string(),
    });
    AnalysisRequest {
        category: input.category,
        file_size_mb: input.file_size_mb,
        instruction: analysis_instruction(input),
        image,
        response_mime_type: RESPONSE_MIME_TYPE.to_string(),
        response_schema: response_schema(),
    }
}

fn analysis_instruction(input: &AnalysisInput) -> String {
    let context = input.additional_context.trim();
    let context = if context.is_empty() {
        CONTEXT_PLACEHOLDER
    } else {
        context
    };
    format!(
        "You are an expert BIM Manager and Revit Family Developer.
Analyze the attached screenshot of a Revit Family and the provided metadata.

Metadata:
- Category: {category}
- Reported File Size: {file_size} MB
- User Context: {context}

Your task is to:
1. Determine if the family is \"Over-Modeled\" (too complex for general BIM use).
2. Visually estimate the polygon density/count based on the geometry shown.
3. Identify elements that should likely be 2D Symbolic Lines instead of 3D solids.
4. Suggest specific items to delete or simplify for lower LODs (Level of Development).
5. Suggest potential unused parameters common for this category that might be cluttering the family (infer based on standard bad practices if not visible).

Respond with exactly one JSON object matching the declared response schema and nothing else:
- isOverModeled: boolean
- complexityScore: number from 0 to 100, where 100 is extremely complex
- polygonEstimate: string such as \"Low (<1000)\", \"Medium (1000-5000)\" or \"High (>5000)\"
- unusedParams: list of potentially unused parameters
- suggestions: list of {{title, description, impact: High|Medium|Low, type: Deletion|Symbolic|Simplification|Parameter}}
- lodRecommendations: advice on LOD 200 vs LOD 400
- symbolicCandidates: parts of the geometry to turn into symbolic lines
- overallAnalysis: brief summary paragraph",
        category = input.category.label(),
        file_size = input.file_size_mb,
    )
}

#[cfg(test)]
mod tests {
    use famopt_contracts::analysis::{AnalysisInput, EncodedImage, FamilyCategory};
    use serde_json::json;

    use super::*;

    fn input(image: Option<&str>, context: &str) -> AnalysisInput {
        AnalysisInput {
            category: FamilyCategory::Furniture,
            file_size_mb: 2.5,
            image: image.map(EncodedImage::from_data_url),
            additional_context: context.to_string(),
        }
    }

    #[test]
    fn instruction_interpolates_metadata() {
        let request = build_analysis_request(&input(None, "nested screws, 40 parameters"));
        assert!(request.instruction.contains("Category: Furniture"));
        assert!(request.instruction.contains("Reported File Size: 2.5 MB"));
        assert!(request
            .instruction
            .contains("User Context: nested screws, 40 parameters"));
        assert!(!request.instruction.contains(CONTEXT_PLACEHOLDER));
    }

    #[test]
    fn empty_context_uses_placeholder() {
        for context in ["", "   "] {
            let request = build_analysis_request(&input(None, context));
            assert!(request.instruction.contains("User Context: None provided"));
        }
    }

    #[test]
    fn whole_megabytes_render_without_fraction() {
        let mut source = input(None, "");
        source.category = FamilyCategory::Lighting;
        source.file_size_mb = 3.0;
        let request = build_analysis_request(&source);
        assert!(request.instruction.contains("Reported File Size: 3 MB"));
        assert!(request.instruction.contains("Category: Lighting Fixtures"));
    }

    #[test]
    fn missing_image_has_no_inline_part() {
        let request = build_analysis_request(&input(None, ""));
        assert!(request.image.is_none());
        let payload = request.to_generate_content_payload();
        let parts = payload["contents"][0]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        assert_eq!(parts.len(), 1);
        assert!(parts[0].get("inlineData").is_none());
    }

    #[test]
    fn image_payload_drops_data_url_prefix() {
        let request = build_analysis_request(&input(Some("data:image/jpeg;base64,/9j/4AAQ"), ""));
        let image = request.image.clone().unwrap_or(InlineImage {
            mime_type: String::new(),
            data: String::new(),
        });
        assert_eq!(image.data, "/9j/4AAQ");
        assert_eq!(image.mime_type, "image/png");
        assert!(!image.data.contains("base64,"));

        let payload = request.to_generate_content_payload();
        assert_eq!(
            payload["contents"][0]["parts"][1]["inlineData"],
            json!({ "mimeType": "image/png", "data": "/9j/4AAQ" })
        );
        assert_eq!(payload["contents"][0]["parts"][0]["text"], json!(request.instruction));
    }

    #[test]
    fn payload_requests_schema_mode() {
        let payload = build_analysis_request(&input(None, "")).to_generate_content_payload();
        assert_eq!(
            payload["generationConfig"]["responseMimeType"],
            json!("application/json")
        );
        assert_eq!(
            payload["generationConfig"]["responseSchema"],
            famopt_contracts::schema::response_schema()
        );
    }
}
