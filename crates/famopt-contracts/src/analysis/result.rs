use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub const ALL: [Impact; 3] = [Impact::High, Impact::Medium, Impact::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionKind {
    Deletion,
    Symbolic,
    Simplification,
    Parameter,
}

impl SuggestionKind {
    pub const ALL: [SuggestionKind; 4] = [
        SuggestionKind::Deletion,
        SuggestionKind::Symbolic,
        SuggestionKind::Simplification,
        SuggestionKind::Parameter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionKind::Deletion => "Deletion",
            SuggestionKind::Symbolic => "Symbolic",
            SuggestionKind::Simplification => "Simplification",
            SuggestionKind::Parameter => "Parameter",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    pub impact: Impact,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}

/// The structured report returned by the model.
///
/// Every field is required on the wire. `complexity_score` is expected in
/// `0..=100` but is kept exactly as returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub is_over_modeled: bool,
    pub complexity_score: f64,
    pub polygon_estimate: String,
    pub unused_params: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    pub lod_recommendations: String,
    pub symbolic_candidates: Vec<String>,
    pub overall_analysis: String,
}

/// Parses the raw response text into a report, all or nothing.
pub fn parse_optimization_result(text: &str) -> Result<OptimizationResult, AnalysisError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn furniture_report() -> OptimizationResult {
        OptimizationResult {
            is_over_modeled: true,
            complexity_score: 82.0,
            polygon_estimate: "High (>5000)".to_string(),
            unused_params: vec!["Comments".to_string()],
            suggestions: vec![Suggestion {
                title: "Reduce screw detail".to_string(),
                description: "Replace modeled screws with symbolic lines.".to_string(),
                impact: Impact::High,
                kind: SuggestionKind::Simplification,
            }],
            lod_recommendations: "Use LOD 200 for plan views.".to_string(),
            symbolic_candidates: vec!["Screws".to_string()],
            overall_analysis: "Overmodeled furniture piece.".to_string(),
        }
    }

    #[test]
    fn parses_wire_document() -> anyhow::Result<()> {
        let text = json!({
            "isOverModeled": true,
            "complexityScore": 82,
            "polygonEstimate": "High (>5000)",
            "unusedParams": ["Comments"],
            "suggestions": [{
                "title": "Reduce screw detail",
                "description": "Replace modeled screws with symbolic lines.",
                "impact": "High",
                "type": "Simplification"
            }],
            "lodRecommendations": "Use LOD 200 for plan views.",
            "symbolicCandidates": ["Screws"],
            "overallAnalysis": "Overmodeled furniture piece."
        })
        .to_string();
        let parsed = parse_optimization_result(&text)?;
        assert_eq!(parsed, furniture_report());
        Ok(())
    }

    #[test]
    fn serialized_report_parses_back_equal() -> anyhow::Result<()> {
        let report = furniture_report();
        let text = serde_json::to_string(&report)?;
        assert!(text.contains("\"isOverModeled\":true"));
        assert!(text.contains("\"type\":\"Simplification\""));
        assert_eq!(parse_optimization_result(&text)?, report);
        Ok(())
    }

    #[test]
    fn truncated_document_fails() -> anyhow::Result<()> {
        let text = serde_json::to_string(&furniture_report())?;
        let truncated = &text[..text.len() / 2];
        let err = parse_optimization_result(truncated)
            .err()
            .ok_or_else(|| anyhow::anyhow!("truncated text parsed"))?;
        assert!(err.is_parse());
        Ok(())
    }

    #[test]
    fn missing_field_fails_instead_of_defaulting() {
        let text = json!({
            "isOverModeled": false,
            "complexityScore": 10,
            "polygonEstimate": "Low (<1000)",
            "unusedParams": [],
            "suggestions": [],
            "lodRecommendations": "",
            "symbolicCandidates": []
        })
        .to_string();
        assert!(parse_optimization_result(&text).is_err());
    }

    #[test]
    fn out_of_set_enum_values_are_not_coerced() -> anyhow::Result<()> {
        let mut value = serde_json::to_value(furniture_report())?;
        value["suggestions"][0]["impact"] = json!("Critical");
        assert!(parse_optimization_result(&value.to_string()).is_err());

        let mut value = serde_json::to_value(furniture_report())?;
        value["suggestions"][0]["type"] = json!("delete");
        assert!(parse_optimization_result(&value.to_string()).is_err());
        Ok(())
    }

    #[test]
    fn score_is_kept_as_returned() -> anyhow::Result<()> {
        let mut value = serde_json::to_value(furniture_report())?;
        value["complexityScore"] = json!(140);
        value["extraNote"] = json!("ignored");
        let parsed = parse_optimization_result(&value.to_string())?;
        assert_eq!(parsed.complexity_score, 140.0);
        Ok(())
    }
}
