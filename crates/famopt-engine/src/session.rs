use std::time::Instant;

use famopt_contracts::analysis::{parse_optimization_result, AnalysisState, OptimizationResult};
use famopt_contracts::error::{AnalysisError, InputError};
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::collect::FormDraft;
use crate::providers::AnalysisProvider;
use crate::request::{build_analysis_request, AnalysisRequest};

/// Sends one request and parses the reply. No retries.
pub fn run_analysis(
    provider: &dyn AnalysisProvider,
    request: &AnalysisRequest,
) -> Result<OptimizationResult, AnalysisError> {
    let text = provider.analyze(request)?;
    parse_optimization_result(&text)
}

/// A submitted analysis whose request has been built but not yet sent.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    pub id: Uuid,
    pub request: AnalysisRequest,
}

impl PendingAnalysis {
    pub fn run(
        &self,
        provider: &dyn AnalysisProvider,
    ) -> Result<OptimizationResult, AnalysisError> {
        let span = info_span!(
            "analysis",
            id = %self.id,
            provider = provider.name(),
            category = self.request.category.label()
        );
        let _entered = span.enter();
        let started = Instant::now();
        info!(has_image = self.request.image.is_some(), "analysis submitted");
        let outcome = run_analysis(provider, &self.request);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(result) => info!(
                elapsed_ms,
                over_modeled = result.is_over_modeled,
                score = result.complexity_score,
                "analysis completed"
            ),
            Err(err) => warn!(elapsed_ms, error = %err, "analysis failed"),
        }
        outcome
    }
}

/// Form draft plus the single result/error slot of one user session.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    draft: FormDraft,
    state: AnalysisState,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FormDraft {
        &mut self.draft
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn can_submit(&self) -> bool {
        self.draft.has_image() && !self.state.is_loading()
    }

    /// Validates the draft and moves to `Loading`. The state is untouched on refusal.
    pub fn begin(&mut self) -> Result<PendingAnalysis, AnalysisError> {
        if self.state.is_loading() {
            return Err(AnalysisError::Busy);
        }
        if !self.draft.has_image() {
            return Err(InputError::MissingImage.into());
        }
        let input = self.draft.to_input()?;
        let pending = PendingAnalysis {
            id: Uuid::new_v4(),
            request: build_analysis_request(&input),
        };
        self.state = AnalysisState::Loading;
        Ok(pending)
    }

    /// Replaces the slot with the outcome of the in-flight analysis.
    pub fn complete(
        &mut self,
        outcome: Result<OptimizationResult, AnalysisError>,
    ) -> &AnalysisState {
        self.state = match outcome {
            Ok(result) => AnalysisState::Success(result),
            Err(err) => AnalysisState::failure(err.user_message()),
        };
        &self.state
    }

    pub fn submit(
        &mut self,
        provider: &dyn AnalysisProvider,
    ) -> Result<&AnalysisState, AnalysisError> {
        let pending = self.begin()?;
        let outcome = pending.run(provider);
        Ok(self.complete(outcome))
    }

    /// Discards the current result or error and returns to the form.
    pub fn reset(&mut self) -> Result<(), AnalysisError> {
        if self.state.is_loading() {
            return Err(AnalysisError::Busy);
        }
        self.state = AnalysisState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use famopt_contracts::analysis::{FamilyCategory, Impact};
    use serde_json::json;

    use super::*;

    struct CannedProvider(Result<String, &'static str>);

    impl AnalysisProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn analyze(&self, _request: &AnalysisRequest) -> Result<String, AnalysisError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err("empty") => Err(AnalysisError::EmptyResponse),
                Err(message) => Err(AnalysisError::transport("Canned", *message)),
            }
        }
    }

    fn furniture_response() -> String {
        json!({
            "isOverModeled": true,
            "complexityScore": 82,
            "polygonEstimate": "High (>5000)",
            "unusedParams": ["Comments"],
            "suggestions": [{
                "title": "Reduce screw detail",
                "description": "Screws are modeled as solids.",
                "impact": "High",
                "type": "Simplification"
            }],
            "lodRecommendations": "Use LOD 200 for plan views.",
            "symbolicCandidates": ["Screws"],
            "overallAnalysis": "Overmodeled furniture piece."
        })
        .to_string()
    }

    fn ready_session() -> AnalysisSession {
        let mut session = AnalysisSession::new();
        session.draft_mut().set_image_data_url("data:image/png;base64,iVBORw0KGgo=");
        session
    }

    #[test]
    fn submit_requires_image() {
        let mut session = AnalysisSession::new();
        assert!(!session.can_submit());
        let err = session.submit(&CannedProvider(Ok(furniture_response()))).err();
        assert!(matches!(
            err,
            Some(AnalysisError::Input(InputError::MissingImage))
        ));
        assert_eq!(session.state(), &AnalysisState::Idle);
    }

    #[test]
    fn loading_blocks_second_submit_and_reset() -> anyhow::Result<()> {
        let mut session = ready_session();
        let pending = session.begin()?;
        assert!(session.state().is_loading());
        assert!(!session.can_submit());
        assert!(matches!(session.begin(), Err(AnalysisError::Busy)));
        assert!(matches!(session.reset(), Err(AnalysisError::Busy)));

        let outcome = pending.run(&CannedProvider(Ok(furniture_response())));
        let state = session.complete(outcome);
        let result = state.result().cloned().ok_or_else(|| anyhow::anyhow!("no result"))?;
        assert_eq!(result.complexity_score, 82.0);
        assert_eq!(result.suggestions[0].impact, Impact::High);
        assert!(session.can_submit());
        Ok(())
    }

    #[test]
    fn pending_request_carries_stripped_image_and_draft_metadata() -> anyhow::Result<()> {
        let mut session = ready_session();
        session.draft_mut().set_category("furniture")?;
        session.draft_mut().set_file_size("2.5")?;
        let pending = session.begin()?;
        assert_eq!(pending.request.category, FamilyCategory::Furniture);
        assert!(pending.request.instruction.contains("Reported File Size: 2.5 MB"));
        assert!(pending.request.instruction.contains("User Context: None provided"));
        assert_eq!(
            pending.request.image.as_ref().map(|image| image.data.as_str()),
            Some("iVBORw0KGgo=")
        );
        Ok(())
    }

    #[test]
    fn failures_replace_previous_result() -> anyhow::Result<()> {
        let mut session = ready_session();
        session.submit(&CannedProvider(Ok(furniture_response())))?;
        assert!(session.state().result().is_some());

        let state = session.submit(&CannedProvider(Err("empty")))?;
        assert_eq!(state.error(), Some("Empty response from AI"));
        assert!(state.result().is_none());

        let state = session.submit(&CannedProvider(Err("connection reset")))?;
        assert_eq!(state.error(), Some("Canned request failed: connection reset"));
        Ok(())
    }

    #[test]
    fn malformed_response_fails_without_partial_result() -> anyhow::Result<()> {
        let mut session = ready_session();
        let truncated = furniture_response()[..40].to_string();
        let state = session.submit(&CannedProvider(Ok(truncated)))?;
        assert!(state.result().is_none());
        let message = state.error().unwrap_or_default();
        assert!(message.starts_with("failed to parse analysis response"));
        Ok(())
    }

    #[test]
    fn reset_returns_to_idle_and_keeps_draft() -> anyhow::Result<()> {
        let mut session = ready_session();
        session.draft_mut().set_context("nested families");
        session.submit(&CannedProvider(Ok(furniture_response())))?;
        session.reset()?;
        assert_eq!(session.state(), &AnalysisState::Idle);
        assert_eq!(session.draft().additional_context, "nested families");
        assert!(session.can_submit());
        Ok(())
    }
}
