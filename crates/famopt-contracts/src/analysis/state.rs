use super::result::OptimizationResult;
use crate::error::FALLBACK_FAILURE_MESSAGE;

/// The single result/error slot of an analysis session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    Success(OptimizationResult),
    Failure(String),
}

impl AnalysisState {
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return AnalysisState::Failure(FALLBACK_FAILURE_MESSAGE.to_string());
        }
        AnalysisState::Failure(message)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading)
    }

    pub fn result(&self) -> Option<&OptimizationResult> {
        match self {
            AnalysisState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisState::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisState::Idle => "idle",
            AnalysisState::Loading => "loading",
            AnalysisState::Success(_) => "success",
            AnalysisState::Failure(_) => "failure",
        }
    }
}
