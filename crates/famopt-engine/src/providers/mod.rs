use std::collections::BTreeMap;

use famopt_contracts::error::AnalysisError;

use crate::config::EngineConfig;
use crate::request::AnalysisRequest;

mod gemini;

pub use gemini::GeminiProvider;

/// A model endpoint that answers one analysis request with raw response text.
pub trait AnalysisProvider: Send + Sync {
    fn name(&self) -> &str;
    fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError>;
}

#[derive(Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Box<dyn AnalysisProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in provider configured from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut registry = Self::new();
        registry.register(GeminiProvider::new(config));
        registry
    }

    pub fn register<P: AnalysisProvider + 'static>(&mut self, provider: P) {
        self.providers
            .insert(provider.name().to_string(), Box::new(provider));
    }

    pub fn get(&self, name: &str) -> Option<&dyn AnalysisProvider> {
        self.providers.get(name).map(|provider| provider.as_ref())
    }

    pub fn resolve(&self, name: &str) -> Result<&dyn AnalysisProvider, AnalysisError> {
        self.get(name.trim())
            .ok_or_else(|| AnalysisError::UnknownProvider(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}

pub(crate) fn error_chain_text(err: &dyn std::error::Error, max_chars: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut current: Option<&dyn std::error::Error> = Some(err);
    while let Some(cause) = current {
        let text = cause.to_string();
        let trimmed = text.trim();
        if !trimmed.is_empty()
            && parts
                .last()
                .map(|existing| existing != trimmed)
                .unwrap_or(true)
        {
            parts.push(trimmed.to_string());
        }
        current = cause.source();
    }
    truncate_text(&parts.join(" | caused by: "), max_chars)
}

pub(crate) fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}
