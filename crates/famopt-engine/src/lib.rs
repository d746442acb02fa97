//! Input collection, request construction, model transport and the analysis
//! session state machine.

pub mod collect;
pub mod config;
pub mod providers;
pub mod request;
pub mod session;

pub use collect::{load_image_data_url, FormDraft};
pub use config::EngineConfig;
pub use providers::{AnalysisProvider, GeminiProvider, ProviderRegistry};
pub use request::{build_analysis_request, AnalysisRequest, InlineImage};
pub use session::{run_analysis, AnalysisSession, PendingAnalysis};
