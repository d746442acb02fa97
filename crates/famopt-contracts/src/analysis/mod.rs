mod input;
mod result;
mod state;

pub use input::{parse_file_size_mb, AnalysisInput, EncodedImage, FamilyCategory};
pub use result::{parse_optimization_result, Impact, OptimizationResult, Suggestion, SuggestionKind};
pub use state::AnalysisState;
