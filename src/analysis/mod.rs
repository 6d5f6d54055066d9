pub mod analyzer;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod fallback;
pub mod prompt;
pub mod telemetry;
pub mod transport;
pub mod types;
pub mod verdict;

pub use analyzer::{AnalysisOutcome, Analyzer};
pub use types::{Decision, Verdict};
