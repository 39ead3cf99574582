pub mod cli;
pub mod config;
pub mod generator;
pub mod llm;
pub mod logging;
pub mod sources;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use generator::context::GeneratorContext;
pub use generator::workflow::{ResearchOutcome, RunOptions, WorkflowError, launch};
pub use types::{ResearchQuery, ResearchReport, ResearchResult};
