pub mod llm;
pub mod sql_generator;

pub use llm::{LLMClient, LLMError, LLMStatus, build_client};
pub use sql_generator::{HeuristicGenerator, ModelGenerator, SqlGeneratorService};
