pub mod llm;
pub mod sql;
pub mod system;
