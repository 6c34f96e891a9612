pub mod analyzer;
pub mod config;
pub mod console;
pub mod enhance;
mod error;
pub mod layout;
mod llm;
mod pipeline;
pub mod prompt;
pub mod synthesis;
pub mod tracing;
pub mod video;

pub use config::Config;
pub use error::Error;
pub use llm::ollama;
pub use llm::TextCompletionProvider;
pub use pipeline::{
    builder::ReelPipelineBuilder, GeneratedImage, Progress, ReelPipeline, RunOutcome, Storyboard,
};
