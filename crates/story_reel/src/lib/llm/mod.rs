pub mod completion;
pub mod ollama;

pub use completion::TextCompletionProvider;
