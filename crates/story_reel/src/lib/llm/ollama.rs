use itertools::Itertools;
use tokio::process::Command;

use crate::{config::LlmConfig, TextCompletionProvider};

/// Runs a local model through the `ollama run` command line
#[derive(Debug, Clone)]
pub struct OllamaCli {
    command: String,
    model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("LLM command exited with status {status:?}: {stderr}")]
    Command { status: Option<i32>, stderr: String },
}

impl OllamaCli {
    pub fn new(command: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(&config.command, &config.model)
    }

    fn args<'a>(&'a self, prompt: &'a str) -> [&'a str; 3] {
        ["run", self.model.as_str(), prompt]
    }
}

impl TextCompletionProvider for OllamaCli {
    const PROVIDER_NAME: &'static str = "ollama";

    type Error = OllamaError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        let args = self.args(prompt);
        tracing::info!(
            command = %format!("{} {}", self.command, args.iter().join(" ")),
            "Running LLM command"
        );

        let output = Command::new(&self.command)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to spawn LLM command"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(OllamaError::Command {
                status: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
