//! Run configuration loaded from `config/config.yaml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the AUTOMATIC1111 web UI, e.g. `http://127.0.0.1:7860`
    pub automatic1111_api: String,
    #[serde(default = "default_models_directory")]
    pub models_directory: PathBuf,
    #[serde(default = "default_loras_directory")]
    pub loras_directory: PathBuf,
    #[serde(default = "default_style")]
    pub default_style: String,
    #[serde(default)]
    pub sd_model: Option<String>,
    #[serde(default)]
    pub lora_model: Option<String>,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub video: VideoConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub command: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            command: "ollama".into(),
            model: "hf.co/ArliAI/Mistral-Small-22B-ArliAI-RPMax-v1.1-GGUF:latest".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub fps: u32,
    pub video_codec: String,
    pub audio_codec: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: 24,
            video_codec: "libx264".into(),
            audio_codec: "aac".into(),
        }
    }
}

fn default_models_directory() -> PathBuf {
    "models".into()
}

fn default_loras_directory() -> PathBuf {
    "loras".into()
}

fn default_style() -> String {
    "comics".into()
}

impl Config {
    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to read config file"))?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, Error> {
        let config = serde_yaml::from_str::<Config>(raw)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to parse config"))
            .map_err(|e| Error::Config(e.to_string()))?;

        if config.automatic1111_api.trim().is_empty() {
            return Err(Error::Config("automatic1111_api must not be empty".into()));
        }
        Ok(config)
    }
}
