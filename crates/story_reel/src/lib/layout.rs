//! Project directory layout and input discovery.

use std::{
    io,
    path::{Path, PathBuf},
};

use crate::Config;

pub const SCRIPT_EXTENSIONS: &[&str] = &["txt"];
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3"];
pub const CHECKPOINT_EXTENSIONS: &[&str] = &["ckpt", "safetensors"];

#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config").join("config.yaml")
    }

    pub fn story_dir(&self) -> PathBuf {
        self.root.join("story")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.root.join("audio")
    }

    pub fn models_dir(&self, config: &Config) -> PathBuf {
        self.root.join(&config.models_directory)
    }

    pub fn loras_dir(&self, config: &Config) -> PathBuf {
        self.root.join(&config.loras_directory)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("outputs").join("images")
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.root.join("outputs").join("videos")
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join("logs").join("app.log")
    }

    /// Raw image written by the synthesis API for the `index`th prompt (1-based)
    pub fn image_path(&self, index: usize) -> PathBuf {
        self.images_dir().join(format!("image_{index}.png"))
    }

    pub fn enhanced_image_path(&self, index: usize) -> PathBuf {
        self.images_dir().join(format!("enhanced_image_{index}.png"))
    }

    pub fn video_path(&self) -> PathBuf {
        self.videos_dir().join("output_video.mp4")
    }

    /// Creates the input directories users are expected to fill
    pub fn ensure_input_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.story_dir())?;
        std::fs::create_dir_all(self.audio_dir())
    }
}

/// Lists regular files in `dir` whose extension (case-insensitive) is one of
/// `extensions`, sorted by name
pub fn list_files(dir: &Path, extensions: &[&str]) -> io::Result<Vec<PathBuf>> {
    let mut files = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_extension(p, extensions))
        .collect::<Vec<_>>();
    files.sort();
    Ok(files)
}

/// Names of the model checkpoints (or LoRAs) available in `dir`.
///
/// An unreadable directory is logged and treated as empty.
#[tracing::instrument]
pub fn list_checkpoints(dir: &Path) -> Vec<String> {
    list_files(dir, CHECKPOINT_EXTENSIONS)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to list checkpoints"))
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_owned))
        .collect()
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
