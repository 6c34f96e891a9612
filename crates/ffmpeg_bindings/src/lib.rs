//! # FFmpeg Bindings
//!
//! Thin wrappers around the `ffmpeg` and `ffprobe` command line tools.
//!
//! The crate only covers what a slideshow renderer needs: probing the
//! duration of a media file and encoding a sequence of still images
//! against an audio track via the concat demuxer.

mod error;
mod slideshow;

use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

pub use error::FfmpegError;
pub use slideshow::{write_concat_list, Slideshow};

#[derive(Debug, Clone)]
pub struct Ffmpeg {
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
}

impl Ffmpeg {
    /// Uses `ffmpeg` and `ffprobe` from `PATH`, verifying that both can be run
    pub fn new() -> Result<Self, FfmpegError> {
        Self::with_paths("ffmpeg", "ffprobe")
    }

    pub fn with_paths(
        ffmpeg_path: impl Into<PathBuf>,
        ffprobe_path: impl Into<PathBuf>,
    ) -> Result<Self, FfmpegError> {
        let ffmpeg = Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        };
        ffmpeg.ensure_available(&ffmpeg.ffmpeg_path)?;
        ffmpeg.ensure_available(&ffmpeg.ffprobe_path)?;
        Ok(ffmpeg)
    }

    fn ensure_available(&self, program: &Path) -> Result<(), FfmpegError> {
        let available = Command::new(program)
            .arg("-version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);

        if !available {
            tracing::error!(program = %program.display(), "Program is not installed or not runnable");
            return Err(FfmpegError::NotInstalled(program.display().to_string()));
        }
        Ok(())
    }

    /// Returns the duration of `input` in seconds as reported by `ffprobe`
    #[tracing::instrument(skip(self))]
    pub fn probe_duration(&self, input: &Path) -> Result<f64, FfmpegError> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(input)
            .output()?;
        let stdout = check_output(&self.ffprobe_path, output)?;

        parse_duration(&stdout)
    }

    /// Encodes `slideshow` into its output file, overwriting any existing file
    #[tracing::instrument(skip_all, fields(output = %slideshow.output.display()))]
    pub fn render_slideshow(&self, slideshow: &Slideshow<'_>) -> Result<(), FfmpegError> {
        if slideshow.frames.is_empty() {
            return Err(FfmpegError::NoFrames);
        }

        let list_path = slideshow.output.with_extension("ffconcat");
        let mut list = std::fs::File::create(&list_path)?;
        write_concat_list(&mut list, slideshow.frames, slideshow.frame_duration)?;
        drop(list);

        tracing::info!(
            frames = slideshow.frames.len(),
            frame_duration = slideshow.frame_duration,
            "Encoding slideshow"
        );
        let result = Command::new(&self.ffmpeg_path)
            .args(slideshow.to_args(&list_path))
            .output()
            .map_err(FfmpegError::from)
            .and_then(|output| check_output(&self.ffmpeg_path, output));

        if let Err(e) = std::fs::remove_file(&list_path) {
            tracing::warn!(error = ?e, path = ?list_path, "Failed to remove concat list");
        }

        result.map(|_| ())
    }
}

fn check_output(program: &Path, output: Output) -> Result<String, FfmpegError> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::error!(program = %program.display(), status = %output.status, %stderr, "Command failed");
        return Err(FfmpegError::CommandFailed {
            program: program.display().to_string(),
            status: output.status.code(),
            stderr,
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn parse_duration(stdout: &str) -> Result<f64, FfmpegError> {
    let raw = stdout.trim();
    raw.parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .ok_or_else(|| FfmpegError::InvalidDuration(raw.to_string()))
}
