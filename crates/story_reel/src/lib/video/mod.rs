pub mod ffmpeg;

use std::path::{Path, PathBuf};

use crate::Error;

pub use ffmpeg::FfmpegEncoder;

/// Still images shown one after another, each for the same duration
#[derive(Debug, Clone, PartialEq)]
pub struct SlideshowTrack {
    pub frames: Vec<PathBuf>,
    pub frame_duration: f64,
}

impl SlideshowTrack {
    pub fn total_duration(&self) -> f64 {
        self.frame_duration * self.frames.len() as f64
    }
}

pub trait VideoEncoder {
    /// Length of the audio track in seconds
    fn audio_duration(&self, audio_path: &Path) -> anyhow::Result<f64>;

    fn encode(
        &self,
        track: &SlideshowTrack,
        audio_path: &Path,
        output_path: &Path,
    ) -> anyhow::Result<()>;
}

impl<T: VideoEncoder> VideoEncoder for &T {
    fn audio_duration(&self, audio_path: &Path) -> anyhow::Result<f64> {
        (**self).audio_duration(audio_path)
    }

    fn encode(
        &self,
        track: &SlideshowTrack,
        audio_path: &Path,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        (**self).encode(track, audio_path, output_path)
    }
}

/// Splits `total_secs` evenly across `image_count` images
pub fn per_image_duration(total_secs: f64, image_count: usize) -> Option<f64> {
    (image_count > 0).then(|| total_secs / image_count as f64)
}

/// Encodes `images` as an evenly timed slideshow over the audio at
/// `audio_path`, returning the written video path
#[tracing::instrument(skip(encoder, images), fields(images = images.len()))]
pub fn assemble_video<V: VideoEncoder>(
    encoder: &V,
    images: &[PathBuf],
    audio_path: &Path,
    output_path: &Path,
) -> Result<PathBuf, Error> {
    if images.is_empty() {
        tracing::error!("No images provided for video assembly");
        return Err(Error::NoImages);
    }

    let audio_secs = encoder
        .audio_duration(audio_path)
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to read audio duration"))
        .map_err(|e| Error::VideoAssembly(format!("{e:#}")))?;

    let frame_duration = per_image_duration(audio_secs, images.len()).ok_or(Error::NoImages)?;
    let track = SlideshowTrack {
        frames: images.to_vec(),
        frame_duration,
    };

    encoder
        .encode(&track, audio_path, output_path)
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to encode video"))
        .map_err(|e| Error::VideoAssembly(format!("{e:#}")))?;

    tracing::info!(
        audio_secs,
        frame_duration,
        path = %output_path.display(),
        "Video assembled"
    );
    Ok(output_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        assert_eq!(per_image_duration(10.0, 5), Some(2.0));
        assert_eq!(per_image_duration(7.5, 3), Some(2.5));
        assert_eq!(per_image_duration(10.0, 0), None);
    }

    #[test]
    fn test_track_total_matches_audio() {
        let track = SlideshowTrack {
            frames: vec![PathBuf::from("a.png"); 5],
            frame_duration: per_image_duration(10.0, 5).unwrap(),
        };
        assert_eq!(track.total_duration(), 10.0);
    }
}
