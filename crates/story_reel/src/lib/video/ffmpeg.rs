use std::{ops::Deref, path::Path};

use anyhow::Context;
use ffmpeg_bindings::{Ffmpeg, Slideshow};

use crate::{
    config::VideoConfig,
    video::{SlideshowTrack, VideoEncoder},
};

/// Encodes slideshows with the `ffmpeg` / `ffprobe` command line tools
pub struct FfmpegEncoder {
    ffmpeg: Ffmpeg,
    settings: VideoConfig,
}

impl FfmpegEncoder {
    pub fn new(ffmpeg: Ffmpeg, settings: VideoConfig) -> Self {
        Self { ffmpeg, settings }
    }
}

impl Deref for FfmpegEncoder {
    type Target = Ffmpeg;

    fn deref(&self) -> &Self::Target {
        &self.ffmpeg
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn audio_duration(&self, audio_path: &Path) -> anyhow::Result<f64> {
        self.probe_duration(audio_path)
            .with_context(|| format!("Failed to probe {}", audio_path.display()))
    }

    fn encode(
        &self,
        track: &SlideshowTrack,
        audio_path: &Path,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        let slideshow = Slideshow {
            frames: &track.frames,
            frame_duration: track.frame_duration,
            audio: audio_path,
            output: output_path,
            fps: self.settings.fps,
            video_codec: &self.settings.video_codec,
            audio_codec: &self.settings.audio_codec,
        };

        self.render_slideshow(&slideshow)
            .with_context(|| format!("Failed to encode {}", output_path.display()))
    }
}
