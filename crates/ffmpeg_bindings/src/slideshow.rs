use std::{
    ffi::OsString,
    io::Write,
    path::{Path, PathBuf},
};

/// A still-image slideshow with a single audio track
#[derive(Debug, Clone)]
pub struct Slideshow<'a> {
    pub frames: &'a [PathBuf],
    /// Seconds each frame stays on screen
    pub frame_duration: f64,
    pub audio: &'a Path,
    pub output: &'a Path,
    pub fps: u32,
    pub video_codec: &'a str,
    pub audio_codec: &'a str,
}

impl Slideshow<'_> {
    pub fn total_duration(&self) -> f64 {
        self.frame_duration * self.frames.len() as f64
    }

    pub(crate) fn to_args(&self, concat_list: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-y", "-f", "concat", "-safe", "0", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(concat_list.into());
        args.push("-i".into());
        args.push(self.audio.into());
        args.extend(
            [
                "-map".to_string(),
                "0:v:0".to_string(),
                "-map".to_string(),
                "1:a:0".to_string(),
                "-vf".to_string(),
                // libx264 + yuv420p needs even dimensions
                format!(
                    "scale=trunc(iw/2)*2:trunc(ih/2)*2,fps={},format=yuv420p",
                    self.fps
                ),
                "-c:v".to_string(),
                self.video_codec.to_string(),
                "-c:a".to_string(),
                self.audio_codec.to_string(),
                "-t".to_string(),
                format!("{:.3}", self.total_duration()),
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(self.output.into());
        args
    }
}

/// Writes an ffconcat script showing every frame for `frame_duration` seconds.
///
/// The concat demuxer ignores the duration of the last entry, so the final
/// frame is listed a second time.
pub fn write_concat_list<W: Write>(
    writer: &mut W,
    frames: &[PathBuf],
    frame_duration: f64,
) -> std::io::Result<()> {
    writeln!(writer, "ffconcat version 1.0")?;
    for frame in frames {
        writeln!(writer, "file '{}'", escape(frame))?;
        writeln!(writer, "duration {frame_duration:.6}")?;
    }
    if let Some(last) = frames.last() {
        writeln!(writer, "file '{}'", escape(last))?;
    }
    Ok(())
}

fn escape(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    absolute.display().to_string().replace('\'', r"'\''")
}
