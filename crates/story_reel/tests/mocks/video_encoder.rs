use std::{
    path::Path,
    sync::{Arc, Mutex},
};
use story_reel::video::{SlideshowTrack, VideoEncoder};

#[derive(Clone)]
pub struct MockVideoEncoder {
    pub audio_secs: f64,
    pub probes: Arc<Mutex<Vec<String>>>,
    pub encoded: Arc<Mutex<Vec<SlideshowTrack>>>,
    pub fail_with: Option<String>,
}

impl MockVideoEncoder {
    pub fn new(audio_secs: f64) -> Self {
        Self {
            audio_secs,
            probes: Arc::new(Mutex::new(Vec::new())),
            encoded: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new(10.0)
        }
    }
}

impl VideoEncoder for MockVideoEncoder {
    fn audio_duration(&self, audio_path: &Path) -> anyhow::Result<f64> {
        self.probes
            .lock()
            .unwrap()
            .push(audio_path.display().to_string());
        Ok(self.audio_secs)
    }

    fn encode(
        &self,
        track: &SlideshowTrack,
        _audio_path: &Path,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        self.encoded.lock().unwrap().push(track.clone());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        std::fs::write(output_path, b"mp4")?;
        Ok(())
    }
}
