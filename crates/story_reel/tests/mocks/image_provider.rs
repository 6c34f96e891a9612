use base64::{prelude::BASE64_STANDARD, Engine};
use std::{
    collections::HashSet,
    io::Cursor,
    sync::{Arc, Mutex},
};
use story_reel::synthesis::{ImageSynthesisProvider, Txt2ImgRequest, Txt2ImgResponse};

pub fn png_base64() -> String {
    let mut bytes = Vec::new();
    image::RgbImage::from_pixel(8, 8, image::Rgb([90, 120, 150]))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    BASE64_STANDARD.encode(bytes)
}

#[derive(Clone)]
pub struct MockImageProvider {
    pub calls: Arc<Mutex<Vec<Txt2ImgRequest>>>,
    /// 1-based call numbers that fail
    pub failing_calls: HashSet<usize>,
}

impl Default for MockImageProvider {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failing_calls: HashSet::new(),
        }
    }
}

impl MockImageProvider {
    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            failing_calls: calls.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl ImageSynthesisProvider for MockImageProvider {
    type Error = anyhow::Error;

    async fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Txt2ImgResponse, Self::Error> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len()
        };
        if self.failing_calls.contains(&call) {
            return Err(anyhow::anyhow!("CUDA out of memory"));
        }
        Ok(Txt2ImgResponse {
            images: vec![png_base64()],
            info: None,
        })
    }
}
