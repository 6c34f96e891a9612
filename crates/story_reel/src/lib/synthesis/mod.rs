//! # Image synthesis
//!
//! Text-to-image requests against a Stable Diffusion style API and the
//! decoding of its base64 image payloads.

pub mod automatic1111;

use std::{fmt::Display, future::Future, path::Path};

use base64::{prelude::BASE64_STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::Error;

pub use automatic1111::{Automatic1111Client, Automatic1111Error};

pub const STEPS: u32 = 20;
pub const CFG_SCALE: f32 = 7.0;
pub const WIDTH: u32 = 512;
pub const HEIGHT: u32 = 512;
pub const SAMPLER: &str = "Euler a";
/// Lets the API pick a random seed
pub const RANDOM_SEED: i64 = -1;

pub trait ImageSynthesisProvider {
    type Error: Display;

    fn txt2img(
        &self,
        request: &Txt2ImgRequest,
    ) -> impl Future<Output = Result<Txt2ImgResponse, Self::Error>>;
}

impl<T: ImageSynthesisProvider> ImageSynthesisProvider for &T {
    type Error = T::Error;

    async fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Txt2ImgResponse, Self::Error> {
        (**self).txt2img(request).await
    }
}

/// Model, LoRA and style chosen for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub model: Option<String>,
    pub lora: Option<String>,
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Txt2ImgRequest {
    pub prompt: String,
    pub steps: u32,
    pub cfg_scale: f32,
    pub width: u32,
    pub height: u32,
    pub sampler_index: String,
    pub seed: i64,
    pub negative_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lora: Option<String>,
}

impl Txt2ImgRequest {
    pub fn new(prompt: &str, options: &RenderOptions) -> Self {
        let prompt = match options.style.as_deref() {
            Some(style) if !style.trim().is_empty() => format!("{prompt}, style of {style}"),
            _ => prompt.to_string(),
        };

        Self {
            prompt,
            steps: STEPS,
            cfg_scale: CFG_SCALE,
            width: WIDTH,
            height: HEIGHT,
            sampler_index: SAMPLER.into(),
            seed: RANDOM_SEED,
            negative_prompt: String::new(),
            model: options.model.clone(),
            lora: options.lora.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Txt2ImgResponse {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub info: Option<String>,
}

impl Txt2ImgResponse {
    /// Decodes the first image. Anything other than base64 of a known image
    /// format is rejected.
    pub fn first_image(&self) -> Result<Vec<u8>, Error> {
        let payload = self.images.first().ok_or(Error::EmptyImageResponse)?;
        let bytes = BASE64_STANDARD.decode(payload.trim())?;
        image::guess_format(&bytes).map_err(|_| Error::UnrecognisedImage)?;
        Ok(bytes)
    }
}

/// Renders `prompt` and writes the resulting image to `output_path`.
///
/// The file is only created once a decodable image has been received.
#[tracing::instrument(skip(provider, options))]
pub async fn generate_image<P: ImageSynthesisProvider>(
    provider: &P,
    prompt: &str,
    options: &RenderOptions,
    output_path: &Path,
) -> Result<(), Error> {
    let request = Txt2ImgRequest::new(prompt, options);
    tracing::info!(prompt = %request.prompt, "Sending txt2img request");

    let response = provider
        .txt2img(&request)
        .await
        .map_err(|e| Error::ImageSynthesis(e.to_string()))?;
    let bytes = response.first_image()?;

    tokio::fs::write(output_path, bytes).await?;
    tracing::info!(path = %output_path.display(), "Image generated");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_base64() -> String {
        let mut bytes = Vec::new();
        image::RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        BASE64_STANDARD.encode(bytes)
    }

    #[test]
    fn test_request_defaults() {
        let request = Txt2ImgRequest::new("a red fox", &RenderOptions::default());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "prompt": "a red fox",
                "steps": 20,
                "cfg_scale": 7.0,
                "width": 512,
                "height": 512,
                "sampler_index": "Euler a",
                "seed": -1,
                "negative_prompt": "",
            })
        );
    }

    #[test]
    fn test_request_with_selectors_and_style() {
        let options = RenderOptions {
            model: Some("dreamshaper_8.safetensors".into()),
            lora: Some("inkwash.safetensors".into()),
            style: Some("comics".into()),
        };
        let request = Txt2ImgRequest::new("a red fox", &options);

        assert_eq!(request.prompt, "a red fox, style of comics");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "dreamshaper_8.safetensors");
        assert_eq!(json["lora"], "inkwash.safetensors");
    }

    #[test]
    fn test_blank_style_is_not_appended() {
        let options = RenderOptions {
            style: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(Txt2ImgRequest::new("a fox", &options).prompt, "a fox");
    }

    #[test]
    fn test_first_image_decodes_png() {
        let response = Txt2ImgResponse {
            images: vec![png_base64(), "ignored".into()],
            info: None,
        };
        let bytes = response.first_image().unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
    }

    #[test]
    fn test_first_image_rejects_empty_and_unknown_payloads() {
        let empty = Txt2ImgResponse {
            images: vec![],
            info: None,
        };
        assert!(matches!(empty.first_image(), Err(Error::EmptyImageResponse)));

        let not_base64 = Txt2ImgResponse {
            images: vec!["data:image/png;base64,AAAA".into()],
            info: None,
        };
        assert!(matches!(not_base64.first_image(), Err(Error::ImageDecode(_))));

        let not_an_image = Txt2ImgResponse {
            images: vec![BASE64_STANDARD.encode(b"plain text, not pixels")],
            info: None,
        };
        assert!(matches!(
            not_an_image.first_image(),
            Err(Error::UnrecognisedImage)
        ));
    }
}
