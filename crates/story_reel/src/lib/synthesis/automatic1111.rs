use reqwest::Client;

use crate::synthesis::{ImageSynthesisProvider, Txt2ImgRequest, Txt2ImgResponse};

/// Client for the AUTOMATIC1111 Stable Diffusion web UI API
#[derive(Debug, Clone)]
pub struct Automatic1111Client {
    client: Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Automatic1111Error {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl Automatic1111Client {
    const TXT2IMG_PATH: &str = "/sdapi/v1/txt2img";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ImageSynthesisProvider for Automatic1111Client {
    type Error = Automatic1111Error;

    async fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Txt2ImgResponse, Self::Error> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, Self::TXT2IMG_PATH))
            .json(request)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(Automatic1111Error::Api { status, message });
        }

        Ok(resp.json::<Txt2ImgResponse>().await?)
    }
}
