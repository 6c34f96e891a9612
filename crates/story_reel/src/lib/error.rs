#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("No key points extracted from the script")]
    NoKeyPoints,
    #[error("No images available for video assembly")]
    NoImages,
    #[error("Image synthesis failed: {0}")]
    ImageSynthesis(String),
    #[error("Image synthesis API returned no images")]
    EmptyImageResponse,
    #[error("Failed to decode image payload: {0}")]
    ImageDecode(#[from] base64::DecodeError),
    #[error("Image payload is not a recognised image format")]
    UnrecognisedImage,
    #[error("Video assembly failed: {0}")]
    VideoAssembly(String),
}
