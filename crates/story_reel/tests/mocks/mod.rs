pub mod image_provider;
pub mod text_provider;
pub mod video_encoder;
