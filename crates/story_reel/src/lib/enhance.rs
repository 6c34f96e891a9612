//! Fixed brightness/contrast touch-up applied to every generated image.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageResult};

pub const BRIGHTNESS_FACTOR: f32 = 1.2;
pub const CONTRAST_FACTOR: f32 = 1.3;

/// Writes an enhanced copy of `source` to `destination`.
///
/// Returns the path the caller should use from now on: `destination` on
/// success, `source` if anything went wrong.
#[tracing::instrument]
pub fn enhance_image(source: &Path, destination: &Path) -> PathBuf {
    match try_enhance(source, destination) {
        Ok(()) => {
            tracing::info!("Enhanced image saved");
            destination.to_path_buf()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to enhance image, keeping original");
            source.to_path_buf()
        }
    }
}

fn try_enhance(source: &Path, destination: &Path) -> ImageResult<()> {
    match image::open(source)? {
        DynamicImage::ImageRgb8(mut img) => {
            enhance_pixels(&mut img, 3);
            img.save(destination)
        }
        other => {
            let mut img = other.into_rgba8();
            enhance_pixels(&mut img, 4);
            img.save(destination)
        }
    }
}

fn enhance_pixels(buf: &mut [u8], channels: usize) {
    adjust_brightness(buf, channels, BRIGHTNESS_FACTOR);
    adjust_contrast(buf, channels, CONTRAST_FACTOR);
}

/// Blends each colour channel towards black (`factor < 1`) or away from it
pub fn adjust_brightness(buf: &mut [u8], channels: usize, factor: f32) {
    for_each_colour(buf, channels, |v| blend(0.0, v, factor));
}

/// Blends each colour channel against the image's mean luminance grey
pub fn adjust_contrast(buf: &mut [u8], channels: usize, factor: f32) {
    let Some(mean) = mean_luminance(buf, channels) else {
        return;
    };
    for_each_colour(buf, channels, |v| blend(mean, v, factor));
}

fn for_each_colour(buf: &mut [u8], channels: usize, f: impl Fn(u8) -> u8) {
    for pixel in buf.chunks_exact_mut(channels) {
        for value in pixel.iter_mut().take(3) {
            *value = f(*value);
        }
    }
}

/// `base + factor * (value - base)`, clamped and truncated to a byte
fn blend(base: f32, value: u8, factor: f32) -> u8 {
    let out = base + factor * (value as f32 - base);
    if out <= 0.0 {
        0
    } else if out >= 255.0 {
        255
    } else {
        out as u8
    }
}

/// Mean ITU-R 601 luma, rounded to the nearest integer
fn mean_luminance(buf: &[u8], channels: usize) -> Option<f32> {
    let pixels = buf.chunks_exact(channels);
    let count = pixels.len();
    if count == 0 {
        return None;
    }

    let sum: u64 = pixels
        .map(|p| {
            let (r, g, b) = (p[0] as u32, p[1] as u32, p[2] as u32);
            ((r * 19595 + g * 38470 + b * 7471 + 0x8000) >> 16) as u64
        })
        .sum();
    Some((sum as f64 / count as f64 + 0.5).floor() as f32)
}
