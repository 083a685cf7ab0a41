use image::{imageops::FilterType, DynamicImage};

use crate::error::Result;

pub const IMAGE_SIZE: u32 = 224;
const CHANNELS: usize = 3;

/// A single image laid out as `[1, height, width, channels]` with values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pub shape: [u64; 4],
    pub data: Vec<f32>,
}

impl ImageTensor {
    pub fn from_rgb(image: &DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for pixel in rgb.pixels() {
            data.push(pixel[0] as f32 / 255.0);
            data.push(pixel[1] as f32 / 255.0);
            data.push(pixel[2] as f32 / 255.0);
        }

        ImageTensor {
            shape: [1, height as u64, width as u64, CHANNELS as u64],
            data,
        }
    }
}

/// Decodes uploaded bytes and resizes them to the model's input resolution.
pub fn preprocess(image_data: &[u8]) -> Result<ImageTensor> {
    let img = image::load_from_memory(image_data)?;
    let img = DynamicImage::ImageRgb8(img.to_rgb8());
    let resized = img.resize_exact(IMAGE_SIZE, IMAGE_SIZE, FilterType::Triangle);
    Ok(ImageTensor::from_rgb(&resized))
}
