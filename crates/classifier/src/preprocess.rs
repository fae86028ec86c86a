//! Image decoding and tensor preparation.
//!
//! Uploads are decoded, forced to RGB, stretched to the model's fixed input
//! resolution (aspect ratio is not kept) and scaled to `[0, 1]`. The result
//! is an NHWC tensor with a leading batch dimension of one.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat};
use ndarray::{Array4, ArrayD};

use crate::error::ImageDecodeError;

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 160;
pub const CHANNELS: usize = 3;

#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    pub width: u32,
    pub height: u32,
    pub allowed_formats: Vec<ImageFormat>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            width: INPUT_SIZE,
            height: INPUT_SIZE,
            allowed_formats: vec![ImageFormat::Jpeg, ImageFormat::Png],
        }
    }
}

impl PreprocessConfig {
    /// Shape of the tensor [`to_tensor`] produces.
    pub fn input_shape(&self) -> Vec<usize> {
        vec![1, self.height as usize, self.width as usize, CHANNELS]
    }
}

/// An upload after decoding. Keeps the original bytes for display.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl UploadedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedTensor(Array4<f32>);

impl PreprocessedTensor {
    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.0
    }

    pub fn to_dyn(&self) -> ArrayD<f32> {
        self.as_array().clone().into_dyn()
    }
}

pub fn decode(bytes: Vec<u8>, config: &PreprocessConfig) -> Result<UploadedImage, ImageDecodeError> {
    if bytes.is_empty() {
        return Err(ImageDecodeError::Empty);
    }

    let format =
        image::guess_format(&bytes).map_err(|e| ImageDecodeError::Malformed(e.to_string()))?;
    if !config.allowed_formats.contains(&format) {
        return Err(ImageDecodeError::UnsupportedFormat(format!("{format:?}")));
    }

    let image = image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| ImageDecodeError::Malformed(e.to_string()))?;

    Ok(UploadedImage {
        width: image.width(),
        height: image.height(),
        bytes,
        image,
        format,
    })
}

pub fn to_tensor(image: &DynamicImage, config: &PreprocessConfig) -> PreprocessedTensor {
    let (width, height) = (config.width, config.height);

    let rgb = image.to_rgb8();
    let rgb = if rgb.dimensions() == (width, height) {
        rgb
    } else {
        imageops::resize(&rgb, width, height, FilterType::Triangle)
    };

    let array = Array4::from_shape_fn(
        (1, height as usize, width as usize, CHANNELS),
        |(_, y, x, c)| f32::from(rgb.get_pixel(x as u32, y as u32)[c]) / 255.0,
    );
    PreprocessedTensor(array)
}

pub fn preprocess(
    bytes: &[u8],
    config: &PreprocessConfig,
) -> Result<PreprocessedTensor, ImageDecodeError> {
    let upload = decode(bytes.to_vec(), config)?;
    Ok(to_tensor(&upload.image, config))
}
