// ============================================================
// Layer 4 - Image Preprocessor
// ============================================================
// The one canonical transform from an arbitrary decoded image to
// the fixed model input shape:
//
//   decode -> resize to 28x28 (anti-aliased) -> RGB -> / 255.0
//
// The output is always 3 channels x 28 x 28 f32 values in [0, 1],
// stored flat in channel-major (CHW) order so batches stack
// directly into [N, 3, 28, 28] tensors.
//
// This exact transform runs at BOTH training and prediction time.
// The two paths sharing it is load-bearing: a model trained on
// one resize and queried through another degrades silently, with
// no error anywhere to point at the mismatch.

use std::path::Path;

use anyhow::Result;
use image::{imageops::FilterType, DynamicImage, ImageReader};

use crate::domain::errors::PipelineError;

/// Model input edge length in pixels
pub const IMAGE_SIZE: usize = 28;

/// Model input channel count (RGB)
pub const CHANNELS: usize = 3;

/// Flat length of one preprocessed image
pub const TENSOR_LEN: usize = CHANNELS * IMAGE_SIZE * IMAGE_SIZE;

/// A preprocessed image: CHANNELS x IMAGE_SIZE x IMAGE_SIZE f32
/// values in [0, 1], flat in CHW order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pixels: Vec<f32>,
}

impl ImageTensor {
    /// Preprocess an already-decoded image.
    ///
    /// `resize_exact` with the Triangle filter resamples with
    /// anti-aliasing and ignores aspect ratio, so every input
    /// lands on exactly IMAGE_SIZE x IMAGE_SIZE.
    pub fn from_image(image: &DynamicImage) -> Self {
        let resized = image
            .resize_exact(IMAGE_SIZE as u32, IMAGE_SIZE as u32, FilterType::Triangle)
            .to_rgb8();

        let mut pixels = vec![0.0f32; TENSOR_LEN];
        for y in 0..IMAGE_SIZE {
            for x in 0..IMAGE_SIZE {
                let p = resized.get_pixel(x as u32, y as u32);
                for c in 0..CHANNELS {
                    pixels[c * IMAGE_SIZE * IMAGE_SIZE + y * IMAGE_SIZE + x] =
                        f32::from(p[c]) / 255.0;
                }
            }
        }
        Self { pixels }
    }

    /// Decode a file and preprocess it. Fails with a Decode error
    /// if the file is not a valid image.
    pub fn open(path: &Path) -> Result<Self> {
        let image = decode_image(path)?;
        Ok(Self::from_image(&image))
    }

    /// Flat CHW pixel buffer, length TENSOR_LEN
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<f32> {
        self.pixels
    }

    /// Shape as (channels, height, width)
    pub fn shape(&self) -> (usize, usize, usize) {
        (CHANNELS, IMAGE_SIZE, IMAGE_SIZE)
    }
}

/// Decode a file into a DynamicImage, sniffing the format from
/// the file content rather than trusting the extension.
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| PipelineError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| PipelineError::io(path, e))?;
    let image = reader
        .decode()
        .map_err(|e| PipelineError::decode(path, e))?;
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    /// Gradient test image so min < max holds everywhere.
    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn test_output_shape_is_constant() {
        // Non-square input, same dimensions the original test image had
        for (w, h) in [(73, 115), (28, 28), (640, 480), (5, 300)] {
            let tensor = ImageTensor::from_image(&gradient(w, h));
            assert_eq!(tensor.shape(), (CHANNELS, IMAGE_SIZE, IMAGE_SIZE));
            assert_eq!(tensor.pixels().len(), TENSOR_LEN);
        }
    }

    #[test]
    fn test_values_in_unit_range() {
        let tensor = ImageTensor::from_image(&gradient(73, 115));
        assert!(tensor.pixels().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_no_degenerate_flattening() {
        // max(input) > min(input) must survive the resize
        let tensor = ImageTensor::from_image(&gradient(115, 73));
        let max = tensor.pixels().iter().cloned().fold(f32::MIN, f32::max);
        let min = tensor.pixels().iter().cloned().fold(f32::MAX, f32::min);
        assert!(max > min);
    }

    #[test]
    fn test_open_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_an_image.jpg");
        std::fs::write(&path, b"this is not a jpeg").unwrap();
        assert!(ImageTensor::open(&path).is_err());
    }

    #[test]
    fn test_open_decodes_saved_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        gradient(31, 17).to_rgb8().save(&path).unwrap();
        let tensor = ImageTensor::open(&path).unwrap();
        assert_eq!(tensor.pixels().len(), TENSOR_LEN);
    }
}
