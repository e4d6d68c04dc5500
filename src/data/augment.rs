// ============================================================
// Layer 4 - Augmentation Policy
// ============================================================
// Randomized geometric transforms applied to training batches as
// they are drawn. The stored dataset is never modified; every
// epoch sees a fresh random variant of each sample.
//
// Per draw, one affine transform is sampled:
//   - rotation up to +-30 degrees
//   - width/height shift up to +-10% of the image size
//   - shear up to +-0.2
//   - zoom in [0.8, 1.2]
//   - horizontal flip with probability 0.5
//
// Sampling is done by inverse mapping: for every output pixel
// the source coordinate is computed through the inverted affine
// matrix and the nearest source pixel is taken. Coordinates that
// land outside the image are clamped to the border, which
// extends edge pixels outward (nearest fill).
//
// Operates on flat [C, H, W] buffers, matching the preprocessor
// output layout.

use rand::Rng;

use crate::data::preprocessor::{CHANNELS, IMAGE_SIZE};

/// Ranges for the stochastic per-draw transform.
#[derive(Debug, Clone)]
pub struct AugmentationPolicy {
    /// Max absolute rotation, degrees
    pub rotation_degrees: f64,
    /// Max absolute horizontal shift, fraction of width
    pub width_shift: f64,
    /// Max absolute vertical shift, fraction of height
    pub height_shift: f64,
    /// Max absolute shear factor
    pub shear: f64,
    /// Max zoom deviation from 1.0
    pub zoom: f64,
    /// Allow mirroring across the vertical axis
    pub horizontal_flip: bool,
}

impl Default for AugmentationPolicy {
    fn default() -> Self {
        Self {
            rotation_degrees: 30.0,
            width_shift:      0.1,
            height_shift:     0.1,
            shear:            0.2,
            zoom:             0.2,
            horizontal_flip:  true,
        }
    }
}

impl AugmentationPolicy {
    /// A policy whose every draw is the identity transform.
    pub fn identity() -> Self {
        Self {
            rotation_degrees: 0.0,
            width_shift:      0.0,
            height_shift:     0.0,
            shear:            0.0,
            zoom:             0.0,
            horizontal_flip:  false,
        }
    }

    /// Apply one freshly sampled transform to a [C, H, W] buffer.
    pub fn apply<R: Rng + ?Sized>(&self, pixels: &[f32], rng: &mut R) -> Vec<f32> {
        let (h, w) = (IMAGE_SIZE, IMAGE_SIZE);
        debug_assert_eq!(pixels.len(), CHANNELS * h * w);

        let theta = self.rotation_degrees.to_radians() * symmetric(rng);
        let tx    = self.width_shift * w as f64 * symmetric(rng);
        let ty    = self.height_shift * h as f64 * symmetric(rng);
        let shear = self.shear * symmetric(rng);
        let zoom  = 1.0 + self.zoom * symmetric(rng);
        let flip  = self.horizontal_flip && rng.gen_bool(0.5);

        // Forward transform about the image centre:
        //   p' = R(theta) * Sh(shear) * Z(zoom) * (p - c) + c + t
        // Inverse-mapped here, so invert the 2x2 part once.
        let (sin, cos) = theta.sin_cos();
        let m00 = cos * zoom;
        let m01 = -cos * zoom * shear - sin * zoom;
        let m10 = sin * zoom;
        let m11 = -sin * zoom * shear + cos * zoom;

        let det = m00 * m11 - m01 * m10;
        if det.abs() < 1e-9 {
            return pixels.to_vec();
        }
        let i00 = m11 / det;
        let i01 = -m01 / det;
        let i10 = -m10 / det;
        let i11 = m00 / det;

        let cx = (w as f64 - 1.0) / 2.0;
        let cy = (h as f64 - 1.0) / 2.0;

        let mut out = vec![0.0f32; pixels.len()];
        for y in 0..h {
            for x in 0..w {
                let xo = if flip { w - 1 - x } else { x } as f64;

                let dx = xo - cx - tx;
                let dy = y as f64 - cy - ty;
                let sx = i00 * dx + i01 * dy + cx;
                let sy = i10 * dx + i11 * dy + cy;

                // nearest fill: clamp to the border
                let sx = (sx.round().max(0.0) as usize).min(w - 1);
                let sy = (sy.round().max(0.0) as usize).min(h - 1);

                for c in 0..CHANNELS {
                    out[c * h * w + y * w + x] = pixels[c * h * w + sy * w + sx];
                }
            }
        }
        out
    }
}

/// Uniform draw from [-1, 1]
fn symmetric<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(-1.0..=1.0)
}
