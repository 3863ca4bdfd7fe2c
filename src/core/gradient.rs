//! Double gradient hash.
//!
//! The image is reduced to a `(w/2 + 1) x (h/2 + 1)` grayscale grid. Every row
//! contributes one bit per horizontally adjacent pair, then every column one
//! bit per vertically adjacent pair. A bit is set when the later sample is
//! strictly brighter than the earlier one, so ties always yield `false`.

use crate::core::error::HashComputationError;
use crate::core::hash::{HashKind, HashValue};
use crate::core::sampler::{self, IntensityGrid};
use image::DynamicImage;

/// Grid size sampled for a `width` x `height` double gradient hash.
pub fn sample_dimensions(width: u32, height: u32) -> (u32, u32) {
    (
        sampler::round_up_even(width) / 2 + 1,
        sampler::round_up_even(height) / 2 + 1,
    )
}

/// Number of bits produced for a `width` x `height` double gradient hash.
pub fn bit_count(width: u32, height: u32) -> usize {
    let (sw, sh) = sample_dimensions(width, height);
    let (sw, sh) = (sw as usize, sh as usize);
    sh * (sw - 1) + sw * (sh - 1)
}

pub fn compute_double_gradient(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<HashValue, HashComputationError> {
    let (sw, sh) = sample_dimensions(width, height);
    let grid = sampler::sample_exact(image, sw, sh)?;
    let bits = double_gradient_bits(&grid);
    HashValue::from_bools(bits, HashKind::DoubleGradient).map_err(|e| {
        HashComputationError::Extraction {
            message: e.to_string(),
        }
    })
}

/// Horizontal pass bits (row-major) followed by vertical pass bits (column-major).
pub fn double_gradient_bits(grid: &IntensityGrid) -> Vec<bool> {
    let (w, h) = (grid.width(), grid.height());
    let mut bits = Vec::with_capacity(
        (h as usize) * (w as usize).saturating_sub(1)
            + (w as usize) * (h as usize).saturating_sub(1),
    );

    for y in 0..h {
        for x in 1..w {
            bits.push(grid.get(x, y) > grid.get(x - 1, y));
        }
    }

    for x in 0..w {
        for y in 1..h {
            bits.push(grid.get(x, y) > grid.get(x, y - 1));
        }
    }

    bits
}
