use crate::core::error::SamplingError;
use image::{DynamicImage, GenericImageView, imageops::FilterType};

/// Single-channel intensity samples, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityGrid {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl IntensityGrid {
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }
}

pub fn round_up_even(n: u32) -> u32 {
    n.saturating_add(n % 2)
}

/// Grayscale `image` and resample it to the even-rounded target size.
pub fn sample(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
) -> Result<IntensityGrid, SamplingError> {
    sample_exact(
        image,
        round_up_even(target_width),
        round_up_even(target_height),
    )
}

/// Grayscale `image` and resample it to exactly `width` x `height` with Lanczos3.
pub fn sample_exact(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<IntensityGrid, SamplingError> {
    let (src_width, src_height) = image.dimensions();
    if src_width == 0 || src_height == 0 {
        return Err(SamplingError::EmptyImage {
            width: src_width,
            height: src_height,
        });
    }
    if width == 0 || height == 0 {
        return Err(SamplingError::InvalidTarget { width, height });
    }

    let gray = image.to_luma8();
    let resized = if (src_width, src_height) == (width, height) {
        gray
    } else {
        image::imageops::resize(&gray, width, height, FilterType::Lanczos3)
    };

    Ok(IntensityGrid {
        width,
        height,
        pixels: resized.into_raw(),
    })
}
