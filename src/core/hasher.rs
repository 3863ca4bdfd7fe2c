use crate::config::HashConfig;
use crate::core::error::{HashComputationError, SamplingError};
use crate::core::gradient;
use crate::core::hash::{HashKind, HashValue};
use image::{DynamicImage, GenericImageView};
use image_hasher::{BitOrder, HashAlg, HasherConfig};

/// Computes [`HashValue`]s of a single configured kind.
///
/// Double gradient hashes are computed in-crate. Average, difference and
/// perception hashes are delegated to `image_hasher` and repacked.
pub struct ImageHasher {
    kind: HashKind,
    width: u32,
    height: u32,
    external: Option<image_hasher::Hasher>,
}

impl ImageHasher {
    pub fn new(config: &HashConfig) -> Self {
        let base = HasherConfig::new()
            .hash_size(config.width, config.height)
            .bit_order(BitOrder::LsbFirst);
        let external = match config.kind {
            HashKind::DoubleGradient => None,
            HashKind::Average => Some(base.hash_alg(HashAlg::Mean)),
            HashKind::Difference => Some(base.hash_alg(HashAlg::Gradient)),
            HashKind::Perception => Some(base.hash_alg(HashAlg::Mean).preproc_dct()),
        }
        // image_hasher panics on an empty hash size
        .filter(|_| config.width > 0 && config.height > 0)
        .map(|cfg| cfg.to_hasher());

        Self {
            kind: config.kind,
            width: config.width,
            height: config.height,
            external,
        }
    }

    pub fn kind(&self) -> HashKind {
        self.kind
    }

    /// Bits in every hash this hasher produces.
    pub fn bit_count(&self) -> usize {
        match self.kind {
            HashKind::DoubleGradient => gradient::bit_count(self.width, self.height),
            HashKind::Average | HashKind::Difference | HashKind::Perception => {
                self.width as usize * self.height as usize
            }
        }
    }

    pub fn hash_image(&self, image: &DynamicImage) -> Result<HashValue, HashComputationError> {
        if self.width == 0 || self.height == 0 {
            return Err(SamplingError::InvalidTarget {
                width: self.width,
                height: self.height,
            }
            .into());
        }
        let Some(hasher) = &self.external else {
            return gradient::compute_double_gradient(image, self.width, self.height);
        };

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SamplingError::EmptyImage { width, height }.into());
        }

        let hash = hasher.hash_image(image);
        HashValue::from_bytes(hash.as_bytes(), self.kind, self.bit_count()).map_err(|e| {
            HashComputationError::Extraction {
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn checker(width: u32, height: u32, cell: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            if ((x / cell) + (y / cell)) % 2 == 0 {
                Rgb([230, 230, 230])
            } else {
                Rgb([20, 20, 20])
            }
        }))
    }

    #[test]
    fn test_every_kind_produces_its_own_kind() {
        let img = checker(64, 64, 8);
        for kind in HashKind::ALL {
            let hasher = ImageHasher::new(&HashConfig::new(kind));
            let hash = hasher.hash_image(&img).unwrap();
            assert_eq!(hash.kind(), kind);
            assert!(hash.bits() > 0);
        }
    }

    #[test]
    fn test_external_kinds_use_hash_size() {
        let img = checker(64, 64, 8);
        for kind in [HashKind::Average, HashKind::Difference, HashKind::Perception] {
            let hash = ImageHasher::new(&HashConfig::new(kind))
                .hash_image(&img)
                .unwrap();
            assert_eq!(hash.bits(), 64, "{kind}");
        }
    }

    #[test]
    fn test_external_bit_count_is_exact() {
        let img = checker(64, 64, 8);
        for kind in [HashKind::Average, HashKind::Difference, HashKind::Perception] {
            let hasher = ImageHasher::new(&HashConfig::new(kind).with_size(7, 5));
            let hash = hasher.hash_image(&img).unwrap();
            assert_eq!(hash.bits(), 35, "{kind}");
            assert_eq!(hash.to_binary_string().len(), 35);
            assert_eq!(hash.to_bytes().len(), 5);
        }
    }

    #[test]
    fn test_bit_count_matches_output() {
        let img = checker(64, 64, 8);
        for kind in HashKind::ALL {
            let hasher = ImageHasher::new(&HashConfig::new(kind).with_size(7, 5));
            assert_eq!(hasher.hash_image(&img).unwrap().bits(), hasher.bit_count());
        }
    }

    #[test]
    fn test_zero_size_fails_for_every_kind() {
        let img = checker(64, 64, 8);
        for kind in HashKind::ALL {
            for (w, h) in [(0, 0), (0, 8), (8, 0)] {
                let hasher = ImageHasher::new(&HashConfig::new(kind).with_size(w, h));
                assert_eq!(
                    hasher.hash_image(&img).unwrap_err(),
                    HashComputationError::Sampling(SamplingError::InvalidTarget {
                        width: w,
                        height: h
                    }),
                    "{kind} {w}x{h}"
                );
            }
        }
    }

    #[test]
    fn test_same_image_same_hash() {
        let img = checker(48, 32, 4);
        for kind in HashKind::ALL {
            let hasher = ImageHasher::new(&HashConfig::new(kind));
            let a = hasher.hash_image(&img).unwrap();
            let b = hasher.hash_image(&img).unwrap();
            assert_eq!(a.distance(&b).unwrap(), 0);
        }
    }

    #[test]
    fn test_degenerate_image_fails_for_every_kind() {
        let empty = DynamicImage::new_rgb8(0, 0);
        for kind in HashKind::ALL {
            let hasher = ImageHasher::new(&HashConfig::new(kind));
            assert!(matches!(
                hasher.hash_image(&empty),
                Err(HashComputationError::Sampling(_))
            ));
        }
    }
}
