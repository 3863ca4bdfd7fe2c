//! Perceptual image hashing and near-duplicate grouping.
//!
//! Images are reduced to bit signatures ([`HashValue`]), compared by Hamming
//! [`distance`], and grouped with [`cluster`].

pub mod config;
pub mod core;
pub mod services;

pub use crate::config::HashConfig;
pub use crate::core::cluster::{ImageRecord, SimilarityGroup, cluster};
pub use crate::core::distance::distance;
pub use crate::core::error::{
    HashComputationError, IncompatibleHashError, ParseHashError, SamplingError,
};
pub use crate::core::gradient::compute_double_gradient;
pub use crate::core::hash::{HashKind, HashValue};
pub use crate::core::hasher::ImageHasher;
pub use crate::core::sampler::{IntensityGrid, sample};
