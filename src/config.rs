use crate::core::hash::HashKind;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HASH_SIZE: u32 = 8;
pub const DEFAULT_THRESHOLD: u32 = 10;

/// Settings threaded explicitly through hashing, comparison and clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashConfig {
    pub kind: HashKind,
    pub width: u32,
    pub height: u32,
    /// Maximum Hamming distance at which two hashes count as similar.
    pub threshold: u32,
}

impl HashConfig {
    pub fn new(kind: HashKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn is_similar(&self, distance: u32) -> bool {
        distance <= self.threshold
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            kind: HashKind::DoubleGradient,
            width: DEFAULT_HASH_SIZE,
            height: DEFAULT_HASH_SIZE,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}
