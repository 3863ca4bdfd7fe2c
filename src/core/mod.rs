pub mod cluster;
pub mod distance;
pub mod error;
pub mod gradient;
pub mod hash;
pub mod hasher;
pub mod sampler;
