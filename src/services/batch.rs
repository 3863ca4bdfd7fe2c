use crate::core::cluster::ImageRecord;
use crate::core::error::HashComputationError;
use crate::core::hash::HashValue;
use crate::core::hasher::ImageHasher;
use image::{DynamicImage, ImageReader};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to hash {path}: {source}")]
    Hash {
        path: String,
        #[source]
        source: HashComputationError,
    },
}

/// Result of hashing a list of files; failed items are skipped, not fatal.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successfully hashed files, in input order.
    pub records: Vec<ImageRecord>,
    pub failures: Vec<(PathBuf, BatchError)>,
}

pub fn load_image(path: &Path) -> Result<DynamicImage, BatchError> {
    let display = || path.display().to_string();
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|source| BatchError::Open {
            path: display(),
            source,
        })?
        .decode()
        .map_err(|source| BatchError::Decode {
            path: display(),
            source,
        })
}

pub fn hash_file(path: &Path, hasher: &ImageHasher) -> Result<HashValue, BatchError> {
    let img = load_image(path)?;
    hasher.hash_image(&img).map_err(|source| BatchError::Hash {
        path: path.display().to_string(),
        source,
    })
}

/// Hash `paths` in parallel. Output order matches input order.
pub fn hash_files(
    paths: &[PathBuf],
    hasher: &ImageHasher,
    progress: Option<&ProgressBar>,
) -> BatchOutcome {
    let results: Vec<(PathBuf, Result<HashValue, BatchError>)> = paths
        .par_iter()
        .map(|path| {
            let result = hash_file(path, hasher);
            if let Some(pb) = progress {
                pb.inc(1);
            }
            (path.clone(), result)
        })
        .collect();

    let mut outcome = BatchOutcome::default();
    for (path, result) in results {
        match result {
            Ok(hash) => {
                log::debug!("Processed: {}", path.display());
                outcome
                    .records
                    .push(ImageRecord::new(path.to_string_lossy(), hash));
            }
            Err(err) => {
                log::warn!("Skipping {}: {}", path.display(), err);
                outcome.failures.push((path, err));
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashConfig;
    use crate::core::hash::HashKind;
    use image::{ImageBuffer, Rgb};
    use std::fs;
    use tempfile::TempDir;

    fn create_test_image(path: &Path, width: u32, height: u32, shift: u32) {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let intensity = ((x * 3 + y + shift) % 256) as u8;
            Rgb([intensity, intensity, intensity])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_hash_files_keeps_order_and_skips_failures() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.png");
        let broken = temp_dir.path().join("broken.png");
        let second = temp_dir.path().join("second.png");
        create_test_image(&first, 64, 64, 0);
        fs::write(&broken, b"definitely not a png").unwrap();
        create_test_image(&second, 32, 48, 7);

        let hasher = ImageHasher::new(&HashConfig::default());
        let paths = vec![first.clone(), broken.clone(), second.clone()];
        let outcome = hash_files(&paths, &hasher, None);

        let sources: Vec<&str> = outcome
            .records
            .iter()
            .map(|r| r.source_id.as_str())
            .collect();
        assert_eq!(
            sources,
            vec![first.to_str().unwrap(), second.to_str().unwrap()]
        );
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, broken);
        assert!(matches!(outcome.failures[0].1, BatchError::Decode { .. }));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let temp_dir = TempDir::new().unwrap();
        let hasher = ImageHasher::new(&HashConfig::default());
        let err = hash_file(&temp_dir.path().join("missing.png"), &hasher).unwrap_err();
        assert!(matches!(err, BatchError::Open { .. }));
    }

    #[test]
    fn test_hash_file_uses_configured_kind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("img.png");
        create_test_image(&path, 40, 40, 3);

        let hasher = ImageHasher::new(&HashConfig::new(HashKind::Perception));
        let hash = hash_file(&path, &hasher).unwrap();
        assert_eq!(hash.kind(), HashKind::Perception);
    }

    #[test]
    fn test_progress_counts_every_item() {
        let temp_dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..4)
            .map(|i| {
                let p = temp_dir.path().join(format!("{i}.png"));
                create_test_image(&p, 16, 16, i);
                p
            })
            .collect();
        let pb = ProgressBar::hidden();
        let hasher = ImageHasher::new(&HashConfig::default());
        let outcome = hash_files(&paths, &hasher, Some(&pb));
        assert_eq!(outcome.records.len(), 4);
        assert_eq!(pb.position(), 4);
    }
}
