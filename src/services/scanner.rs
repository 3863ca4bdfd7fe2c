use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const DEFAULT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub recursive: bool,
    /// Lowercase extensions without the leading dot.
    pub extensions: Vec<String>,
}

impl ScanOptions {
    pub fn new(recursive: bool, extensions: &[String]) -> Self {
        Self {
            recursive,
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| self.extensions.iter().any(|e| *e == ext.to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Walk `dir` and return image files in file-name order.
///
/// Only the top level is read unless `options.recursive` is set.
pub fn find_image_files(dir: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::InvalidPath {
            path: dir.display().to_string(),
        });
    }

    let mut walker = WalkDir::new(dir).sort_by_file_name();
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let mut images = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && options.accepts(path) {
            images.push(path.to_path_buf());
        }
    }
    log::debug!("Found {} image file(s) under {}", images.len(), dir.display());
    Ok(images)
}
