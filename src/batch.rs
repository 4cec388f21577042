//! Applies ROI extraction to every unprocessed image in a directory.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::roi::{MaskOutcome, RoiConfig, RoiError, mask_image_file};

/// Directory processed by `--batch`, relative to the working directory.
pub const BATCH_DIR: &str = "red_circle";

pub fn is_image_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(OsStr::to_str) else {
        return false;
    };
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "jpg" | "jpeg" | "png" | "bmp" | "tif" | "tiff"
    )
}

/// True for files an earlier run wrote, recognised by their stem suffix.
pub fn is_derived_output(path: &Path, skip_suffixes: &[String]) -> bool {
    let Some(stem) = path.file_stem().and_then(OsStr::to_str) else {
        return false;
    };
    skip_suffixes.iter().any(|suffix| stem.ends_with(suffix.as_str()))
}

/// Lists the images in `dir` that still need processing, sorted by path.
///
/// A missing directory holds no images.
pub fn discover_images(dir: &Path, config: &RoiConfig) -> io::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("{} does not exist", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut images: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_image_file(p))
        .filter(|p| {
            let derived = is_derived_output(p, &config.skip_suffixes);
            if derived {
                debug!("skipping previous output {}", p.display());
            }
            !derived
        })
        .collect();

    images.sort();
    Ok(images)
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub file: PathBuf,
    pub reason: String,
}

/// Per-directory summary; `succeeded + failures.len() == total`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub directory: PathBuf,
    pub total: usize,
    pub succeeded: usize,
    pub outcomes: Vec<MaskOutcome>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    fn new(directory: &Path, total: usize) -> Self {
        Self {
            directory: directory.to_path_buf(),
            total,
            succeeded: 0,
            outcomes: Vec::with_capacity(total),
            failures: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Processes every discovered image, never stopping on a per-file error.
pub fn process_directory(dir: &Path, config: &RoiConfig) -> io::Result<BatchReport> {
    process_directory_with(dir, config, |_, _| {})
}

/// Like [`process_directory`], calling `on_result` after each file.
pub fn process_directory_with<F>(
    dir: &Path,
    config: &RoiConfig,
    on_result: F,
) -> io::Result<BatchReport>
where
    F: FnMut(&Path, &Result<MaskOutcome, RoiError>),
{
    let images = discover_images(dir, config)?;
    Ok(process_images(dir, &images, config, on_result))
}

/// Processes an already discovered list of images from `dir`.
pub fn process_images<F>(
    dir: &Path,
    images: &[PathBuf],
    config: &RoiConfig,
    mut on_result: F,
) -> BatchReport
where
    F: FnMut(&Path, &Result<MaskOutcome, RoiError>),
{
    let mut report = BatchReport::new(dir, images.len());

    for image_path in images {
        let result = mask_image_file(image_path, config);
        on_result(image_path, &result);
        match result {
            Ok(outcome) => {
                report.succeeded += 1;
                report.outcomes.push(outcome);
            }
            Err(e) => {
                info!("{}: {e}", image_path.display());
                report.failures.push(BatchFailure {
                    file: image_path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}
