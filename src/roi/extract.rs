//! Detects a colored marker and blacks out everything outside the ellipse inscribed in its box.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError, ImageFormat, Rgb, RgbImage};
use imageproc::map::map_colors2;
use log::debug;
use serde::Serialize;

use super::bbox::{BoundingBox, find_marker_bbox};
use super::ellipse::{INSIDE, InscribedEllipse};
use super::hsv::{ColorMask, HsvPixel, HsvRange};

pub const OUTPUT_SUFFIX: &str = "_keep_red";
/// Stems ending in one of these were produced by an earlier run.
pub const SKIP_SUFFIXES: [&str; 2] = ["_mask", "_keep_red"];

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Configuration for marker detection and output naming.
#[derive(Debug, Clone)]
pub struct RoiConfig {
    pub range: HsvRange,
    pub output_suffix: String,
    pub skip_suffixes: Vec<String>,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            range: HsvRange::default(),
            output_suffix: OUTPUT_SUFFIX.to_string(),
            skip_suffixes: SKIP_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RoiConfig {
    pub fn with_range(range: HsvRange) -> Self {
        Self {
            range,
            ..Self::default()
        }
    }
}

/// Errors raised while extracting a region of interest.
#[derive(Debug, thiserror::Error)]
pub enum RoiError {
    #[error("image not found or unreadable: {}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("no marker detected: no pixel falls inside the configured color range")]
    NoMarker,

    #[error("no marker detected: marked pixels collapse to a degenerate box {0}")]
    DegenerateMarker(BoundingBox),

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("invalid HSV range {lower}..={upper}")]
    InvalidRange { lower: HsvPixel, upper: HsvPixel },
}

impl RoiError {
    /// True when the color range matched nothing usable, as opposed to an I/O problem.
    pub fn is_detection_failure(&self) -> bool {
        matches!(self, Self::NoMarker | Self::DegenerateMarker(_))
    }
}

/// In-memory result of [`extract_roi`].
#[derive(Debug, Clone)]
pub struct RoiExtraction {
    pub bbox: BoundingBox,
    pub ellipse: InscribedEllipse,
    pub masked: RgbImage,
}

/// Result of [`mask_image_file`].
#[derive(Debug, Clone, Serialize)]
pub struct MaskOutcome {
    pub input: PathBuf,
    pub bbox: BoundingBox,
    pub output: PathBuf,
}

/// Finds the marker in `source` and returns a copy with every pixel outside
/// the inscribed ellipse set to black.
pub fn extract_roi(source: &DynamicImage, config: &RoiConfig) -> Result<RoiExtraction, RoiError> {
    let rgb = source.to_rgb8();
    let (width, height) = rgb.dimensions();

    let color_mask = ColorMask::from_image(&rgb, &config.range);
    debug!(
        "color mask: {} of {}x{} pixels in range {}..={}",
        color_mask.count(),
        color_mask.width(),
        color_mask.height(),
        config.range.lower(),
        config.range.upper()
    );

    let bbox = find_marker_bbox(&color_mask)?;
    let ellipse = InscribedEllipse::from_bbox(&bbox);
    debug!(
        "marker bbox {bbox}, ellipse center {:?} semi-axes {:?}",
        ellipse.center, ellipse.semi_axes
    );

    let ellipse_mask = ellipse.rasterize(width, height);
    let masked = map_colors2(&rgb, &ellipse_mask, |px, m| if m == INSIDE { px } else { BLACK });

    Ok(RoiExtraction {
        bbox,
        ellipse,
        masked,
    })
}

/// `dir/stem.ext` -> `dir/stem{suffix}.jpg`.
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}.jpg"))
}

/// Reads `path`, masks it and writes the JPEG result next to the input.
pub fn mask_image_file(path: &Path, config: &RoiConfig) -> Result<MaskOutcome, RoiError> {
    let source = image::open(path).map_err(|source| RoiError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let extraction = extract_roi(&source, config)?;

    let output = output_path_for(path, &config.output_suffix);
    extraction
        .masked
        .save_with_format(&output, ImageFormat::Jpeg)
        .map_err(|source| RoiError::Write {
            path: output.clone(),
            source,
        })?;

    Ok(MaskOutcome {
        input: path.to_path_buf(),
        bbox: extraction.bbox,
        output,
    })
}
