//! HSV conversion and color-range thresholding.
//!
//! Values follow the common 8-bit HSV convention: hue is degrees / 2 (`0..=179`),
//! saturation and value span `0..=255`.

use std::fmt;
use std::str::FromStr;

use image::RgbImage;
use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};

use super::extract::RoiError;

/// Largest hue value in the 8-bit convention.
pub const HUE_MAX: u8 = 179;
/// Lower bound of the default marker range, RGB (240, 0, 0).
pub const DEFAULT_LOWER: HsvPixel = HsvPixel::new(0, 245, 240);
/// Upper bound of the default marker range, RGB (250, 10, 10).
pub const DEFAULT_UPPER: HsvPixel = HsvPixel::new(0, 255, 250);

/// One pixel in 8-bit HSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HsvPixel {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl HsvPixel {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Converts an sRGB triple to 8-bit HSV.
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let srgb: Srgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format();
        let hsv: Hsv = Hsv::from_color(srgb);

        let mut h = (hsv.hue.into_positive_degrees() / 2.0).round() as u16;
        if h > HUE_MAX as u16 {
            h = 0;
        }
        let s = (hsv.saturation * 255.0).round().clamp(0.0, 255.0) as u8;
        let v = (hsv.value * 255.0).round().clamp(0.0, 255.0) as u8;

        Self { h: h as u8, s, v }
    }
}

impl fmt::Display for HsvPixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.h, self.s, self.v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseHsvError {
    #[error("expected three comma-separated values `H,S,V`, got {0:?}")]
    WrongArity(String),

    #[error("invalid channel value {0:?} (expected an integer in 0..=255)")]
    BadChannel(String),
}

impl FromStr for HsvPixel {
    type Err = ParseHsvError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = text.split(',').map(str::trim).collect();
        let &[h, s, v] = parts.as_slice() else {
            return Err(ParseHsvError::WrongArity(text.to_string()));
        };
        let channel = |p: &str| {
            p.parse::<u8>()
                .map_err(|_| ParseHsvError::BadChannel(p.to_string()))
        };
        Ok(Self::new(channel(h)?, channel(s)?, channel(v)?))
    }
}

/// Inclusive lower/upper bounds on all three HSV channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    lower: HsvPixel,
    upper: HsvPixel,
}

impl HsvRange {
    pub fn new(lower: HsvPixel, upper: HsvPixel) -> Result<Self, RoiError> {
        let inverted = lower.h > upper.h || lower.s > upper.s || lower.v > upper.v;
        if inverted || upper.h > HUE_MAX {
            return Err(RoiError::InvalidRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> HsvPixel {
        self.lower
    }

    pub fn upper(&self) -> HsvPixel {
        self.upper
    }

    pub fn contains(&self, px: HsvPixel) -> bool {
        (self.lower.h..=self.upper.h).contains(&px.h)
            && (self.lower.s..=self.upper.s).contains(&px.s)
            && (self.lower.v..=self.upper.v).contains(&px.v)
    }
}

impl Default for HsvRange {
    fn default() -> Self {
        Self {
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER,
        }
    }
}

/// Per-pixel membership in an [`HsvRange`], row-major.
#[derive(Debug, Clone)]
pub struct ColorMask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl ColorMask {
    /// Thresholds every pixel of `image` against `range`.
    pub fn from_image(image: &RgbImage, range: &HsvRange) -> Self {
        let (width, height) = image.dimensions();
        let data = image
            .pixels()
            .map(|p| range.contains(HsvPixel::from_rgb(p.0)))
            .collect();
        Self {
            width: width as usize,
            height: height as usize,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&m| m).count()
    }

    /// One entry per row: does the row contain any marked pixel.
    pub fn rows_marked(&self) -> Vec<bool> {
        if self.width == 0 {
            return vec![false; self.height];
        }
        self.data
            .chunks_exact(self.width)
            .map(|row| row.iter().any(|&m| m))
            .collect()
    }

    /// One entry per column: does the column contain any marked pixel.
    pub fn cols_marked(&self) -> Vec<bool> {
        let mut cols = vec![false; self.width];
        if self.width == 0 {
            return cols;
        }
        for row in self.data.chunks_exact(self.width) {
            for (c, &m) in cols.iter_mut().zip(row) {
                *c |= m;
            }
        }
        cols
    }
}
