//! Geometry and rasterization of the ellipse inscribed in a marker box.

use image::{GrayImage, Luma};

use super::bbox::BoundingBox;

pub const INSIDE: Luma<u8> = Luma([255]);
pub const OUTSIDE: Luma<u8> = Luma([0]);

/// Axis-aligned ellipse with integer center and semi-axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InscribedEllipse {
    pub center: (u32, u32),
    pub semi_axes: (u32, u32),
}

impl InscribedEllipse {
    /// Center is the box midpoint, semi-axes are half the box extents.
    /// Both use floor division.
    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self {
            center: (
                (bbox.x_left + bbox.x_right) / 2,
                (bbox.y_top + bbox.y_bottom) / 2,
            ),
            semi_axes: (
                (bbox.x_right - bbox.x_left) / 2,
                (bbox.y_bottom - bbox.y_top) / 2,
            ),
        }
    }

    /// `((x - cx) / a)^2 + ((y - cy) / b)^2`; below 1.0 is inside.
    ///
    /// A zero semi-axis collapses that direction to the center line.
    pub fn normalized_radius(&self, x: u32, y: u32) -> f64 {
        let term = |p: u32, c: u32, r: u32| {
            let d = p as f64 - c as f64;
            if r == 0 {
                if d == 0.0 { 0.0 } else { f64::INFINITY }
            } else {
                (d / r as f64).powi(2)
            }
        };
        term(x, self.center.0, self.semi_axes.0) + term(y, self.center.1, self.semi_axes.1)
    }

    /// Rasterizes the filled ellipse into a `width` x `height` mask:
    /// [`INSIDE`] where the normalized radius is at most 1.0, [`OUTSIDE`] elsewhere.
    pub fn rasterize(&self, width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            if self.normalized_radius(x, y) <= 1.0 {
                INSIDE
            } else {
                OUTSIDE
            }
        })
    }
}
