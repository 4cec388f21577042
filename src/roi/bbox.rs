use std::fmt;

use serde::{Deserialize, Serialize};

use super::extract::RoiError;
use super::hsv::ColorMask;

/// Axis-aligned box spanned by the outermost marked rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_left: u32,
    pub y_top: u32,
    pub x_right: u32,
    pub y_bottom: u32,
}

impl BoundingBox {
    pub const fn new(x_left: u32, y_top: u32, x_right: u32, y_bottom: u32) -> Self {
        Self {
            x_left,
            y_top,
            x_right,
            y_bottom,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.x_left >= self.x_right || self.y_top >= self.y_bottom
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.x_left, self.y_top, self.x_right, self.y_bottom
        )
    }
}

fn first_true(seq: &[bool]) -> Option<usize> {
    seq.iter().position(|&b| b)
}

fn last_true(seq: &[bool]) -> Option<usize> {
    seq.iter().rposition(|&b| b)
}

/// Locates the marker from the first and last marked row and column.
///
/// Fails with [`RoiError::NoMarker`] when nothing is marked and with
/// [`RoiError::DegenerateMarker`] when the marked pixels span a single row or column.
pub fn find_marker_bbox(mask: &ColorMask) -> Result<BoundingBox, RoiError> {
    let rows = mask.rows_marked();
    let cols = mask.cols_marked();

    let (Some(y_top), Some(y_bottom)) = (first_true(&rows), last_true(&rows)) else {
        return Err(RoiError::NoMarker);
    };
    let (Some(x_left), Some(x_right)) = (first_true(&cols), last_true(&cols)) else {
        return Err(RoiError::NoMarker);
    };

    let bbox = BoundingBox::new(
        x_left as u32,
        y_top as u32,
        x_right as u32,
        y_bottom as u32,
    );
    if bbox.is_degenerate() {
        return Err(RoiError::DegenerateMarker(bbox));
    }
    Ok(bbox)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_and_last_true_indices() {
        let seq = [false, true, false, true, false];
        assert_eq!(first_true(&seq), Some(1));
        assert_eq!(last_true(&seq), Some(3));
        assert_eq!(first_true(&[false, false]), None);
        assert_eq!(last_true(&[]), None);
    }

    #[test]
    fn degenerate_boxes() {
        assert!(BoundingBox::new(5, 1, 5, 9).is_degenerate());
        assert!(BoundingBox::new(1, 7, 9, 7).is_degenerate());
        assert!(!BoundingBox::new(1, 2, 3, 4).is_degenerate());
    }

    #[test]
    fn displays_as_tuple() {
        assert_eq!(BoundingBox::new(10, 20, 110, 120).to_string(), "(10, 20, 110, 120)");
    }
}
