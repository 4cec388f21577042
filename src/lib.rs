//! Region-of-interest extraction for images annotated with a colored ellipse marker.

pub mod batch;
pub mod roi;
