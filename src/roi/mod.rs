pub mod bbox;
pub use bbox::{BoundingBox, find_marker_bbox};
pub mod ellipse;
pub use ellipse::InscribedEllipse;
pub mod extract;
pub use extract::{MaskOutcome, RoiConfig, RoiError, RoiExtraction, extract_roi, mask_image_file};
pub mod hsv;
pub use hsv::{ColorMask, HsvPixel, HsvRange};
