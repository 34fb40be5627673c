use chrono::{DateTime, Utc};
use image::DynamicImage;
use std::sync::Arc;

/// A camera frame as handed to the classifier.
///
/// The image is shared so a frame can be moved onto a blocking worker without
/// copying pixels.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: Arc<DynamicImage>,
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(image: DynamicImage, captured_at: DateTime<Utc>) -> Self {
        Self {
            image: Arc::new(image),
            captured_at,
        }
    }

    /// Solid-colour RGB frame, used by the demo binary and tests.
    pub fn blank(width: u32, height: u32, captured_at: DateTime<Utc>) -> Self {
        Self::new(DynamicImage::new_rgb8(width, height), captured_at)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}
