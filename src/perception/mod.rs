//! Seams to the outside world: the camera, the image classifier and the
//! accessibility setting. None of these are implemented here beyond test and
//! demo stand-ins.

mod frame;

pub use frame::Frame;

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Provides the most recent camera frame, if the session has one yet.
pub trait FrameSource: Send + Sync {
    fn current_frame(&self) -> Option<Frame>;
}

/// Opaque image classifier. May block; it is always run on a blocking worker.
///
/// The returned label is either one phrase or ranked phrases joined by commas.
pub trait Classifier: Send + Sync {
    fn classify(&self, frame: &Frame) -> Result<String>;
}

/// Polled on every refresh decision, never cached.
pub trait AccessibilitySignal: Send + Sync {
    /// True when a screen reader needs extra time per displayed result.
    fn extended_reading(&self) -> bool;
}

impl<F> AccessibilitySignal for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn extended_reading(&self) -> bool {
        self()
    }
}

/// Toggleable signal for hosts that push accessibility changes.
#[derive(Debug, Clone, Default)]
pub struct ReadingModeFlag(Arc<AtomicBool>);

impl ReadingModeFlag {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::SeqCst);
    }
}

impl AccessibilitySignal for ReadingModeFlag {
    fn extended_reading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
