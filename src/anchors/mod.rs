//! Anchor bookkeeping for the renderer.
//!
//! The renderer owns the scene; this side only decides when an anchor is
//! replaced. [`AnchorBoard::replace`] always removes what is active before adding,
//! so at most one anchor exists at a time.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::perception::{Frame, FrameSource};

pub type AnchorId = Uuid;

/// Scene-side receiver of anchor signals.
pub trait AnchorSink: Send + Sync {
    fn remove_anchor(&self, id: AnchorId);
    /// Place a new anchor at the viewpoint of `frame`. The renderer builds its
    /// node from [`crate::cache::CacheHandle::latest`] when the anchor appears.
    fn add_anchor(&self, id: AnchorId, viewpoint: &Frame);
}

/// Tracks active anchors and forwards changes to the sink.
pub struct AnchorBoard {
    sink: Arc<dyn AnchorSink>,
    active: Vec<AnchorId>,
}

impl AnchorBoard {
    pub fn new(sink: Arc<dyn AnchorSink>) -> Self {
        Self {
            sink,
            active: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        for id in self.active.drain(..) {
            self.sink.remove_anchor(id);
        }
    }

    /// Clear prior anchors, then add one at the current viewpoint.
    ///
    /// Without a frame there is no viewpoint, so only the clear happens.
    pub fn replace(&mut self, frames: &dyn FrameSource, now: DateTime<Utc>) -> Option<AnchorId> {
        self.clear();

        let Some(frame) = frames.current_frame() else {
            warn!("no frame for anchor placement at {now}; leaving scene empty");
            return None;
        };

        let id = Uuid::new_v4();
        self.sink.add_anchor(id, &frame);
        self.active.push(id);
        debug!("anchor {id} placed at {now}");
        Some(id)
    }

    pub fn active(&self) -> &[AnchorId] {
        &self.active
    }
}

/// Board shared between the tick loop and deferred placements.
#[derive(Clone)]
pub struct SharedAnchorBoard {
    inner: Arc<Mutex<AnchorBoard>>,
}

impl SharedAnchorBoard {
    pub fn new(sink: Arc<dyn AnchorSink>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AnchorBoard::new(sink))),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, AnchorBoard> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
