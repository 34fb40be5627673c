//! Stand-in collaborators for running the pipeline without a camera or model.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::info;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::anchors::{AnchorId, AnchorSink};
use crate::cache::CacheHandle;
use crate::display::DisplayNode;
use crate::perception::{Classifier, Frame, FrameSource};

/// Input size the classifier expects.
const FRAME_SIZE: u32 = 299;

/// Camera that always has a fresh blank frame.
pub struct SyntheticCamera;

impl FrameSource for SyntheticCamera {
    fn current_frame(&self) -> Option<Frame> {
        Some(Frame::blank(FRAME_SIZE, FRAME_SIZE, Utc::now()))
    }
}

/// Replays a fixed list of labels, one per call, wrapping around.
pub struct ScriptedClassifier {
    labels: Vec<String>,
    cursor: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            cursor: AtomicUsize::new(0),
        }
    }

    /// One label per non-blank line.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read label script from {}", path.display()))?;
        let labels: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        if labels.is_empty() {
            bail!("label script {} has no labels", path.display());
        }
        Ok(Self::new(labels))
    }
}

impl Classifier for ScriptedClassifier {
    fn classify(&self, _frame: &Frame) -> Result<String> {
        if self.labels.is_empty() {
            bail!("no scripted labels");
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.labels.len();
        Ok(self.labels[index].clone())
    }
}

/// Renderer that logs the node it would build for each new anchor.
pub struct LoggingRenderer {
    cache: CacheHandle,
}

impl LoggingRenderer {
    pub fn new(cache: CacheHandle) -> Self {
        Self { cache }
    }
}

impl AnchorSink for LoggingRenderer {
    fn remove_anchor(&self, id: AnchorId) {
        log::debug!("anchor {id} removed");
    }

    fn add_anchor(&self, id: AnchorId, viewpoint: &Frame) {
        let latest = self.cache.latest();
        let node = DisplayNode::from_latest(latest.as_ref().map(|entry| &entry.result));
        info!(
            "anchor {id} at {}: {} {}",
            viewpoint.captured_at.format("%H:%M:%S%.3f"),
            node.glyph,
            node.caption
        );
    }
}
