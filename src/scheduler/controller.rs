use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::anchors::{AnchorSink, SharedAnchorBoard};
use crate::cache::CacheHandle;
use crate::catalog::Catalog;
use crate::display::DisplayNode;
use crate::perception::{AccessibilitySignal, Classifier, FrameSource};
use crate::settings::PipelineSettings;

use super::loop_worker::{render_loop, LoopContext};
use super::pipeline::Pipeline;
use super::state::ScheduleState;

/// The external pieces the pipeline talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub frames: Arc<dyn FrameSource>,
    pub classifier: Arc<dyn Classifier>,
    pub anchors: Arc<dyn AnchorSink>,
    pub accessibility: Arc<dyn AccessibilitySignal>,
}

/// Owns the render loop for one camera session at a time.
pub struct PipelineController {
    ctx: LoopContext,
    cache: CacheHandle,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl PipelineController {
    /// `cache` is the handle the renderer reads from; the controller is its only writer.
    pub fn new(
        catalog: Arc<Catalog>,
        cache: CacheHandle,
        collaborators: Collaborators,
        settings: &PipelineSettings,
    ) -> Self {
        let pipeline = Pipeline::new(catalog, cache.clone(), settings, Utc::now());

        let ctx = LoopContext {
            pipeline: Arc::new(Mutex::new(pipeline)),
            frames: collaborators.frames,
            classifier: collaborators.classifier,
            accessibility: collaborators.accessibility,
            anchors: SharedAnchorBoard::new(collaborators.anchors),
            tick_interval: settings.tick_interval(),
            anchor_delay: settings.anchor_delay(),
        };

        Self {
            ctx,
            cache,
            handle: None,
            cancel_token: None,
        }
    }

    /// Reader side of the cache, for the renderer.
    pub fn cache(&self) -> CacheHandle {
        self.cache.clone()
    }

    pub fn display_node(&self) -> DisplayNode {
        let latest = self.cache.latest();
        DisplayNode::from_latest(latest.as_ref().map(|entry| &entry.result))
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub async fn schedule(&self) -> ScheduleState {
        self.ctx.pipeline.lock().await.schedule()
    }

    pub async fn start(&mut self) -> Result<()> {
        if self.handle.is_some() {
            bail!("pipeline already running");
        }

        self.restart_session().await;

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(render_loop(self.ctx.clone(), cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Clear the scene and cache and restart both clocks. Safe while running:
    /// any classification still in flight is discarded when it lands.
    pub async fn restart_session(&self) {
        let mut pipeline = self.ctx.pipeline.lock().await;
        let generation = pipeline.start_session(Utc::now());
        // Cleared after the generation bump, still under the lock, so no deferred
        // placement from the old session can land afterwards.
        self.ctx.anchors.lock().clear();
        drop(pipeline);
        info!("camera session {generation} running");
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        self.ctx.pipeline.lock().await.end_session();

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("render loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}
