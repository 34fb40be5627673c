use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::anchors::SharedAnchorBoard;
use crate::perception::{AccessibilitySignal, Classifier, FrameSource};

use super::pipeline::{Pipeline, Prediction};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Everything the render loop needs, cloned out of the controller per session.
#[derive(Clone)]
pub(crate) struct LoopContext {
    pub pipeline: Arc<Mutex<Pipeline>>,
    pub frames: Arc<dyn FrameSource>,
    pub classifier: Arc<dyn Classifier>,
    pub accessibility: Arc<dyn AccessibilitySignal>,
    pub anchors: SharedAnchorBoard,
    pub tick_interval: Duration,
    pub anchor_delay: Duration,
}

/// Drive the pipeline from a periodic render clock until cancelled.
///
/// Ticks are handled one at a time. Classification runs on a blocking worker and
/// its result comes back through a channel, so the pipeline is only ever
/// mutated from this task. At most one classification is in flight.
pub(crate) async fn render_loop(ctx: LoopContext, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(ctx.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Prediction>();
    let mut in_flight = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Utc::now();
                let extended_reading = ctx.accessibility.extended_reading();
                let (decision, generation) = {
                    let mut pipeline = ctx.pipeline.lock().await;
                    let decision = pipeline.tick(now, extended_reading);
                    // Placed under the pipeline lock so a restart can't clear in between.
                    if decision.refresh && ctx.anchor_delay.is_zero() {
                        ctx.anchors.lock().replace(ctx.frames.as_ref(), now);
                    }
                    (decision, pipeline.generation())
                };

                if decision.predict {
                    if in_flight {
                        log_debug!("classification still running at {now}; skipping predict tick");
                    } else {
                        in_flight = dispatch_prediction(&ctx, generation, now, done_tx.clone());
                    }
                }

                if decision.refresh && !ctx.anchor_delay.is_zero() {
                    defer_anchor(&ctx, generation);
                }
            }
            Some(prediction) = done_rx.recv() => {
                in_flight = false;
                ctx.pipeline.lock().await.apply(prediction);
            }
            _ = cancel_token.cancelled() => {
                log_info!("render loop shutting down");
                break;
            }
        }
    }
}

/// Returns whether a classification was started.
fn dispatch_prediction(
    ctx: &LoopContext,
    generation: u64,
    observed_at: DateTime<Utc>,
    done_tx: mpsc::UnboundedSender<Prediction>,
) -> bool {
    let Some(frame) = ctx.frames.current_frame() else {
        log_warn!("no current frame at {observed_at}; skipping prediction");
        return false;
    };

    let classifier = Arc::clone(&ctx.classifier);
    tokio::spawn(async move {
        let started = std::time::Instant::now();
        let label = match tokio::task::spawn_blocking(move || classifier.classify(&frame)).await {
            Ok(Ok(label)) => {
                log_debug!("classified in {}ms: {label:?}", started.elapsed().as_millis());
                Some(label)
            }
            Ok(Err(err)) => {
                log_warn!("classifier failed: {err:#}");
                None
            }
            Err(err) => {
                log_error!("classifier worker join failed: {err}");
                None
            }
        };

        // The loop may already be gone after a stop; nothing to deliver to then.
        let _ = done_tx.send(Prediction {
            generation,
            observed_at,
            label,
        });
    });

    true
}

/// Replace the anchor after `anchor_delay`, unless the session has moved on by then.
fn defer_anchor(ctx: &LoopContext, generation: u64) {
    let pipeline = Arc::clone(&ctx.pipeline);
    let frames = Arc::clone(&ctx.frames);
    let anchors = ctx.anchors.clone();
    let delay = ctx.anchor_delay;

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let pipeline = pipeline.lock().await;
        if pipeline.generation() != generation {
            log_debug!("dropping deferred anchor from generation {generation}");
            return;
        }
        anchors.lock().replace(frames.as_ref(), Utc::now());
    });
}
