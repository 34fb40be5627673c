pub mod controller;
mod loop_worker;
pub mod pipeline;
pub mod state;

pub use controller::{Collaborators, PipelineController};
pub use pipeline::{Pipeline, Prediction, PredictionOutcome};
pub use state::{Cadence, ScheduleState, Scheduler, TickDecision};
