//! Label-to-emoji matching.
//!
//! `tiers` maps a single phrase to symbols (exact first, then a frequency vote over
//! containment, tag and per-word hits). `compound` handles the comma-joined labels
//! the classifier emits for its top candidates.

pub mod compound;
pub mod tally;
pub mod tiers;

pub use compound::{resolve_label, NEMATODE_LABEL, THINKING_FACE};
pub use tally::SymbolTally;
pub use tiers::{MatchTier, Matcher, PhraseMatch};
