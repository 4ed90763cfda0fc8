//! Truth tables, NPN canonicalization and per-class statistics

mod canon;
mod collector;
mod truth_table;

pub use canon::{apply, canonical_key, canonicalize, NpnTransform};
pub use collector::{ClassAggregate, GateStats, NpnCollector, NpnOptions, NpnStats};
pub use truth_table::{TruthTable, MAX_VARS};
