// Device telemetry pipeline: classify -> AP registry -> assignment -> capacity estimate.
// Everything here is pure and synchronous; the aggregator drives it once per cycle.

pub mod assign;
pub mod classify;
pub mod distribute;
pub mod registry;

pub use assign::{Assignment, AssignmentMethod, assign, resolve};
pub use classify::{Classification, SignalReading, classify};
pub use distribute::{capacity_weight, distribute, split_band};
pub use registry::{ApRegistry, build_registry};
