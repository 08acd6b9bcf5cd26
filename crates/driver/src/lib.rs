//! Sweep orchestration and checkpointing over the fibersweep mode solver.
//!
//! The driver enumerates a three-axis parameter grid (inner-radius
//! proportion × outer radius × ring composition), batches each outer-radius
//! slice into one solver invocation, grows the result tensors as new modes
//! are discovered, and checkpoints after every completed slice so an
//! interrupted sweep resumes where it left off.

pub mod checkpoint;
pub mod config;
pub mod sweep;
pub mod tensor;

pub use checkpoint::{CheckpointError, CheckpointStore};
pub use config::{ConfigError, GridConfig, RangeSpec, SweepConfig};
pub use sweep::{DiscoveryPolicy, DriverError, SliceEvent, SweepDriver, SweepStats};
pub use tensor::{Quantity, SweepResults};

#[cfg(test)]
mod _tests_tensor;
