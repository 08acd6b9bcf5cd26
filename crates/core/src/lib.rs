//! Fiber geometry, materials, simulation configuration, and mode solving.

pub mod bessel;
pub mod error;
pub mod fiber;
pub mod material;
pub mod mode;
pub mod simulation;
pub mod solver;
pub mod wavelength;

pub use error::{FiberError, SolverError};
pub use fiber::{Fiber, FiberFactory, LayerSpec};
pub use mode::{Family, Mode};
pub use simulation::{FactorySource, Simulation};
pub use solver::{ModeLimits, ModeSolver, SerialSolver};
pub use wavelength::WavelengthSpec;

#[cfg(test)]
mod _tests_bessel;
#[cfg(test)]
mod _tests_mode;
#[cfg(test)]
mod _tests_solver;
