//! Thread-parallel mode solver.
//!
//! Same contract as the serial solver: one result per fiber instance, in
//! factory expansion order. The fibers of a slice are independent, so they
//! are solved on a rayon pool; `collect` on an indexed parallel iterator
//! preserves order, which keeps the internal parallelism invisible to the
//! sweep orchestrator.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use fibersweep_core::error::SolverError;
use fibersweep_core::mode::Mode;
use fibersweep_core::simulation::Simulation;
use fibersweep_core::solver::{
    cutoff_wavelengths, effective_indices, supported_modes, ModeLimits, ModeSolver,
};

/// Mode solver that fans fiber instances out over a thread pool.
pub struct RayonSolver {
    pool: rayon::ThreadPool,
}

impl RayonSolver {
    /// Build with an explicit thread count, or one thread per CPU.
    pub fn new(threads: Option<usize>) -> Result<Self, rayon::ThreadPoolBuildError> {
        let threads = threads.unwrap_or_else(num_cpus::get);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        Ok(Self { pool })
    }
}

impl ModeSolver for RayonSolver {
    fn modes(
        &self,
        sim: &mut Simulation,
        limits: ModeLimits,
    ) -> Result<Vec<Vec<BTreeSet<Mode>>>, SolverError> {
        let wls = sim.wavelengths()?.to_vec();
        let fibers = sim.fibers()?.to_vec();
        Ok(self.pool.install(|| {
            fibers
                .par_iter()
                .map(|fiber| {
                    wls.iter()
                        .map(|&wl| supported_modes(fiber, wl, limits))
                        .collect()
                })
                .collect()
        }))
    }

    fn cutoff(
        &self,
        sim: &mut Simulation,
        limits: ModeLimits,
    ) -> Result<Vec<Vec<BTreeMap<Mode, f64>>>, SolverError> {
        let wls = sim.wavelengths()?.to_vec();
        let fibers = sim.fibers()?.to_vec();
        Ok(self.pool.install(|| {
            fibers
                .par_iter()
                .map(|fiber| {
                    wls.iter()
                        .map(|&wl| cutoff_wavelengths(fiber, wl, limits))
                        .collect()
                })
                .collect()
        }))
    }

    fn neff(
        &self,
        sim: &mut Simulation,
        limits: ModeLimits,
    ) -> Result<Vec<Vec<BTreeMap<Mode, f64>>>, SolverError> {
        let wls = sim.wavelengths()?.to_vec();
        let fibers = sim.fibers()?.to_vec();
        self.pool.install(|| {
            fibers
                .par_iter()
                .enumerate()
                .map(|(fi, fiber)| {
                    wls.iter()
                        .map(|&wl| effective_indices(fiber, wl, limits, fi))
                        .collect()
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod _tests_lib;
