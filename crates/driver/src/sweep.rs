//! Sweep orchestration.
//!
//! One simulation is built per outer-radius grid point; its factory spans
//! the whole `rho × c2` sub-grid through array-valued layer parameters, so a
//! single solver invocation batches an entire slice. Slices run in reverse
//! outer-radius order (largest first, so the discovery heuristic sees the
//! richest mode set early) and each completed slice is checkpointed before
//! the next one starts. A re-run against an interrupted checkpoint skips
//! every slice that is already populated.

use std::time::{Duration, Instant};

use log::{info, warn};
use thiserror::Error;

use fibersweep_core::error::{FiberError, SolverError};
use fibersweep_core::fiber::{FiberFactory, LayerSpec};
use fibersweep_core::mode::Mode;
use fibersweep_core::simulation::Simulation;
use fibersweep_core::solver::{ModeLimits, ModeSolver};
use fibersweep_core::wavelength::linspace;

use crate::checkpoint::{CheckpointError, CheckpointStore};
use crate::config::{ConfigError, SweepConfig};
use crate::tensor::{Quantity, SweepResults};

/// How the initial global mode set is discovered.
///
/// Probing only the largest outer-radius configuration assumes mode count
/// grows monotonically with structure size. That is a physical heuristic,
/// not a guarantee, so it stays a selectable policy; either way the
/// orchestrator appends any mode a slice reports that the registry lacks, so
/// an optimistic policy costs reallocation, not correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryPolicy {
    /// Probe the configuration at the largest outer radius only.
    #[default]
    LargestOuterRadius,
    /// Probe every outer-radius configuration up front.
    EverySlice,
}

/// Progress event emitted after each outer-grid point.
#[derive(Debug, Clone, Copy)]
pub struct SliceEvent {
    /// Outer-grid index of the slice just handled.
    pub index: usize,
    /// Outer radius at that index, meters.
    pub r2: f64,
    /// Whether the slice was skipped by the resume check.
    pub skipped: bool,
    /// Number of slices handled so far (including this one).
    pub done: usize,
    /// Total number of slices.
    pub total: usize,
}

/// Statistics from a completed sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepStats {
    pub slices_computed: usize,
    pub slices_skipped: usize,
    pub n_modes: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fiber(#[from] FiberError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("checkpoint grid {found:?} does not match configured grid {expected:?}")]
    GridMismatch {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    #[error("solver returned {found} per-fiber entries for a slice of {expected}")]
    SolverContract { expected: usize, found: usize },
}

/// Drives a full parameter sweep over a solver.
pub struct SweepDriver<S> {
    config: SweepConfig,
    solver: S,
    store: CheckpointStore,
    discovery: DiscoveryPolicy,
    limits: ModeLimits,
}

impl<S: ModeSolver> SweepDriver<S> {
    pub fn new(config: SweepConfig, solver: S) -> Self {
        let store = CheckpointStore::new(config.output.path.clone());
        let limits = config.mode_limits();
        Self {
            config,
            solver,
            store,
            discovery: DiscoveryPolicy::default(),
            limits,
        }
    }

    pub fn with_discovery(mut self, discovery: DiscoveryPolicy) -> Self {
        self.discovery = discovery;
        self
    }

    pub fn store(&self) -> &CheckpointStore {
        &self.store
    }

    /// Run the sweep to completion, resuming from a checkpoint if present.
    pub fn run(&mut self) -> Result<SweepStats, DriverError> {
        self.run_with_progress(|_| {})
    }

    /// Like [`run`](Self::run), with a callback after every outer-grid point.
    pub fn run_with_progress(
        &mut self,
        mut on_slice: impl FnMut(SliceEvent),
    ) -> Result<SweepStats, DriverError> {
        let start = Instant::now();
        self.config.validate()?;
        let r2_values = self.config.grids.r2.values();
        let nr2 = r2_values.len();
        let (nrho, nc2) = (self.config.grids.nrho, self.config.grids.c2.len());

        info!(
            "sweep over [nrho={nrho}, nr2={nr2}, nc2={nc2}] -> {}",
            self.store.output_path().display()
        );

        // A finalized output from a previous run makes re-running a no-op.
        if !self.store.exists() {
            if let Some(results) = self.load_finalized(nrho, nr2, nc2) {
                info!("output already finalized; nothing to do");
                return Ok(SweepStats {
                    slices_computed: 0,
                    slices_skipped: nr2,
                    n_modes: results.modes().len(),
                    elapsed: start.elapsed(),
                });
            }
        }

        let mut sims = self.build_simulations(&r2_values);

        let mut results = match self.store.load() {
            Ok(results) => {
                let found = results.grid_shape();
                if found != (nrho, nr2, nc2) {
                    return Err(DriverError::GridMismatch {
                        expected: (nrho, nr2, nc2),
                        found,
                    });
                }
                info!(
                    "resuming from checkpoint {} ({} modes)",
                    self.store.checkpoint_path().display(),
                    results.modes().len()
                );
                results
            }
            Err(CheckpointError::NotFound(_)) => {
                let modes = self.discover_modes(&mut sims)?;
                info!("discovered {} modes", modes.len());
                SweepResults::new(nrho, nr2, nc2, modes)
            }
            Err(e) => return Err(e.into()),
        };

        let mut stats = SweepStats::default();
        let mut done = 0;
        for i in (0..nr2).rev() {
            done += 1;
            if results.slice_is_computed(i) {
                stats.slices_skipped += 1;
                on_slice(SliceEvent {
                    index: i,
                    r2: r2_values[i],
                    skipped: true,
                    done,
                    total: nr2,
                });
                continue;
            }

            info!("solving slice {i} (r2={:.3} um)", r2_values[i] * 1e6);
            self.compute_slice(i, &mut sims[i], &mut results)?;
            self.store.save(&results)?;

            stats.slices_computed += 1;
            on_slice(SliceEvent {
                index: i,
                r2: r2_values[i],
                skipped: false,
                done,
                total: nr2,
            });
        }

        self.store.finalize()?;
        stats.n_modes = results.modes().len();
        stats.elapsed = start.elapsed();
        info!(
            "sweep complete: {} computed, {} skipped, {} modes in {:.2?}",
            stats.slices_computed, stats.slices_skipped, stats.n_modes, stats.elapsed
        );
        Ok(stats)
    }

    /// One simulation per outer-radius point, spanning the full `rho × c2`
    /// sub-grid through array-valued layer parameters.
    fn build_simulations(&self, r2_values: &[f64]) -> Vec<Simulation> {
        let grids = &self.config.grids;
        let materials = &self.config.materials;
        let c2_values = grids.c2.values();
        r2_values
            .iter()
            .map(|&r2| {
                let r1 = linspace(0.0, r2, grids.nrho, false);
                let mut factory = FiberFactory::new();
                factory
                    .add_layer(LayerSpec::new(&materials.inner).radius(r1))
                    .add_layer(
                        LayerSpec::new(&materials.ring)
                            .radius(r2)
                            .mix(c2_values.clone()),
                    )
                    .add_layer(LayerSpec::new(&materials.cladding));
                let mut sim = Simulation::new();
                sim.set_factory(factory);
                sim.set_wavelengths(self.config.wavelength.clone());
                sim
            })
            .collect()
    }

    fn discover_modes(&self, sims: &mut [Simulation]) -> Result<Vec<Mode>, DriverError> {
        let mut all = std::collections::BTreeSet::new();
        let probes: Vec<usize> = match self.discovery {
            DiscoveryPolicy::LargestOuterRadius => vec![sims.len() - 1],
            DiscoveryPolicy::EverySlice => (0..sims.len()).collect(),
        };
        for i in probes {
            for per_fiber in self.solver.modes(&mut sims[i], self.limits)? {
                for per_wl in per_fiber {
                    all.extend(per_wl);
                }
            }
        }
        Ok(all.into_iter().collect())
    }

    /// Compute one outer-grid slice: discover its modes, then fill the
    /// cutoff and neff tensors for every `(rho, c2)` point.
    ///
    /// Nothing is checkpointed here; a solver failure leaves the on-disk
    /// state at the previous fully-written slice.
    fn compute_slice(
        &mut self,
        i: usize,
        sim: &mut Simulation,
        results: &mut SweepResults,
    ) -> Result<(), DriverError> {
        let (nrho, _, nc2) = results.grid_shape();
        let expected = nrho * nc2;

        let slice_modes = {
            let mut set = std::collections::BTreeSet::new();
            let per_fiber = self.solver.modes(sim, self.limits)?;
            check_contract(per_fiber.len(), expected)?;
            for fiber_modes in &per_fiber {
                for per_wl in fiber_modes {
                    set.extend(per_wl.iter().copied());
                }
            }
            set
        };
        for &mode in &slice_modes {
            if results.mode_index(&mode).is_none() {
                warn!("mode {mode} not in discovered set; extending tensors");
            }
            results.ensure_mode(mode);
        }
        self.tighten_limits(&slice_modes);

        let cutoffs = self.solver.cutoff(sim, self.limits)?;
        check_contract(cutoffs.len(), expected)?;
        for j in 0..nrho {
            for k in 0..nc2 {
                let point = &cutoffs[j * nc2 + k][0];
                for (&mode, &wl_c) in point {
                    let m = results.ensure_mode(mode);
                    results.set(Quantity::Cutoff, [j, i, k, m], wl_c);
                }
            }
        }

        let neffs = self.solver.neff(sim, self.limits)?;
        check_contract(neffs.len(), expected)?;
        for j in 0..nrho {
            for k in 0..nc2 {
                let point = &neffs[j * nc2 + k][0];
                for (&mode, &neff) in point {
                    let m = results.ensure_mode(mode);
                    results.set(Quantity::Neff, [j, i, k, m], neff);
                }
            }
        }

        Ok(())
    }

    /// Feed the discovered mode orders back into the solver hints for the
    /// remaining (smaller) slices.
    fn tighten_limits(&mut self, slice_modes: &std::collections::BTreeSet<Mode>) {
        let mut numax = 1;
        let mut mmax = 1;
        for mode in slice_modes {
            numax = numax.max(mode.nu);
            mmax = mmax.max(mode.m);
        }
        self.limits = ModeLimits::new(Some(numax), Some(mmax));
    }

    /// A previously finalized output, if it exists and matches the grid.
    fn load_finalized(&self, nrho: usize, nr2: usize, nc2: usize) -> Option<SweepResults> {
        if !self.store.output_path().is_file() {
            return None;
        }
        match self.store.load_output() {
            Ok(results)
                if results.grid_shape() == (nrho, nr2, nc2) && results.all_slices_computed() =>
            {
                Some(results)
            }
            _ => {
                warn!(
                    "existing output {} is not a finished sweep for this grid; recomputing",
                    self.store.output_path().display()
                );
                None
            }
        }
    }
}

fn check_contract(found: usize, expected: usize) -> Result<(), DriverError> {
    if found != expected {
        return Err(DriverError::SolverContract { expected, found });
    }
    Ok(())
}
