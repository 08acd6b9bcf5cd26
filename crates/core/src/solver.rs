//! Mode solver interface and the serial reference implementation.
//!
//! [`ModeSolver`] is the contract the sweep orchestrator consumes: for a
//! configured simulation, produce per fiber instance, per wavelength, the
//! supported mode set and per-mode quantities, in factory expansion order.
//! Implementations are free to parallelize internally as long as the
//! returned sequences keep that order; [`SerialSolver`] here is the
//! synchronous reference, and the `fibersweep-solver-rayon` crate provides a
//! thread-pool variant over the same per-fiber routines.
//!
//! The numerics reduce each layered fiber to an equivalent step-index
//! profile (core = highest-index bounded layer, cladding = outermost layer)
//! and solve the weakly-guiding LP eigenvalue problem; each LP group is
//! reported under its degenerate vector-family labels.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;

use crate::bessel::{bessel_j, bessel_j_zeros, bessel_k};
use crate::error::SolverError;
use crate::fiber::Fiber;
use crate::mode::{Family, Mode};
use crate::simulation::Simulation;

/// Upper bounds on the mode search, as a performance hint.
///
/// `numax` bounds the LP azimuthal order, `mmax` the radial order. `None`
/// means "no hint"; the search is still bounded by the cutoff condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeLimits {
    pub numax: Option<u32>,
    pub mmax: Option<u32>,
}

impl ModeLimits {
    pub fn new(numax: Option<u32>, mmax: Option<u32>) -> Self {
        Self { numax, mmax }
    }

    fn numax_or(self, fallback: u32) -> u32 {
        self.numax.unwrap_or(fallback)
    }

    fn mmax_or(self, fallback: u32) -> u32 {
        self.mmax.unwrap_or(fallback)
    }
}

/// Hard caps applied when no hint is given.
const NUMAX_FALLBACK: u32 = 24;
const MMAX_FALLBACK: u32 = 24;

/// Per-fiber, per-wavelength solver contract.
///
/// Each method returns one entry per configured fiber instance, in factory
/// expansion order; each entry holds one value per configured wavelength,
/// ascending. The orchestrator depends on that ordering for tensor writes.
pub trait ModeSolver {
    /// Supported mode sets.
    fn modes(
        &self,
        sim: &mut Simulation,
        limits: ModeLimits,
    ) -> Result<Vec<Vec<BTreeSet<Mode>>>, SolverError>;

    /// Cutoff wavelength per supported mode, in meters (0 for the
    /// fundamental, which has no cutoff).
    fn cutoff(
        &self,
        sim: &mut Simulation,
        limits: ModeLimits,
    ) -> Result<Vec<Vec<BTreeMap<Mode, f64>>>, SolverError>;

    /// Effective index per supported mode.
    fn neff(
        &self,
        sim: &mut Simulation,
        limits: ModeLimits,
    ) -> Result<Vec<Vec<BTreeMap<Mode, f64>>>, SolverError>;
}

/// Synchronous single-threaded solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialSolver;

impl ModeSolver for SerialSolver {
    fn modes(
        &self,
        sim: &mut Simulation,
        limits: ModeLimits,
    ) -> Result<Vec<Vec<BTreeSet<Mode>>>, SolverError> {
        let wls = sim.wavelengths()?.to_vec();
        let fibers = sim.fibers()?.to_vec();
        fibers
            .iter()
            .map(|fiber| {
                wls.iter()
                    .map(|&wl| Ok(supported_modes(fiber, wl, limits)))
                    .collect()
            })
            .collect()
    }

    fn cutoff(
        &self,
        sim: &mut Simulation,
        limits: ModeLimits,
    ) -> Result<Vec<Vec<BTreeMap<Mode, f64>>>, SolverError> {
        let wls = sim.wavelengths()?.to_vec();
        let fibers = sim.fibers()?.to_vec();
        fibers
            .iter()
            .map(|fiber| {
                wls.iter()
                    .map(|&wl| Ok(cutoff_wavelengths(fiber, wl, limits)))
                    .collect()
            })
            .collect()
    }

    fn neff(
        &self,
        sim: &mut Simulation,
        limits: ModeLimits,
    ) -> Result<Vec<Vec<BTreeMap<Mode, f64>>>, SolverError> {
        let wls = sim.wavelengths()?.to_vec();
        let fibers = sim.fibers()?.to_vec();
        fibers
            .iter()
            .enumerate()
            .map(|(fi, fiber)| {
                wls.iter()
                    .map(|&wl| effective_indices(fiber, wl, limits, fi))
                    .collect()
            })
            .collect()
    }
}

// ============================================================================
// Equivalent step-index profile
// ============================================================================

/// Step-index reduction of a layered fiber at one wavelength.
#[derive(Debug, Clone, Copy)]
pub struct StepProfile {
    /// Core radius in meters.
    pub radius: f64,
    pub n_core: f64,
    pub n_clad: f64,
}

impl StepProfile {
    pub fn from_fiber(fiber: &Fiber, wl: f64) -> Self {
        let mut radius = fiber.outer_radius();
        let mut n_core = f64::NEG_INFINITY;
        for layer in &fiber.layers {
            let n = layer.material.index(wl);
            if let Some(r) = layer.radius {
                if r > 0.0 && n > n_core {
                    n_core = n;
                    radius = r;
                }
            }
        }
        let n_clad = fiber
            .layers
            .last()
            .map(|l| l.material.index(wl))
            .unwrap_or(1.0);
        if !n_core.is_finite() || n_core <= n_clad {
            // Degenerate profile (no bounded layer above the cladding index):
            // treat the whole cross-section as a vanishingly weak guide so the
            // fundamental is still reported.
            n_core = n_clad + 1e-9;
        }
        Self {
            radius,
            n_core,
            n_clad,
        }
    }

    /// Numerical aperture.
    pub fn na(&self) -> f64 {
        (self.n_core * self.n_core - self.n_clad * self.n_clad).sqrt()
    }

    /// Normalized frequency at wavelength `wl`.
    pub fn v_number(&self, wl: f64) -> f64 {
        2.0 * PI * self.radius * self.na() / wl
    }
}

// ============================================================================
// LP mode enumeration
// ============================================================================

/// An LP group: azimuthal order ν, radial order m, and its cutoff V-number.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LpGroup {
    nu: u32,
    m: u32,
    v_cutoff: f64,
}

/// Cutoff V-numbers for LP(ν, m): zeros of J_{ν-1}, with V_c(LP01) = 0
/// and LP(0, m) cutting off at the (m-1)-th zero of J1.
fn lp_groups(v: f64, limits: ModeLimits) -> Vec<LpGroup> {
    let numax = limits.numax_or(NUMAX_FALLBACK);
    let mmax = limits.mmax_or(MMAX_FALLBACK);
    let mut groups = Vec::new();

    for nu in 0..=numax {
        let cutoffs: Vec<f64> = if nu == 0 {
            // LP(0,1) has no cutoff; higher radial orders cut off at J1 zeros.
            let mut c = vec![0.0];
            c.extend(bessel_j_zeros(1, v));
            c
        } else {
            bessel_j_zeros(nu - 1, v)
        };

        let mut any = false;
        for (i, &vc) in cutoffs.iter().enumerate() {
            let m = i as u32 + 1;
            if m > mmax || vc >= v {
                break;
            }
            groups.push(LpGroup { nu, m, v_cutoff: vc });
            any = true;
        }
        // Cutoffs grow with ν, so once an order supports nothing, none above
        // it will either.
        if !any && nu > 0 {
            break;
        }
    }
    groups
}

/// Vector-family labels degenerate with LP(ν, m) under weak guidance.
fn vector_modes(nu: u32, m: u32) -> Vec<Mode> {
    match nu {
        0 => vec![Mode::new(Family::HE, 1, m)],
        1 => vec![
            Mode::new(Family::TE, 0, m),
            Mode::new(Family::TM, 0, m),
            Mode::new(Family::HE, 2, m),
        ],
        _ => vec![
            Mode::new(Family::EH, nu - 1, m),
            Mode::new(Family::HE, nu + 1, m),
        ],
    }
}

/// The supported mode set of one fiber at one wavelength.
pub fn supported_modes(fiber: &Fiber, wl: f64, limits: ModeLimits) -> BTreeSet<Mode> {
    let profile = StepProfile::from_fiber(fiber, wl);
    let v = profile.v_number(wl);
    lp_groups(v, limits)
        .into_iter()
        .flat_map(|g| vector_modes(g.nu, g.m))
        .collect()
}

/// Cutoff wavelength per supported mode, in meters.
pub fn cutoff_wavelengths(fiber: &Fiber, wl: f64, limits: ModeLimits) -> BTreeMap<Mode, f64> {
    let profile = StepProfile::from_fiber(fiber, wl);
    let v = profile.v_number(wl);
    let mut out = BTreeMap::new();
    for group in lp_groups(v, limits) {
        let wl_cutoff = if group.v_cutoff > 0.0 {
            2.0 * PI * profile.radius * profile.na() / group.v_cutoff
        } else {
            0.0
        };
        for mode in vector_modes(group.nu, group.m) {
            out.insert(mode, wl_cutoff);
        }
    }
    out
}

/// Effective index per supported mode.
///
/// Fails with [`SolverError::NoConvergence`] if the dispersion relation
/// cannot be bracketed for some mode; `fiber_index` only feeds the error.
pub fn effective_indices(
    fiber: &Fiber,
    wl: f64,
    limits: ModeLimits,
    fiber_index: usize,
) -> Result<BTreeMap<Mode, f64>, SolverError> {
    let profile = StepProfile::from_fiber(fiber, wl);
    let v = profile.v_number(wl);
    let mut out = BTreeMap::new();
    for group in lp_groups(v, limits) {
        let neff = solve_lp_neff(&profile, wl, v, group).ok_or(SolverError::NoConvergence {
            mode: Mode::new(Family::LP, group.nu, group.m),
            wl,
            fiber: fiber_index,
        })?;
        for mode in vector_modes(group.nu, group.m) {
            out.insert(mode, neff);
        }
    }
    Ok(out)
}

/// Solve the LP dispersion relation for one group by bisection in the
/// normalized transverse parameter u.
///
/// The root for LP(ν, m) lies between the group's cutoff V-number and the
/// first zero of J_ν above it (or V, whichever is smaller); the eigenvalue
/// equation is u J_{ν+1}(u) K_ν(w) = w K_{ν+1}(w) J_ν(u) with w² = V² − u².
fn solve_lp_neff(profile: &StepProfile, wl: f64, v: f64, group: LpGroup) -> Option<f64> {
    let nu = group.nu;
    let eps = 1e-9 * v.max(1.0);

    let upper_zero = bessel_j_zeros(nu, v + 1.0)
        .into_iter()
        .find(|&z| z > group.v_cutoff + eps)
        .unwrap_or(v);
    let lo = group.v_cutoff + eps;
    let hi = (upper_zero - eps).min(v - eps);
    if hi <= lo {
        return None;
    }

    let f = |u: f64| -> f64 {
        let w = (v * v - u * u).max(1e-24).sqrt();
        u * bessel_j(nu + 1, u) * bessel_k(nu, w) - w * bessel_k(nu + 1, w) * bessel_j(nu, u)
    };

    // Bracket the root; the endpoints occasionally share a sign when the
    // bracket clips at V, so fall back to a uniform scan.
    let (mut a, mut b) = (lo, hi);
    let (mut fa, fb) = (f(a), f(b));
    if fa.signum() == fb.signum() {
        let mut found = None;
        let n = 256;
        let mut x0 = lo;
        let mut f0 = fa;
        for i in 1..=n {
            let x1 = lo + (hi - lo) * i as f64 / n as f64;
            let f1 = f(x1);
            if f0.signum() != f1.signum() {
                found = Some((x0, x1, f0));
                break;
            }
            x0 = x1;
            f0 = f1;
        }
        let (x0, x1, f0) = found?;
        a = x0;
        b = x1;
        fa = f0;
    }

    for _ in 0..100 {
        let mid = 0.5 * (a + b);
        let fm = f(mid);
        if fm == 0.0 {
            break;
        }
        if fa.signum() == fm.signum() {
            a = mid;
            fa = fm;
        } else {
            b = mid;
        }
    }

    let u = 0.5 * (a + b);
    let k0 = 2.0 * PI / wl;
    let t = u / (profile.radius * k0);
    let neff2 = profile.n_core * profile.n_core - t * t;
    (neff2 > 0.0).then(|| neff2.sqrt())
}
