#![cfg(test)]

use approx::assert_relative_eq;

use super::fiber::{Fiber, FiberFactory, LayerSpec};
use super::mode::{Family, Mode};
use super::simulation::Simulation;
use super::solver::{
    cutoff_wavelengths, effective_indices, supported_modes, ModeLimits, ModeSolver, SerialSolver,
    StepProfile,
};

/// Step-index fiber with a = 4.5 µm, n_core = 1.449, n_clad = 1.444:
/// V ≈ 2.19 at 1550 nm, single-moded.
fn smf_like() -> Fiber {
    let mut factory = FiberFactory::new();
    factory
        .add_layer(LayerSpec::new("Fixed").radius(4.5e-6).mix(1.449))
        .add_layer(LayerSpec::new("Fixed").mix(1.444));
    factory.expand().unwrap().pop().unwrap()
}

/// Larger, strongly multimoded step fiber: V ≈ 12.2 at 1550 nm.
fn multimode() -> Fiber {
    let mut factory = FiberFactory::new();
    factory
        .add_layer(LayerSpec::new("Fixed").radius(25e-6).mix(1.449))
        .add_layer(LayerSpec::new("Fixed").mix(1.444));
    factory.expand().unwrap().pop().unwrap()
}

#[test]
fn step_profile_picks_highest_index_layer() {
    let fiber = smf_like();
    let profile = StepProfile::from_fiber(&fiber, 1550e-9);
    assert_eq!(profile.radius, 4.5e-6);
    assert_relative_eq!(profile.n_core, 1.449);
    assert_relative_eq!(profile.n_clad, 1.444);
}

#[test]
fn single_mode_fiber_supports_only_the_fundamental() {
    let modes = supported_modes(&smf_like(), 1550e-9, ModeLimits::default());
    assert_eq!(modes.len(), 1);
    assert!(modes.contains(&Mode::new(Family::HE, 1, 1)));
}

#[test]
fn multimode_fiber_supports_higher_orders() {
    let modes = supported_modes(&multimode(), 1550e-9, ModeLimits::default());
    assert!(modes.contains(&Mode::new(Family::HE, 1, 1)));
    assert!(modes.contains(&Mode::new(Family::TE, 0, 1)));
    assert!(modes.contains(&Mode::new(Family::TM, 0, 1)));
    assert!(modes.contains(&Mode::new(Family::HE, 2, 1)));
    assert!(modes.contains(&Mode::new(Family::EH, 1, 1)));
    assert!(modes.len() > 10);
}

#[test]
fn mode_limits_bound_the_search() {
    let all = supported_modes(&multimode(), 1550e-9, ModeLimits::default());
    let capped = supported_modes(&multimode(), 1550e-9, ModeLimits::new(Some(1), Some(1)));
    assert!(capped.len() < all.len());
    // numax=1, mmax=1 keeps LP01 and LP11 only.
    assert_eq!(capped.len(), 4);
    for mode in &capped {
        assert!(mode.m <= 1);
    }
}

#[test]
fn fundamental_has_no_cutoff() {
    let cutoffs = cutoff_wavelengths(&smf_like(), 1550e-9, ModeLimits::default());
    assert_eq!(cutoffs[&Mode::new(Family::HE, 1, 1)], 0.0);
}

#[test]
fn cutoffs_are_nonnegative_and_below_operating_wavelength_for_guided_modes() {
    let cutoffs = cutoff_wavelengths(&multimode(), 1550e-9, ModeLimits::default());
    for (mode, &wl_c) in &cutoffs {
        assert!(wl_c >= 0.0, "{mode} has negative cutoff");
    }
    // LP11 group cutoff: wl_c = 2 pi a NA / 2.405.
    let profile = StepProfile::from_fiber(&multimode(), 1550e-9);
    let expected = 2.0 * std::f64::consts::PI * profile.radius * profile.na() / 2.404_825_557;
    assert_relative_eq!(
        cutoffs[&Mode::new(Family::TE, 0, 1)],
        expected,
        max_relative = 1e-6
    );
}

#[test]
fn neff_lies_between_cladding_and_core_index() {
    let neffs = effective_indices(&multimode(), 1550e-9, ModeLimits::default(), 0).unwrap();
    assert!(!neffs.is_empty());
    for (mode, &neff) in &neffs {
        assert!(neff > 1.444 && neff < 1.449, "{mode}: neff={neff}");
    }
}

#[test]
fn fundamental_neff_exceeds_higher_order_modes() {
    let neffs = effective_indices(&multimode(), 1550e-9, ModeLimits::default(), 0).unwrap();
    let he11 = neffs[&Mode::new(Family::HE, 1, 1)];
    for (mode, &neff) in &neffs {
        if *mode != Mode::new(Family::HE, 1, 1) {
            assert!(he11 >= neff, "{mode} above the fundamental");
        }
    }
}

#[test]
fn smf_neff_matches_scalar_reference() {
    // V = 2.1899, b(LP01) ≈ 0.2453 from the scalar dispersion relation.
    let neffs = effective_indices(&smf_like(), 1550e-9, ModeLimits::default(), 0).unwrap();
    let neff = neffs[&Mode::new(Family::HE, 1, 1)];
    let b = (neff * neff - 1.444 * 1.444) / (1.449 * 1.449 - 1.444 * 1.444);
    assert!(b > 0.1 && b < 0.5, "normalized index b={b} out of range");
}

#[test]
fn serial_solver_orders_results_by_fiber_then_wavelength() {
    let mut factory = FiberFactory::new();
    factory
        .add_layer(LayerSpec::new("Fixed").radius(vec![4e-6, 25e-6]).mix(1.449))
        .add_layer(LayerSpec::new("Fixed").mix(1.444));
    let mut sim = Simulation::new();
    sim.set_factory(factory);
    sim.set_wavelengths(vec![1550e-9, 1310e-9]);

    let solver = SerialSolver;
    let modes = solver.modes(&mut sim, ModeLimits::default()).unwrap();
    assert_eq!(modes.len(), 2); // one entry per fiber
    assert_eq!(modes[0].len(), 2); // one entry per wavelength
    // Larger fiber supports more modes; so does the shorter wavelength,
    // which sorts first.
    assert!(modes[1][0].len() > modes[0][0].len());
    assert!(modes[0][0].len() >= modes[0][1].len());

    let neff = solver.neff(&mut sim, ModeLimits::default()).unwrap();
    assert_eq!(neff.len(), 2);
    assert!(neff[0][0].contains_key(&Mode::new(Family::HE, 1, 1)));
}

#[test]
fn unconfigured_simulation_propagates_configuration_error() {
    let mut sim = Simulation::new();
    sim.set_wavelengths(1550e-9);
    let solver = SerialSolver;
    assert!(solver.modes(&mut sim, ModeLimits::default()).is_err());
}
