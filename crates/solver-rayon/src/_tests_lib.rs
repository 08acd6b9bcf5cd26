#![cfg(test)]

use fibersweep_core::fiber::{FiberFactory, LayerSpec};
use fibersweep_core::simulation::Simulation;
use fibersweep_core::solver::{ModeLimits, ModeSolver, SerialSolver};
use fibersweep_core::wavelength::linspace;

use super::RayonSolver;

fn multi_fiber_simulation() -> Simulation {
    let mut factory = FiberFactory::new();
    factory
        .add_layer(LayerSpec::new("Silica").radius(linspace(0.0, 4e-6, 4, false)))
        .add_layer(
            LayerSpec::new("SiO2GeO2")
                .radius(4e-6)
                .mix(linspace(0.12, 0.15, 3, true)),
        )
        .add_layer(LayerSpec::new("Silica"));
    let mut sim = Simulation::new();
    sim.set_factory(factory);
    sim.set_wavelengths(1550e-9);
    sim
}

#[test]
fn matches_serial_solver_in_content_and_order() {
    let serial = SerialSolver;
    let parallel = RayonSolver::new(Some(4)).unwrap();
    let limits = ModeLimits::new(Some(10), Some(5));

    let mut sim_a = multi_fiber_simulation();
    let mut sim_b = multi_fiber_simulation();

    assert_eq!(
        serial.modes(&mut sim_a, limits).unwrap(),
        parallel.modes(&mut sim_b, limits).unwrap()
    );
    assert_eq!(
        serial.cutoff(&mut sim_a, limits).unwrap(),
        parallel.cutoff(&mut sim_b, limits).unwrap()
    );
    assert_eq!(
        serial.neff(&mut sim_a, limits).unwrap(),
        parallel.neff(&mut sim_b, limits).unwrap()
    );
}

#[test]
fn entry_count_matches_fiber_count() {
    let parallel = RayonSolver::new(Some(2)).unwrap();
    let mut sim = multi_fiber_simulation();
    let modes = parallel.modes(&mut sim, ModeLimits::default()).unwrap();
    assert_eq!(modes.len(), 12);
    assert!(modes.iter().all(|per_wl| per_wl.len() == 1));
}

#[test]
fn single_thread_pool_still_conforms() {
    let parallel = RayonSolver::new(Some(1)).unwrap();
    let mut sim = multi_fiber_simulation();
    assert!(parallel.neff(&mut sim, ModeLimits::default()).is_ok());
}
