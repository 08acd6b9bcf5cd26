#![cfg(test)]

use fibersweep_core::mode::{Family, Mode};

use super::tensor::{Quantity, SweepResults};

fn he(nu: u32, m: u32) -> Mode {
    Mode::new(Family::HE, nu, m)
}

#[test]
fn new_results_are_sentinel_filled() {
    let results = SweepResults::new(3, 4, 2, vec![he(1, 1)]);
    assert_eq!(results.grid_shape(), (3, 4, 2));
    for q in Quantity::ALL {
        let t = results.tensor(q);
        assert_eq!(t.dim(), (3, 4, 2, 1));
        assert!(t.iter().all(|v| v.is_nan()));
    }
}

#[test]
fn ensure_mode_appends_and_extends_all_tensors() {
    let mut results = SweepResults::new(2, 2, 2, vec![he(1, 1)]);
    results.set(Quantity::Cutoff, [0, 0, 0, 0], 1.2e-6);
    results.set(Quantity::Neff, [1, 1, 1, 0], 1.4451);

    let idx = results.ensure_mode(he(2, 1));
    assert_eq!(idx, 1);
    assert_eq!(results.modes(), &[he(1, 1), he(2, 1)]);

    for q in Quantity::ALL {
        assert_eq!(results.tensor(q).dim(), (2, 2, 2, 2));
    }
    // Previously written values survive the extension.
    assert_eq!(results.get(Quantity::Cutoff, [0, 0, 0, 0]), 1.2e-6);
    assert_eq!(results.get(Quantity::Neff, [1, 1, 1, 0]), 1.4451);
    // The new column is explicitly unknown, not zero.
    assert!(results.get(Quantity::Cutoff, [0, 0, 0, 1]).is_nan());
    assert!(results.get(Quantity::Neff, [1, 1, 1, 1]).is_nan());
}

#[test]
fn ensure_mode_is_idempotent_and_order_preserving() {
    let mut results = SweepResults::new(1, 1, 1, vec![]);
    assert_eq!(results.ensure_mode(he(1, 1)), 0);
    assert_eq!(results.ensure_mode(he(2, 1)), 1);
    assert_eq!(results.ensure_mode(he(1, 1)), 0);
    assert_eq!(results.modes(), &[he(1, 1), he(2, 1)]);
    assert_eq!(results.tensor(Quantity::Cutoff).dim().3, 2);
}

#[test]
fn slice_resume_check() {
    let mut results = SweepResults::new(2, 3, 2, vec![he(1, 1)]);
    assert!(!results.slice_is_computed(1));
    assert!(!results.all_slices_computed());

    results.set(Quantity::Cutoff, [0, 1, 0, 0], 0.0);
    assert!(results.slice_is_computed(1));
    assert!(!results.slice_is_computed(0));
    assert!(!results.slice_is_computed(2));
}

#[test]
fn from_parts_rejects_mismatched_shapes() {
    let (modes, mut tensors) = SweepResults::new(2, 2, 2, vec![he(1, 1)]).into_parts();
    tensors[3] = ndarray::Array4::zeros((2, 2, 2, 5));
    assert!(SweepResults::from_parts(modes, tensors).is_none());

    let (_, tensors) = SweepResults::new(2, 2, 2, vec![he(1, 1)]).into_parts();
    assert!(SweepResults::from_parts(vec![he(1, 1), he(2, 1)], tensors).is_none());
}
