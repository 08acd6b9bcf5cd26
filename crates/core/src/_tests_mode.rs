#![cfg(test)]

use std::collections::BTreeSet;

use super::mode::{Family, Mode};

#[test]
fn display_format() {
    assert_eq!(Mode::new(Family::HE, 1, 1).to_string(), "HE(1,1)");
    assert_eq!(Mode::new(Family::TE, 0, 2).to_string(), "TE(0,2)");
}

#[test]
fn total_order_is_family_then_nu_then_m() {
    let he11 = Mode::new(Family::HE, 1, 1);
    let he12 = Mode::new(Family::HE, 1, 2);
    let he21 = Mode::new(Family::HE, 2, 1);
    let te01 = Mode::new(Family::TE, 0, 1);

    assert!(he11 < he12);
    assert!(he12 < he21);
    assert!(he21 < te01); // HE sorts before TE

    let set: BTreeSet<_> = [te01, he21, he12, he11].into_iter().collect();
    let ordered: Vec<_> = set.into_iter().collect();
    assert_eq!(ordered, vec![he11, he12, he21, te01]);
}

#[test]
fn triple_round_trip() {
    for mode in [
        Mode::new(Family::LP, 0, 1),
        Mode::new(Family::HE, 1, 1),
        Mode::new(Family::EH, 3, 2),
        Mode::new(Family::TM, 0, 4),
    ] {
        assert_eq!(Mode::from_triple(mode.to_triple()), Some(mode));
    }
}

#[test]
fn invalid_triples_rejected() {
    assert_eq!(Mode::from_triple([99, 1, 1]), None);
    assert_eq!(Mode::from_triple([1, -1, 1]), None);
}
