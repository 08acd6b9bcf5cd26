//! Wavelength set specifications.

use serde::{Deserialize, Serialize};

/// How a simulation's wavelength set is specified.
///
/// Accepts a scalar, an explicit ordered list, or a `{start, end, num}`
/// linear range (endpoints inclusive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WavelengthSpec {
    Single(f64),
    List(Vec<f64>),
    Range { start: f64, end: f64, num: usize },
}

impl WavelengthSpec {
    /// Resolve to a concrete, sorted wavelength list.
    pub fn resolve(&self) -> Vec<f64> {
        let mut wls = match self {
            WavelengthSpec::Single(wl) => vec![*wl],
            WavelengthSpec::List(wls) => wls.clone(),
            WavelengthSpec::Range { start, end, num } => linspace(*start, *end, *num, true),
        };
        wls.sort_by(|a, b| a.total_cmp(b));
        wls
    }
}

impl From<f64> for WavelengthSpec {
    fn from(wl: f64) -> Self {
        WavelengthSpec::Single(wl)
    }
}

impl From<Vec<f64>> for WavelengthSpec {
    fn from(wls: Vec<f64>) -> Self {
        WavelengthSpec::List(wls)
    }
}

/// `num` evenly spaced samples over `[start, end]` (or `[start, end)` when
/// `endpoint` is false, numpy-style).
pub fn linspace(start: f64, end: f64, num: usize, endpoint: bool) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let div = if endpoint { num - 1 } else { num };
            let step = (end - start) / div as f64;
            (0..num).map(|i| start + step * i as f64).collect()
        }
    }
}
