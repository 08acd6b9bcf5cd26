//! Result tensor set with a dynamically growing mode axis.
//!
//! The mode set of a sweep is discovered as it runs, so the fourth tensor
//! axis is backed by an append-only mode registry: appending a mode extends
//! axis 3 of every tensor by one sentinel-filled column without touching any
//! previously written value. The sentinel is NaN, never an implicit zero.

use ndarray::{concatenate, Array4, ArrayView4, Axis};

use fibersweep_core::mode::Mode;

/// Tracked per-mode quantities.
///
/// `Beta1..Beta3` are declared in the schema but populated by a downstream
/// dispersion stage, not by the sweep itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Quantity {
    Cutoff,
    Neff,
    Beta1,
    Beta2,
    Beta3,
}

impl Quantity {
    pub const ALL: [Quantity; 5] = [
        Quantity::Cutoff,
        Quantity::Neff,
        Quantity::Beta1,
        Quantity::Beta2,
        Quantity::Beta3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Quantity::Cutoff => "cutoff",
            Quantity::Neff => "neff",
            Quantity::Beta1 => "beta1",
            Quantity::Beta2 => "beta2",
            Quantity::Beta3 => "beta3",
        }
    }
}

/// The sweep's result tensors plus the ordered mode registry defining the
/// fourth axis.
///
/// Invariant: all five tensors share their `[nrho, nr2, nc2]` shape and an
/// axis-3 length equal to `modes.len()` at all times.
#[derive(Debug, Clone)]
pub struct SweepResults {
    modes: Vec<Mode>,
    tensors: [Array4<f64>; 5],
}

impl SweepResults {
    /// Sentinel-filled tensors for the given grid and initial mode list.
    pub fn new(nrho: usize, nr2: usize, nc2: usize, modes: Vec<Mode>) -> Self {
        let shape = (nrho, nr2, nc2, modes.len());
        Self {
            modes,
            tensors: std::array::from_fn(|_| Array4::from_elem(shape, f64::NAN)),
        }
    }

    /// Rebuild from previously saved parts. Returns `None` when the tensor
    /// shapes violate the registry invariant.
    pub fn from_parts(modes: Vec<Mode>, tensors: [Array4<f64>; 5]) -> Option<Self> {
        let dim = tensors[0].dim();
        if dim.3 != modes.len() || tensors.iter().any(|t| t.dim() != dim) {
            return None;
        }
        Some(Self { modes, tensors })
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    /// Shape of the grid axes `[nrho, nr2, nc2]`.
    pub fn grid_shape(&self) -> (usize, usize, usize) {
        let (nrho, nr2, nc2, _) = self.tensors[0].dim();
        (nrho, nr2, nc2)
    }

    pub fn mode_index(&self, mode: &Mode) -> Option<usize> {
        self.modes.iter().position(|m| m == mode)
    }

    /// Column index for `mode`, appending it (and extending axis 3 of every
    /// tensor with a sentinel column) if it is not yet registered.
    pub fn ensure_mode(&mut self, mode: Mode) -> usize {
        if let Some(idx) = self.mode_index(&mode) {
            return idx;
        }
        let (nrho, nr2, nc2) = self.grid_shape();
        let column = Array4::from_elem((nrho, nr2, nc2, 1), f64::NAN);
        for tensor in &mut self.tensors {
            *tensor = concatenate(Axis(3), &[tensor.view(), column.view()])
                .expect("mode column extension cannot fail on matching grid axes");
        }
        self.modes.push(mode);
        self.modes.len() - 1
    }

    pub fn tensor(&self, quantity: Quantity) -> ArrayView4<'_, f64> {
        self.tensors[quantity as usize].view()
    }

    pub fn get(&self, quantity: Quantity, idx: [usize; 4]) -> f64 {
        self.tensors[quantity as usize][idx]
    }

    pub fn set(&mut self, quantity: Quantity, idx: [usize; 4], value: f64) {
        self.tensors[quantity as usize][idx] = value;
    }

    /// Resume check: has the outer-grid slice `i` been computed?
    ///
    /// A slice is either fully computed or entirely sentinel (per-slice
    /// checkpoint atomicity), so "any non-NaN cutoff value" decides.
    pub fn slice_is_computed(&self, i: usize) -> bool {
        self.tensors[Quantity::Cutoff as usize]
            .index_axis(Axis(1), i)
            .iter()
            .any(|v| !v.is_nan())
    }

    /// True when every outer-grid slice has been computed.
    pub fn all_slices_computed(&self) -> bool {
        let (_, nr2, _) = self.grid_shape();
        (0..nr2).all(|i| self.slice_is_computed(i))
    }

    /// Consume into parts for serialization.
    pub fn into_parts(self) -> (Vec<Mode>, [Array4<f64>; 5]) {
        (self.modes, self.tensors)
    }
}
