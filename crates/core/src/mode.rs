//! Propagation mode identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mode family tag.
///
/// Vector families (TE/TM/HE/EH) are the physical modes of the full wave
/// equation; LP is the scalar (weakly-guiding) family used internally by the
/// solver. Ordering of the variants defines the family component of the
/// total mode order, so the discriminants are part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Family {
    LP,
    HE,
    EH,
    TE,
    TM,
}

impl Family {
    /// Stable integer code used in checkpoint files.
    pub fn code(self) -> i64 {
        match self {
            Family::LP => 0,
            Family::HE => 1,
            Family::EH => 2,
            Family::TE => 3,
            Family::TM => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Family::LP),
            1 => Some(Family::HE),
            2 => Some(Family::EH),
            3 => Some(Family::TE),
            4 => Some(Family::TM),
            _ => None,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A discrete propagation mode, identified by family and the two integer
/// indices (ν, m).
///
/// Modes are immutable values with a total order over `(family, ν, m)`;
/// they serve as dictionary keys and as tensor column labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Mode {
    pub family: Family,
    pub nu: u32,
    pub m: u32,
}

impl Mode {
    pub fn new(family: Family, nu: u32, m: u32) -> Self {
        Self { family, nu, m }
    }

    /// Checkpoint representation: `[family code, ν, m]`.
    pub fn to_triple(self) -> [i64; 3] {
        [self.family.code(), self.nu as i64, self.m as i64]
    }

    pub fn from_triple(triple: [i64; 3]) -> Option<Self> {
        let family = Family::from_code(triple[0])?;
        if triple[1] < 0 || triple[2] < 0 {
            return None;
        }
        Some(Self::new(family, triple[1] as u32, triple[2] as u32))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.family, self.nu, self.m)
    }
}
