//! Error types shared across the core crate.

use thiserror::Error;

/// Errors from fiber geometry, materials, and simulation configuration.
#[derive(Debug, Error)]
pub enum FiberError {
    /// A derived collection was requested before its prerequisite was set.
    #[error("simulation not configured: {0}")]
    NotConfigured(&'static str),

    #[error("unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("material '{material}' requires a mix parameter")]
    MissingMixParameter { material: String },

    /// A factory was asked to expand with no layers registered.
    #[error("fiber factory has no layers")]
    EmptyFactory,

    #[error("failed to read fiber description {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fiber description {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors from the mode solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Root finding failed to bracket or converge for one mode at one point.
    #[error("no convergence solving {mode} at wl={wl:e} (fiber {fiber})")]
    NoConvergence {
        mode: crate::mode::Mode,
        wl: f64,
        fiber: usize,
    },

    #[error(transparent)]
    Configuration(#[from] FiberError),
}
