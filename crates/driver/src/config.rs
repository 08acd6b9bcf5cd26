//! Sweep configuration (TOML-loadable).
//!
//! # File format
//!
//! ```toml
//! [grids]
//! nrho = 50
//! r2 = { start = 2e-6, end = 10e-6, num = 65 }
//! c2 = { start = 0.15, end = 0.25, num = 5 }
//!
//! wavelength = 1550e-9
//! numax = 10
//! mmax = 5
//!
//! [output]
//! path = "rcfs.npz"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fibersweep_core::solver::ModeLimits;
use fibersweep_core::wavelength::{linspace, WavelengthSpec};

/// A `{start, end, num}` grid, endpoints inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub start: f64,
    pub end: f64,
    pub num: usize,
}

impl RangeSpec {
    pub fn values(&self) -> Vec<f64> {
        linspace(self.start, self.end, self.num, true)
    }

    pub fn len(&self) -> usize {
        self.num
    }

    pub fn is_empty(&self) -> bool {
        self.num == 0
    }
}

/// The three sweep axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Inner-radius proportion grid size; samples `[0, 1)` uniformly.
    pub nrho: usize,
    /// Outer geometric-radius grid (meters).
    pub r2: RangeSpec,
    /// Ring material-composition grid (molar concentration).
    pub c2: RangeSpec,
}

/// Layer materials of the swept fiber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialConfig {
    #[serde(default = "default_inner")]
    pub inner: String,
    #[serde(default = "default_ring")]
    pub ring: String,
    #[serde(default = "default_cladding")]
    pub cladding: String,
}

fn default_inner() -> String {
    "Silica".to_string()
}

fn default_ring() -> String {
    "SiO2GeO2".to_string()
}

fn default_cladding() -> String {
    "Silica".to_string()
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            inner: default_inner(),
            ring: default_ring(),
            cladding: default_cladding(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Final output file; the checkpoint lives next to it.
    pub path: PathBuf,
}

/// Top-level sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub grids: GridConfig,
    pub wavelength: WavelengthSpec,
    #[serde(default)]
    pub numax: Option<u32>,
    #[serde(default)]
    pub mmax: Option<u32>,
    #[serde(default)]
    pub materials: MaterialConfig,
    pub output: OutputConfig,
}

impl SweepConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: SweepConfig =
            toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grids.nrho == 0 || self.grids.r2.is_empty() || self.grids.c2.is_empty() {
            return Err(ConfigError::EmptyGrid);
        }
        if self.wavelength.resolve().is_empty() {
            return Err(ConfigError::NoWavelengths);
        }
        Ok(())
    }

    pub fn mode_limits(&self) -> ModeLimits {
        ModeLimits::new(self.numax, self.mmax)
    }

    /// Total number of grid points.
    pub fn points(&self) -> usize {
        self.grids.nrho * self.grids.r2.len() * self.grids.c2.len()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("sweep grids must all be non-empty")]
    EmptyGrid,

    #[error("wavelength specification resolves to no wavelengths")]
    NoWavelengths,
}
