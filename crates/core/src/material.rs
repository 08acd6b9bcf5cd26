//! Fiber materials and refractive-index models.
//!
//! A material computes a refractive index as a function of wavelength (and,
//! for compound glasses, a mix parameter). Materials are looked up by name
//! through [`lookup`], so fiber descriptions on disk can reference them as
//! plain strings.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::FiberError;

/// Sellmeier coefficients for fused silica (fitted over 0.21–3.71 µm).
const SILICA_B: [f64; 3] = [0.696_166_3, 0.407_942_6, 0.897_479_4];
const SILICA_L: [f64; 3] = [0.068_404_3, 0.116_241_4, 9.896_161];

/// Sellmeier coefficients for pure germania, blended against silica for
/// GeO2-doped glass (Fleming mixing rule).
const GERMANIA_B: [f64; 3] = [0.806_866_42, 0.718_158_48, 0.854_168_31];
const GERMANIA_L: [f64; 3] = [0.068_972_606, 0.153_966_05, 11.841_931];

/// Wavelength range over which the Sellmeier fits are validated, in meters.
const SELLMEIER_WLRANGE: (f64, f64) = (0.21e-6, 3.71e-6);

/// A resolved material reference: which model, and its mix parameter if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Material {
    /// Pure fused silica.
    Silica,
    /// Germania-doped silica with molar GeO2 concentration `x` in [0, 1].
    SiO2GeO2 { x: f64 },
    /// Constant refractive index (tests, idealized claddings).
    Fixed { index: f64 },
}

impl Material {
    /// Resolve a material by name, attaching the mix parameter where the
    /// model takes one.
    pub fn lookup(name: &str, x: Option<f64>) -> Result<Self, FiberError> {
        match name {
            "Silica" | "SiO2" => Ok(Material::Silica),
            "SiO2GeO2" => {
                let x = x.ok_or_else(|| FiberError::MissingMixParameter {
                    material: name.to_string(),
                })?;
                if !(0.0..=1.0).contains(&x) {
                    warn!(
                        "concentration {x} out of supported range [0, 1] for SiO2GeO2; \
                         results could be inaccurate"
                    );
                }
                Ok(Material::SiO2GeO2 { x })
            }
            "Fixed" => {
                let index = x.ok_or_else(|| FiberError::MissingMixParameter {
                    material: name.to_string(),
                })?;
                Ok(Material::Fixed { index })
            }
            other => Err(FiberError::UnknownMaterial(other.to_string())),
        }
    }

    /// Refractive index at vacuum wavelength `wl` (meters).
    ///
    /// Out-of-range wavelengths log a warning and evaluate anyway; the fit
    /// extrapolates smoothly but loses accuracy.
    pub fn index(&self, wl: f64) -> f64 {
        match *self {
            Material::Silica => sellmeier(wl, &SILICA_B, &SILICA_L),
            Material::SiO2GeO2 { x } => {
                let mut b = [0.0; 3];
                let mut l = [0.0; 3];
                for i in 0..3 {
                    b[i] = SILICA_B[i] + x * (GERMANIA_B[i] - SILICA_B[i]);
                    l[i] = SILICA_L[i] + x * (GERMANIA_L[i] - SILICA_L[i]);
                }
                sellmeier(wl, &b, &l)
            }
            Material::Fixed { index } => index,
        }
    }
}

fn sellmeier(wl: f64, b: &[f64; 3], l: &[f64; 3]) -> f64 {
    test_range(wl);
    let wl_um = wl * 1e6;
    let wl2 = wl_um * wl_um;
    let mut n2 = 1.0;
    for i in 0..3 {
        n2 += b[i] * wl2 / (wl2 - l[i] * l[i]);
    }
    n2.sqrt()
}

fn test_range(wl: f64) {
    let (lo, hi) = SELLMEIER_WLRANGE;
    if wl < lo || wl > hi {
        warn!(
            "wavelength {wl:e} out of supported range {lo:e} - {hi:e}; \
             results could be inaccurate"
        );
    }
}
