//! Fiber geometry descriptions and the expanding factory.
//!
//! A [`FiberFactory`] holds an ordered list of layer specifications whose
//! radius and mix parameters may be array-valued. Expansion takes the cross
//! product of every array-valued parameter and yields one concrete [`Fiber`]
//! per combination. Earlier-registered layers vary slowest, and within a
//! layer the radius axis varies before the mix axis, so callers that sweep
//! `(rho, composition)` through the first and second layers observe
//! rho-major order in the expanded list.
//!
//! # File format
//!
//! ```toml
//! name = "rcf"
//!
//! [[layers]]
//! radius = [1e-6, 2e-6, 3e-6]
//! material = "Silica"
//!
//! [[layers]]
//! radius = 4e-6
//! material = "SiO2GeO2"
//! x = 0.19
//!
//! [[layers]]
//! material = "Silica"
//! ```
//!
//! The last layer is the cladding and carries no radius.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FiberError;
use crate::material::Material;

/// A scalar-or-array parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(f64),
    Array(Vec<f64>),
}

impl ParamValue {
    fn values(&self) -> Vec<f64> {
        match self {
            ParamValue::Scalar(v) => vec![*v],
            ParamValue::Array(vs) => vs.clone(),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Scalar(v)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(vs: Vec<f64>) -> Self {
        ParamValue::Array(vs)
    }
}

/// One layer of a fiber description, before expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Outer radius in meters. Absent for the cladding (outermost) layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<ParamValue>,

    /// Material name, resolved through [`Material::lookup`].
    pub material: String,

    /// Mix parameter (e.g. GeO2 molar concentration), if the material takes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<ParamValue>,
}

impl LayerSpec {
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            radius: None,
            material: material.into(),
            x: None,
        }
    }

    pub fn radius(mut self, radius: impl Into<ParamValue>) -> Self {
        self.radius = Some(radius.into());
        self
    }

    pub fn mix(mut self, x: impl Into<ParamValue>) -> Self {
        self.x = Some(x.into());
        self
    }
}

/// A concrete layer: scalar radius, resolved material.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Outer radius in meters; `None` for the unbounded cladding.
    pub radius: Option<f64>,
    pub material: Material,
}

/// A concrete fiber instance produced by factory expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct Fiber {
    pub layers: Vec<Layer>,
}

impl Fiber {
    /// Outer radius of the last bounded layer (the "core" boundary).
    pub fn outer_radius(&self) -> f64 {
        self.layers
            .iter()
            .filter_map(|l| l.radius)
            .fold(0.0, f64::max)
    }
}

/// Factory expanding array-valued layer specifications into concrete fibers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FiberFactory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

impl FiberFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer. Layers are expanded in registration order.
    pub fn add_layer(&mut self, layer: LayerSpec) -> &mut Self {
        self.layers.push(layer);
        self
    }

    /// Load a stored fiber description.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FiberError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| FiberError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| FiberError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Number of fibers expansion will produce.
    pub fn len(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| {
                let nr = layer.radius.as_ref().map_or(1, |r| r.values().len());
                let nx = layer.x.as_ref().map_or(1, |x| x.values().len());
                nr * nx
            })
            .product()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Expand into the cross product of all array-valued parameters.
    pub fn expand(&self) -> Result<Vec<Fiber>, FiberError> {
        if self.layers.is_empty() {
            return Err(FiberError::EmptyFactory);
        }

        // Per-layer axes: (radius values, mix values). A missing radius or
        // mix contributes a single-element axis so the product stays dense.
        let mut axes = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let radii: Vec<Option<f64>> = match &layer.radius {
                Some(r) => r.values().into_iter().map(Some).collect(),
                None => vec![None],
            };
            let mixes: Vec<Option<f64>> = match &layer.x {
                Some(x) => x.values().into_iter().map(Some).collect(),
                None => vec![None],
            };
            axes.push((radii, mixes));
        }

        let total = self.len();
        let mut fibers = Vec::with_capacity(total);
        let mut cursor = vec![(0usize, 0usize); self.layers.len()];

        for _ in 0..total {
            let mut layers = Vec::with_capacity(self.layers.len());
            for (i, layer) in self.layers.iter().enumerate() {
                let (ri, xi) = cursor[i];
                let (radii, mixes) = &axes[i];
                let material = Material::lookup(&layer.material, mixes[xi])?;
                layers.push(Layer {
                    radius: radii[ri],
                    material,
                });
            }
            fibers.push(Fiber { layers });

            // Odometer increment: last layer's mix axis is the fastest.
            for i in (0..cursor.len()).rev() {
                let (radii, mixes) = &axes[i];
                let (ri, xi) = &mut cursor[i];
                *xi += 1;
                if *xi < mixes.len() {
                    break;
                }
                *xi = 0;
                *ri += 1;
                if *ri < radii.len() {
                    break;
                }
                *ri = 0;
            }
        }

        Ok(fibers)
    }
}
