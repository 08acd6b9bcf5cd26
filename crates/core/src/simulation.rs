//! Simulation configuration state machine.
//!
//! A [`Simulation`] pairs a fiber-geometry source with a wavelength set.
//! Both are set independently, in any order; the derived fiber list is
//! rebuilt lazily on the next access after any mutation. The configuration
//! is `initialized` once both derived collections have been resolved
//! non-empty since the last mutation.

use std::path::PathBuf;

use crate::error::FiberError;
use crate::fiber::{Fiber, FiberFactory};
use crate::wavelength::WavelengthSpec;

/// Where the fiber geometry comes from.
#[derive(Debug, Clone)]
pub enum FactorySource {
    /// A stored TOML fiber description.
    File(PathBuf),
    /// An in-memory factory.
    Factory(FiberFactory),
}

impl From<FiberFactory> for FactorySource {
    fn from(factory: FiberFactory) -> Self {
        FactorySource::Factory(factory)
    }
}

impl From<PathBuf> for FactorySource {
    fn from(path: PathBuf) -> Self {
        FactorySource::File(path)
    }
}

impl From<&str> for FactorySource {
    fn from(path: &str) -> Self {
        FactorySource::File(PathBuf::from(path))
    }
}

/// Lazily configured simulation: geometry source plus wavelength set.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    source: Option<FactorySource>,
    wavelengths: Option<Vec<f64>>,
    fibers: Option<Vec<Fiber>>,
}

impl Simulation {
    /// An empty, unconfigured simulation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully configured in one step.
    pub fn with(
        source: impl Into<FactorySource>,
        wavelengths: impl Into<WavelengthSpec>,
    ) -> Result<Self, FiberError> {
        let mut sim = Self::new();
        sim.set_factory(source);
        sim.set_wavelengths(wavelengths);
        sim.fibers()?;
        Ok(sim)
    }

    /// Set the wavelength set. Invalidates the derived fiber cache.
    pub fn set_wavelengths(&mut self, spec: impl Into<WavelengthSpec>) {
        self.wavelengths = Some(spec.into().resolve());
        self.fibers = None;
    }

    /// Set the fiber geometry source. Invalidates the derived fiber cache.
    pub fn set_factory(&mut self, source: impl Into<FactorySource>) {
        self.source = Some(source.into());
        self.fibers = None;
    }

    /// The configured wavelengths, sorted ascending.
    pub fn wavelengths(&self) -> Result<&[f64], FiberError> {
        self.wavelengths
            .as_deref()
            .ok_or(FiberError::NotConfigured("no wavelengths set"))
    }

    /// The expanded fiber list, rebuilt on first access after a mutation.
    pub fn fibers(&mut self) -> Result<&[Fiber], FiberError> {
        if self.fibers.is_none() {
            let source = self
                .source
                .as_ref()
                .ok_or(FiberError::NotConfigured("no fiber geometry source set"))?;
            let factory = match source {
                FactorySource::File(path) => FiberFactory::from_file(path)?,
                FactorySource::Factory(factory) => factory.clone(),
            };
            self.fibers = Some(factory.expand()?);
        }
        Ok(self.fibers.as_deref().unwrap_or_default())
    }

    /// True iff the derived cache is valid and both collections are non-empty.
    pub fn initialized(&self) -> bool {
        self.fibers.as_ref().is_some_and(|f| !f.is_empty())
            && self.wavelengths.as_ref().is_some_and(|w| !w.is_empty())
    }
}
