//! Durable, resumable persistence of sweep results.
//!
//! The checkpoint is an NPZ archive holding the mode registry (an `[n, 3]`
//! i64 array of family/ν/m triples under `modes`) and one f64 tensor per
//! tracked quantity. Its path derives from the final output path by swapping
//! the extension for `.ckp.npz`. Writes go to a temporary sibling and are
//! promoted with an atomic rename, so a checkpoint on disk is always a
//! complete, loadable snapshot; `finalize` renames the checkpoint to the
//! output path, which makes the final file byte-identical to the last
//! checkpoint.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::debug;
use ndarray::{Array2, Array4};
use ndarray_npy::{NpzReader, NpzWriter, ReadNpzError, WriteNpzError};
use thiserror::Error;

use fibersweep_core::mode::Mode;

use crate::tensor::{Quantity, SweepResults};

#[derive(Debug, Error)]
pub enum CheckpointError {
    /// No checkpoint exists yet; the caller starts a fresh sweep.
    #[error("no checkpoint at {0}")]
    NotFound(PathBuf),

    #[error("checkpoint i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint write failed: {0}")]
    Write(#[from] WriteNpzError),

    #[error("checkpoint read failed: {0}")]
    Read(#[from] ReadNpzError),

    #[error("checkpoint is corrupt: {0}")]
    Corrupt(String),
}

/// Checkpoint store keyed by the final output path.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    output: PathBuf,
    checkpoint: PathBuf,
}

impl CheckpointStore {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        let mut checkpoint = output.clone();
        checkpoint.set_extension("ckp.npz");
        Self { output, checkpoint }
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint
    }

    /// Write a complete snapshot: temp file first, then atomic rename.
    pub fn save(&self, results: &SweepResults) -> Result<(), CheckpointError> {
        let tmp = self.checkpoint.with_extension("npz.tmp");
        {
            let mut npz = NpzWriter::new_compressed(File::create(&tmp)?);

            let modes = results.modes();
            let mut triples = Array2::<i64>::zeros((modes.len(), 3));
            for (i, mode) in modes.iter().enumerate() {
                let t = mode.to_triple();
                triples[[i, 0]] = t[0];
                triples[[i, 1]] = t[1];
                triples[[i, 2]] = t[2];
            }
            npz.add_array("modes", &triples)?;

            for quantity in Quantity::ALL {
                npz.add_array(quantity.name(), &results.tensor(quantity).to_owned())?;
            }
            npz.finish()?;
        }
        fs::rename(&tmp, &self.checkpoint)?;
        debug!("checkpoint saved to {}", self.checkpoint.display());
        Ok(())
    }

    /// Load the last snapshot, or `NotFound` when none exists.
    pub fn load(&self) -> Result<SweepResults, CheckpointError> {
        Self::load_path(&self.checkpoint)
    }

    /// Load the finalized output file, which shares the checkpoint schema.
    pub fn load_output(&self) -> Result<SweepResults, CheckpointError> {
        Self::load_path(&self.output)
    }

    fn load_path(path: &Path) -> Result<SweepResults, CheckpointError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CheckpointError::NotFound(path.to_path_buf())
            } else {
                CheckpointError::Io(e)
            }
        })?;
        let mut npz = NpzReader::new(file)?;
        let names = npz.names()?;

        // Entries may or may not carry the `.npy` suffix depending on the
        // writer; accept both.
        let resolve = |key: &str| -> Result<String, CheckpointError> {
            let dotted = format!("{key}.npy");
            if names.iter().any(|n| n == &dotted) {
                Ok(dotted)
            } else if names.iter().any(|n| n == key) {
                Ok(key.to_string())
            } else {
                Err(CheckpointError::Corrupt(format!("missing entry '{key}'")))
            }
        };

        let triples: Array2<i64> = npz.by_name(&resolve("modes")?)?;
        if triples.ncols() != 3 {
            return Err(CheckpointError::Corrupt(format!(
                "mode table has {} columns, expected 3",
                triples.ncols()
            )));
        }
        let mut modes = Vec::with_capacity(triples.nrows());
        for row in triples.rows() {
            let mode = Mode::from_triple([row[0], row[1], row[2]]).ok_or_else(|| {
                CheckpointError::Corrupt(format!("invalid mode triple {:?}", row.to_vec()))
            })?;
            modes.push(mode);
        }

        let mut tensors: Vec<Array4<f64>> = Vec::with_capacity(Quantity::ALL.len());
        for quantity in Quantity::ALL {
            tensors.push(npz.by_name(&resolve(quantity.name())?)?);
        }
        let tensors: [Array4<f64>; 5] = tensors
            .try_into()
            .map_err(|_| CheckpointError::Corrupt("wrong tensor count".to_string()))?;

        SweepResults::from_parts(modes, tensors)
            .ok_or_else(|| CheckpointError::Corrupt("tensor shapes disagree".to_string()))
    }

    pub fn exists(&self) -> bool {
        self.checkpoint.is_file()
    }

    /// Promote the checkpoint to the final output path.
    ///
    /// This is the only operation that removes the checkpoint name.
    pub fn finalize(&self) -> Result<(), CheckpointError> {
        fs::rename(&self.checkpoint, &self.output)?;
        debug!("finalized output at {}", self.output.display());
        Ok(())
    }
}
