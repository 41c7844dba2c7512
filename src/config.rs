//! Batch-search configuration and validation.

use crate::error::PopseedError;
use crate::forward::Variant;

/// Runtime parameters for one batch search run.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Derivation variant to invert.
    pub variant: Variant,
    /// Salt subtracted from advanced generator states; late variant only.
    pub salt: i32,
    /// Number of worker threads.
    pub threads: usize,
    /// Minimum chunk x coordinate (inclusive).
    pub min_chunk_x: i32,
    /// Maximum chunk x coordinate (inclusive).
    pub max_chunk_x: i32,
    /// Minimum chunk z coordinate (inclusive).
    pub min_chunk_z: i32,
    /// Maximum chunk z coordinate (inclusive).
    pub max_chunk_z: i32,
    /// Minimum call index (inclusive); -1 uses the raw internal seed.
    pub min_calls: i32,
    /// Maximum call index (inclusive).
    pub max_calls: i32,
}

impl SearchParams {
    /// Clamp out-of-range values and reject impossible ranges.
    ///
    /// Thread counts below 1 fall back to 1 and call indices below -1 are
    /// clamped to -1. Inverted min/max ranges are fatal: nothing would run
    /// while input is still consumed, which is never what the caller meant.
    pub fn validated(mut self) -> Result<SearchParams, PopseedError> {
        if self.threads < 1 {
            self.threads = 1;
        }
        if self.min_calls < -1 {
            self.min_calls = -1;
        }
        if self.max_calls < -1 {
            self.max_calls = -1;
        }
        if self.min_chunk_x > self.max_chunk_x {
            return Err(PopseedError::Config(format!(
                "chunk x range is inverted: {} > {}",
                self.min_chunk_x, self.max_chunk_x
            )));
        }
        if self.min_chunk_z > self.max_chunk_z {
            return Err(PopseedError::Config(format!(
                "chunk z range is inverted: {} > {}",
                self.min_chunk_z, self.max_chunk_z
            )));
        }
        if self.min_calls > self.max_calls {
            return Err(PopseedError::Config(format!(
                "call range is inverted: {} > {}",
                self.min_calls, self.max_calls
            )));
        }
        Ok(self)
    }

    /// True when every query lands on one fixed chunk coordinate, which
    /// switches the output format to bare seeds.
    pub fn single_coordinate(&self) -> bool {
        self.min_chunk_x == self.max_chunk_x && self.min_chunk_z == self.max_chunk_z
    }
}
