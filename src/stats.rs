//! Aggregate counters for one batch search run.

use serde::Serialize;

/// Totals across all workers, reported once at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    /// Internal seeds consumed from the input stream.
    pub internal_seeds: u64,
    /// Inversion queries executed.
    pub queries: u64,
    /// Structure seeds recovered and written out.
    pub structure_seeds: u64,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
}

impl RunStats {
    /// Print the human-readable summary to stderr.
    pub fn print(&self) {
        eprintln!("Search complete!");
        eprintln!("Internal seeds: {}", self.internal_seeds);
        eprintln!("Queries: {}", self.queries);
        eprintln!("Structure seeds found: {}", self.structure_seeds);
        eprintln!("Elapsed: {} ms", self.elapsed_ms);
    }
}
