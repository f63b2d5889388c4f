// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to data sources through these
// traits, never through a concrete loader type. A loader for
// another file format only has to implement TableSource.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::series::SensorTable;

// ─── TableSource ──────────────────────────────────────────────────────────────
/// Any component that can produce a numeric sensor table.
///
/// Implementations:
///   - DelimitedLoader → reads a delimited text file (e.g. `t1.ASC`)
pub trait TableSource {
    /// Read the full table into memory.
    fn load(&self) -> Result<SensorTable>;
}
