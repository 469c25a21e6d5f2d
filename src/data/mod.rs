//! Data layer: table types, loading, and row selection.
//!
//! Architecture:
//! ```text
//!  measurementData.tsv / simulationData.tsv / conditions.tsv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse TSV → DataTable / ConditionTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │  DataTable    │  Vec<Record>, effective dataset ids
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  dataset / observable / condition predicates → row indices
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;

pub use model::{CellValue, ConditionTable, DataTable, Record, TableKind};
