/// Data layer: core types, loading, filtering, statistics.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → DataTable (typed cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ DataTable │  header names, rows, numeric-column index
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  stats    │   │  filter   │  boolean expression → row subset
///   └──────────┘   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
