/// Data layer: core types, loading, caching and filtering.
///
/// Architecture:
/// ```text
///  .json (lines) / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetCache  │  load once, Arc<Dataset>, explicit reload
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  rating / review-count predicates → filtered indices
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
