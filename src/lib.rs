//! Yelp Explorer: filtering, DBSCAN clustering and summary statistics over a
//! business listings dump.
//!
//! The library holds everything the dashboard shows: loading and caching the
//! dataset, the filter predicates and the pipeline producing the cluster,
//! opening-hour, category and KPI tables.

pub mod cli;
pub mod config;
pub mod data;
pub mod pipeline;

// Re-export public items for easier access
pub use cli::Args;
pub use config::{Locale, PipelineConfig};
pub use data::cache::DatasetCache;
pub use data::filter::{FilterError, FilterParams};
pub use data::loader::load_file;
pub use data::model::{Dataset, Record, Weekday};
pub use pipeline::aggregate::{select_cluster, ClusterSummary};
pub use pipeline::cluster::{ClusterId, Dbscan, NOISE};
pub use pipeline::{run, FilteredView, PipelineOutput};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
