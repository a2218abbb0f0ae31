//! Pipeline configuration shared by the library and the dashboard.

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::Serialize;

/// Clustering radius in raw coordinate degrees.
///
/// Distances are plain Euclidean over (latitude, longitude), so a cluster
/// covers less ground east-west the further it is from the equator.
pub const DEFAULT_EPS: f64 = 0.1;
pub const DEFAULT_MIN_SAMPLES: usize = 5;
pub const DEFAULT_CATEGORY_MARKER: &str = "Restaurant";
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_MAX_ROWS: usize = 100_000;

/// Language used for weekday labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
pub enum Locale {
    #[default]
    #[value(name = "en")]
    English,
    #[value(name = "de")]
    German,
}

/// Fixed parameters of one pipeline run (everything except the filters).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineConfig {
    /// DBSCAN neighbourhood radius.
    pub eps: f64,
    /// DBSCAN minimum neighbourhood size, the point itself included.
    pub min_samples: usize,
    /// Category substring selecting the records for the category ranking.
    pub category_marker: String,
    /// Length of the category and top-reviewed rankings.
    pub top_n: usize,
    /// Upper bound on records read from the source file.
    pub max_rows: usize,
    pub locale: Locale,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            eps: DEFAULT_EPS,
            min_samples: DEFAULT_MIN_SAMPLES,
            category_marker: DEFAULT_CATEGORY_MARKER.to_string(),
            top_n: DEFAULT_TOP_N,
            max_rows: DEFAULT_MAX_ROWS,
            locale: Locale::English,
        }
    }
}

impl PipelineConfig {
    /// Reject values the clustering engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.eps.is_finite() || self.eps <= 0.0 {
            bail!("eps must be a positive finite number, got {}", self.eps);
        }
        if self.min_samples == 0 {
            bail!("min_samples must be at least 1");
        }
        if self.top_n == 0 {
            bail!("top_n must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.eps, 0.1);
        assert_eq!(config.min_samples, 5);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = PipelineConfig {
            eps: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.eps = f64::NAN;
        assert!(config.validate().is_err());

        config.eps = 0.1;
        config.min_samples = 0;
        assert!(config.validate().is_err());
    }
}
