//! Command-line interface definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, Locale, PipelineConfig};

/// Explore a business listings dump: filter, cluster and summarize
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the listings file (.json / .jsonl line-delimited, .csv or .parquet)
    #[arg(
        short,
        long,
        default_value = "JSON_Input/yelp_academic_dataset_business.json"
    )]
    pub data: PathBuf,

    /// Maximum number of records read from the file
    #[arg(long, default_value_t = config::DEFAULT_MAX_ROWS)]
    pub max_rows: usize,

    /// DBSCAN radius in coordinate degrees
    #[arg(long, default_value_t = config::DEFAULT_EPS)]
    pub eps: f64,

    /// DBSCAN minimum neighbourhood size (the point itself included)
    #[arg(long, default_value_t = config::DEFAULT_MIN_SAMPLES)]
    pub min_samples: usize,

    /// Category marker selecting records for the category ranking
    #[arg(long, default_value = config::DEFAULT_CATEGORY_MARKER)]
    pub marker: String,

    /// Length of the rankings
    #[arg(long, default_value_t = config::DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Language of weekday labels
    #[arg(long, value_enum, default_value_t = Locale::English)]
    pub locale: Locale,
}

impl Args {
    /// Build a validated [`PipelineConfig`] from the parsed arguments.
    pub fn pipeline_config(&self) -> crate::Result<PipelineConfig> {
        let config = PipelineConfig {
            eps: self.eps,
            min_samples: self.min_samples,
            category_marker: self.marker.clone(),
            top_n: self.top_n,
            max_rows: self.max_rows,
            locale: self.locale,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["yelp-explorer"]);
        let config = args.pipeline_config().unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "yelp-explorer",
            "--data",
            "listings.csv",
            "--eps",
            "0.25",
            "--min-samples",
            "3",
            "--locale",
            "de",
        ]);
        assert_eq!(args.data, PathBuf::from("listings.csv"));

        let config = args.pipeline_config().unwrap();
        assert_eq!(config.eps, 0.25);
        assert_eq!(config.min_samples, 3);
        assert_eq!(config.locale, Locale::German);
    }

    #[test]
    fn test_rejects_bad_eps() {
        let args = Args::parse_from(["yelp-explorer", "--eps=-1"]);
        assert!(args.pipeline_config().is_err());
    }
}
