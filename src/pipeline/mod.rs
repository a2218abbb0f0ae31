//! Filter → cluster → aggregate pipeline.
//!
//! ```text
//!   Dataset ──filter──▶ FilteredView ──┬─▶ Dbscan ─▶ cluster ids ─▶ ClusterSummary table
//!                                      ├─▶ opening-hour samples (+ skip counts)
//!                                      ├─▶ category ranking
//!                                      └─▶ KPIs / histogram / rating summary
//! ```
//!
//! Every run starts from scratch; nothing is carried over between runs.

pub mod aggregate;
pub mod categories;
pub mod cluster;
pub mod hours;
pub mod stats;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data::filter::{filtered_indices, FilterError, FilterParams};
use crate::data::model::{Dataset, Record};

use aggregate::{summarize_clusters, ClusterSummary};
use categories::{top_categories, CategoryCount};
use cluster::{ClusterId, Dbscan, NOISE};
use hours::{extract_opening_times, OpeningHours};
use stats::{five_number_summary, histogram, kpis, FiveNumberSummary, HistogramBin, Kpis};

/// Number of bins of the rating histogram.
pub const RATING_HISTOGRAM_BINS: usize = 10;

// ---------------------------------------------------------------------------
// FilteredView – filtered listings with their cluster column
// ---------------------------------------------------------------------------

/// Listings that passed the filter, by dataset index, with the cluster id of
/// each. Listings without coordinates carry `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteredView {
    pub indices: Vec<usize>,
    pub cluster_ids: Vec<Option<ClusterId>>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Filtered listings in dataset order.
    pub fn records<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a Record> + 'a {
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    /// Listings that took part in clustering, with their id (noise included).
    pub fn clustered<'a>(
        &'a self,
        dataset: &'a Dataset,
    ) -> impl Iterator<Item = (&'a Record, ClusterId)> + 'a {
        self.indices
            .iter()
            .zip(&self.cluster_ids)
            .filter_map(move |(&i, id)| id.map(|id| (&dataset.records[i], id)))
    }

    /// Dataset indices of the members of one cluster.
    pub fn members(&self, id: ClusterId) -> Vec<usize> {
        self.indices
            .iter()
            .zip(&self.cluster_ids)
            .filter(|(_, cid)| **cid == Some(id))
            .map(|(&i, _)| i)
            .collect()
    }

    /// Number of clustered listings labelled as noise.
    pub fn noise_count(&self) -> usize {
        self.cluster_ids.iter().filter(|id| **id == Some(NOISE)).count()
    }
}

// ---------------------------------------------------------------------------
// Pipeline run
// ---------------------------------------------------------------------------

/// All tables produced by one run, consumed by the dashboard pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub params: FilterParams,
    pub view: FilteredView,
    pub clusters: Vec<ClusterSummary>,
    pub opening_hours: OpeningHours,
    pub top_categories: Vec<CategoryCount>,
    pub kpis: Kpis,
    pub rating_histogram: Vec<HistogramBin>,
    pub rating_summary: Option<FiveNumberSummary>,
}

/// Assign a cluster id to every filtered listing that has coordinates.
pub fn cluster_view(dataset: &Dataset, indices: Vec<usize>, dbscan: &Dbscan) -> FilteredView {
    let coords: Vec<Option<[f64; 2]>> = indices
        .iter()
        .map(|&i| dataset.records[i].coordinates())
        .collect();
    let points: Vec<[f64; 2]> = coords.iter().flatten().copied().collect();
    let mut labels = dbscan.fit(&points).into_iter();

    let cluster_ids = coords
        .iter()
        .map(|c| c.and_then(|_| labels.next()))
        .collect();

    FilteredView {
        indices,
        cluster_ids,
    }
}

/// Run the full pipeline for one set of filter parameters.
pub fn run(
    dataset: &Dataset,
    params: &FilterParams,
    config: &PipelineConfig,
) -> Result<PipelineOutput, FilterError> {
    let indices = filtered_indices(dataset, params)?;
    let view = cluster_view(
        dataset,
        indices,
        &Dbscan::new(config.eps, config.min_samples),
    );

    let clusters = summarize_clusters(view.clustered(dataset));
    let opening_hours = extract_opening_times(view.records(dataset));
    let top_categories = top_categories(
        view.records(dataset),
        &config.category_marker,
        config.top_n,
    );
    let ratings: Vec<f64> = view.records(dataset).map(|r| r.rating).collect();

    log::debug!(
        "pipeline: {} of {} listings kept, {} clusters, {} noise, {} schedule entries skipped",
        view.len(),
        dataset.len(),
        clusters.len(),
        view.noise_count(),
        opening_hours.diagnostics.skipped()
    );

    Ok(PipelineOutput {
        params: *params,
        kpis: kpis(view.records(dataset)),
        rating_histogram: histogram(&ratings, RATING_HISTOGRAM_BINS),
        rating_summary: five_number_summary(&ratings),
        view,
        clusters,
        opening_hours,
        top_categories,
    })
}
