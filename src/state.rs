use std::path::Path;
use std::sync::Arc;

use yelp_explorer::data::filter::MAX_RATING;
use yelp_explorer::pipeline::stats::top_reviewed;
use yelp_explorer::{
    run, select_cluster, ClusterId, ClusterSummary, Dataset, DatasetCache, FilterParams,
    PipelineConfig, PipelineOutput,
};

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Map,
    Statistics,
    OpeningHours,
    Insights,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Map, Page::Statistics, Page::OpeningHours, Page::Insights];

    pub fn title(self) -> &'static str {
        match self {
            Page::Map => "📍 Cluster map",
            Page::Statistics => "📊 Statistics",
            Page::OpeningHours => "⏰ Opening hours",
            Page::Insights => "⚡ Insights & KPIs",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Source of the dataset; reloads go through here.
    pub cache: DatasetCache,

    /// Dataset the current output was computed from.
    pub dataset: Arc<Dataset>,

    pub config: PipelineConfig,

    /// Active filter thresholds.
    pub params: FilterParams,

    /// Tables of the last pipeline run.
    pub output: PipelineOutput,

    /// Cluster picked on the map page, if any.
    pub selected_cluster: Option<ClusterId>,

    /// Listings with the most reviews over the whole dataset (indices).
    pub top_reviewed: Vec<usize>,

    pub page: Page,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(cache: DatasetCache, dataset: Arc<Dataset>, config: PipelineConfig) -> Self {
        let mut state = Self {
            cache,
            params: FilterParams::unrestricted(&dataset),
            top_reviewed: top_reviewed(&dataset, config.top_n),
            dataset,
            config,
            output: PipelineOutput::default(),
            selected_cluster: None,
            page: Page::Map,
            status_message: None,
        };
        state.recompute();
        state
    }

    /// Ingest a newly loaded dataset and reset the filters to show everything.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.params = FilterParams::unrestricted(&dataset);
        self.top_reviewed = top_reviewed(&dataset, self.config.top_n);
        self.dataset = dataset;
        self.status_message = None;
        self.recompute();
    }

    /// Rerun the pipeline for the current filters.
    ///
    /// Cluster ids only mean something against the table they came with, so
    /// every run drops the cluster selection. A rejected filter empties the
    /// output instead of leaving the previous tables on screen.
    pub fn recompute(&mut self) {
        self.selected_cluster = None;
        match run(&self.dataset, &self.params, &self.config) {
            Ok(output) => {
                self.output = output;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Filter rejected: {e}");
                self.output = PipelineOutput::default();
                self.status_message = Some(format!("Invalid filter: {e}"));
            }
        }
    }

    /// Update the thresholds (clamped to their domains) and recompute when
    /// they changed.
    pub fn set_filters(&mut self, min_rating: f64, max_review_count: u64) {
        let params = FilterParams {
            min_rating: min_rating.clamp(0.0, MAX_RATING),
            max_review_count: max_review_count.clamp(1, self.review_slider_max()),
        };
        if params != self.params {
            self.params = params;
            self.recompute();
        }
    }

    /// Upper end of the review-count slider.
    pub fn review_slider_max(&self) -> u64 {
        self.dataset.max_review_count().max(1)
    }

    /// Cluster shown on the map page, `None` when no cluster exists.
    pub fn current_cluster(&self) -> Option<&ClusterSummary> {
        select_cluster(&self.output.clusters, self.selected_cluster)
    }

    /// Read the current file again.
    pub fn reload(&mut self) {
        match self.cache.reload() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to reload {}: {e:#}", self.cache.path().display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Switch to another file; the current dataset stays on failure.
    pub fn open(&mut self, path: &Path) {
        match self.cache.open(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
