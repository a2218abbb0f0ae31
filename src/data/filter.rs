use serde::Serialize;
use thiserror::Error;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter predicate: rating floor and review-count ceiling
// ---------------------------------------------------------------------------

/// Highest rating a listing can carry.
pub const MAX_RATING: f64 = 5.0;

/// Thresholds chosen in the side panel. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterParams {
    /// Keep listings with `rating >= min_rating`.
    pub min_rating: f64,
    /// Keep listings with `review_count <= max_review_count`.
    pub max_review_count: u64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            min_rating: 0.0,
            max_review_count: u64::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("minimum rating {0} is outside 0.0..=5.0")]
    MinRatingOutOfRange(f64),
    #[error("maximum review count must be at least 1")]
    ZeroReviewCap,
}

impl FilterParams {
    /// Parameters that keep every listing of `dataset`.
    pub fn unrestricted(dataset: &Dataset) -> Self {
        Self {
            min_rating: 0.0,
            max_review_count: dataset.max_review_count().max(1),
        }
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if !(0.0..=MAX_RATING).contains(&self.min_rating) {
            return Err(FilterError::MinRatingOutOfRange(self.min_rating));
        }
        if self.max_review_count == 0 {
            return Err(FilterError::ZeroReviewCap);
        }
        Ok(())
    }

    /// Whether a single listing passes both predicates.
    pub fn matches(&self, record: &Record) -> bool {
        record.rating >= self.min_rating && record.review_count <= self.max_review_count
    }
}

/// Return indices of listings that pass the filter, in dataset order.
pub fn filtered_indices(
    dataset: &Dataset,
    params: &FilterParams,
) -> Result<Vec<usize>, FilterError> {
    params.validate()?;
    Ok(dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| params.matches(record))
        .map(|(i, _)| i)
        .collect())
}
