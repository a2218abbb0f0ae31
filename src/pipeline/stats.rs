//! Summary statistics for the statistics and insights pages.

use serde::Serialize;

use crate::data::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub business_count: usize,
    /// Mean rating rounded to two decimals, `None` for an empty view.
    pub mean_rating: Option<f64>,
    pub total_reviews: u64,
}

pub fn kpis<'a, I>(records: I) -> Kpis
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut count = 0;
    let mut rating_sum = 0.0;
    let mut total_reviews = 0;
    for record in records {
        count += 1;
        rating_sum += record.rating;
        total_reviews += record.review_count;
    }
    Kpis {
        business_count: count,
        mean_rating: (count > 0).then(|| (rating_sum / count as f64 * 100.0).round() / 100.0),
        total_reviews,
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram spanning `[min, max]` of `values`.
///
/// Bins are `[lower, upper)` except the last, which also holds `max`. When
/// all values are equal a single bin is returned.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: finite.len(),
        }];
    }

    let width = range / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + i as f64 * width,
            upper: if i + 1 == bins { max } else { min + (i + 1) as f64 * width },
            count: 0,
        })
        .collect();
    for v in finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Quantiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Quantile `q` of ascending `sorted` values with linear interpolation.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Min, quartiles and max of the finite `values`.
pub fn five_number_summary(values: &[f64]) -> Option<FiveNumberSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    Some(FiveNumberSummary {
        min: *sorted.first()?,
        q1: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q3: quantile(&sorted, 0.75)?,
        max: *sorted.last()?,
    })
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// Indices of the `limit` listings with the most reviews, highest first.
/// Ties keep dataset order.
pub fn top_reviewed(dataset: &Dataset, limit: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..dataset.len()).collect();
    indices.sort_by(|&a, &b| {
        dataset.records[b]
            .review_count
            .cmp(&dataset.records[a].review_count)
    });
    indices.truncate(limit);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(rating: f64, review_count: u64) -> Record {
        Record {
            id: format!("{rating}-{review_count}"),
            name: "n".to_string(),
            city: None,
            state: None,
            latitude: None,
            longitude: None,
            rating,
            review_count,
            categories: None,
            hours: None,
        }
    }

    #[test]
    fn test_kpis() {
        let records = [listing(4.0, 10), listing(3.5, 5), listing(2.0, 1)];
        let k = kpis(&records);
        assert_eq!(k.business_count, 3);
        assert_eq!(k.mean_rating, Some(3.17));
        assert_eq!(k.total_reviews, 16);

        assert_eq!(kpis(std::iter::empty::<&Record>()), Kpis::default());
    }

    #[test]
    fn test_histogram() {
        let values = [1.0, 1.5, 2.0, 5.0, 5.0, 3.0];
        let bins = histogram(&values, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].lower, 1.0);
        assert_eq!(bins[3].upper, 5.0);
        // 5.0 lands in the closed last bin
        assert_eq!(bins[3].count, 2);

        assert!(histogram(&[], 10).is_empty());
        let flat = histogram(&[4.0, 4.0], 10);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].count, 2);
    }

    #[test]
    fn test_five_number_summary() {
        let s = five_number_summary(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(s, FiveNumberSummary {
            min: 1.0,
            q1: 2.0,
            median: 3.0,
            q3: 4.0,
            max: 5.0,
        });
        assert_eq!(five_number_summary(&[]), None);
        assert_eq!(quantile(&[1.0, 2.0], 0.5), Some(1.5));
    }

    #[test]
    fn test_top_reviewed_is_stable() {
        let dataset = Dataset::from_records(vec![
            listing(3.0, 5),
            listing(3.0, 50),
            listing(3.0, 5),
            listing(3.0, 7),
        ]);
        assert_eq!(top_reviewed(&dataset, 3), vec![1, 3, 0]);
        assert_eq!(top_reviewed(&dataset, 10).len(), 4);
    }
}
