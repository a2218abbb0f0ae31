//! Per-cluster summary table and default cluster selection.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::cluster::{ClusterId, NOISE};
use crate::data::model::Record;

/// Label used when no member of a cluster has a city.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One row of the cluster table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub id: ClusterId,
    pub mean_latitude: f64,
    pub mean_longitude: f64,
    pub mean_rating: f64,
    pub total_reviews: u64,
    /// Number of member listings.
    pub size: usize,
    /// Most frequent city among the members.
    pub label: String,
}

#[derive(Default)]
struct Accumulator<'a> {
    lat_sum: f64,
    lon_sum: f64,
    rating_sum: f64,
    reviews: u64,
    size: usize,
    cities: Vec<&'a str>,
}

/// Build the cluster table from clustered listings.
///
/// Every input pair must come from a listing with coordinates. Noise is
/// dropped; rows are ordered by ascending cluster id.
pub fn summarize_clusters<'a, I>(members: I) -> Vec<ClusterSummary>
where
    I: IntoIterator<Item = (&'a Record, ClusterId)>,
{
    let mut groups: BTreeMap<ClusterId, Accumulator<'a>> = BTreeMap::new();

    for (record, id) in members {
        if id == NOISE {
            continue;
        }
        let Some([lat, lon]) = record.coordinates() else {
            continue;
        };
        let acc = groups.entry(id).or_default();
        acc.lat_sum += lat;
        acc.lon_sum += lon;
        acc.rating_sum += record.rating;
        acc.reviews += record.review_count;
        acc.size += 1;
        if let Some(city) = record.city.as_deref() {
            acc.cities.push(city);
        }
    }

    groups
        .into_iter()
        .map(|(id, acc)| {
            let n = acc.size as f64;
            ClusterSummary {
                id,
                mean_latitude: acc.lat_sum / n,
                mean_longitude: acc.lon_sum / n,
                mean_rating: acc.rating_sum / n,
                total_reviews: acc.reviews,
                size: acc.size,
                label: most_frequent(acc.cities.iter().copied())
                    .unwrap_or(UNKNOWN_LABEL)
                    .to_string(),
            }
        })
        .collect()
}

/// Most frequent value; ties go to the value seen first.
pub fn most_frequent<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    // value -> (first position, count)
    let mut counts: HashMap<&'a str, (usize, usize)> = HashMap::new();
    for (pos, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((pos, 0)).1 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (pos_a, count_a)), (_, (pos_b, count_b))| {
            count_a.cmp(count_b).then(pos_b.cmp(pos_a))
        })
        .map(|(value, _)| value)
}

/// Resolve the cluster to show.
///
/// A requested id that exists in `clusters` wins; otherwise the first row is
/// used. `None` means the table is empty and there is nothing to select.
pub fn select_cluster(
    clusters: &[ClusterSummary],
    requested: Option<ClusterId>,
) -> Option<&ClusterSummary> {
    requested
        .and_then(|id| clusters.iter().find(|c| c.id == id))
        .or_else(|| clusters.first())
}
