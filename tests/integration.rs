//! Integration tests for Yelp Explorer

use std::io::Write;

use tempfile::NamedTempFile;
use yelp_explorer::pipeline::hours::{extract_opening_times, RatingBucket};
use yelp_explorer::{
    load_file, run, Dataset, DatasetCache, FilterParams, PipelineConfig, Record, Weekday, NOISE,
};

/// Write JSON lines to a temp file the loader recognises by extension.
fn json_lines(lines: &[String]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

fn listing(id: &str, lat: f64, lon: f64, stars: f64, reviews: u64, city: &str) -> String {
    format!(
        r#"{{"business_id":"{id}","name":"Place {id}","city":"{city}","state":"PA","latitude":{lat},"longitude":{lon},"stars":{stars},"review_count":{reviews},"categories":"Restaurants, Pizza","hours":{{"Monday":"8:0-20:0","Tuesday":"9:30-17:0"}}}}"#
    )
}

/// Five listings packed around (40.0, -75.0) and one far away.
fn create_test_listings() -> NamedTempFile {
    let mut lines: Vec<String> = (0..5)
        .map(|i| {
            listing(
                &format!("p{i}"),
                40.0 + i as f64 * 0.001,
                -75.0 + i as f64 * 0.001,
                3.5 + i as f64 * 0.25,
                10 * (i + 1),
                if i < 3 { "Philadelphia" } else { "Camden" },
            )
        })
        .collect();
    lines.push(listing("far", 10.0, 10.0, 2.0, 999, "Nowhere"));
    json_lines(&lines)
}

#[test]
fn test_end_to_end_pipeline() {
    let file = create_test_listings();
    let dataset = load_file(file.path(), 100).unwrap();
    assert_eq!(dataset.len(), 6);

    let output = run(
        &dataset,
        &FilterParams::unrestricted(&dataset),
        &PipelineConfig::default(),
    )
    .unwrap();

    // One cluster for the packed listings, the far one is noise
    assert_eq!(output.clusters.len(), 1);
    let cluster = &output.clusters[0];
    assert_ne!(cluster.id, NOISE);
    assert_eq!(cluster.size, 5);
    assert_eq!(cluster.total_reviews, 150);
    assert_eq!(cluster.label, "Philadelphia");
    assert!((cluster.mean_latitude - 40.002).abs() < 1e-9);
    assert!((cluster.mean_rating - 4.0).abs() < 1e-9);
    assert_eq!(output.view.noise_count(), 1);
    assert_eq!(output.view.cluster_ids[5], Some(NOISE));

    // Two schedule entries per listing
    assert_eq!(output.opening_hours.samples.len(), 12);
    assert_eq!(output.opening_hours.diagnostics.skipped(), 0);

    assert_eq!(output.top_categories.len(), 2);
    assert_eq!(output.top_categories[0].count, 6);

    assert_eq!(output.kpis.business_count, 6);
    assert_eq!(output.kpis.total_reviews, 1149);
}

#[test]
fn test_cluster_reviews_match_member_sum() {
    let file = create_test_listings();
    let mut records = load_file(file.path(), 100).unwrap().records;

    // Listings without usable coordinates pass the filter but are never clustered.
    let unplaced = |id: &str, latitude: Option<f64>| Record {
        id: id.to_string(),
        name: id.to_string(),
        city: Some("Philadelphia".to_string()),
        state: None,
        latitude,
        longitude: Some(-75.0),
        rating: 4.0,
        review_count: 5000,
        categories: None,
        hours: None,
    };
    records.push(unplaced("no-coords", None));
    records.push(unplaced("nan-coords", Some(f64::NAN)));
    let dataset = Dataset::from_records(records);

    let config = PipelineConfig {
        min_samples: 2,
        ..PipelineConfig::default()
    };
    let output = run(&dataset, &FilterParams::unrestricted(&dataset), &config).unwrap();
    assert_eq!(output.view.len(), 8);
    assert_eq!(output.view.cluster_ids[6], None);
    assert_eq!(output.view.cluster_ids[7], None);

    let from_clusters: u64 = output.clusters.iter().map(|c| c.total_reviews).sum();
    let from_members: u64 = output
        .view
        .records(&dataset)
        .filter(|r| r.coordinates().is_some())
        .zip(output.view.cluster_ids.iter().flatten())
        .filter(|(_, id)| **id != NOISE)
        .map(|(r, _)| r.review_count)
        .sum();
    assert_eq!(from_clusters, from_members);
    assert_eq!(from_clusters, 150);
    assert!(output.clusters.iter().all(|c| c.id != NOISE));
}

#[test]
fn test_monday_opening_sample() {
    let file = json_lines(&[r#"{"business_id":"m","name":"Diner","stars":4.2,"review_count":3,"hours":{"Monday":"08:00-20:00"}}"#.to_string()]);
    let dataset = load_file(file.path(), 10).unwrap();

    let hours = extract_opening_times(dataset.records.iter());
    assert_eq!(hours.samples.len(), 1);
    let sample = &hours.samples[0];
    assert_eq!(sample.weekday, Weekday::Monday);
    assert_eq!(sample.opening_hour, 8);
    assert_eq!(sample.rating, 4.2);
    assert_eq!(sample.bucket, Some(RatingBucket::Four));
    assert_eq!(RatingBucket::Four.label(), "4");

    // Extraction has no side effects
    assert_eq!(extract_opening_times(dataset.records.iter()), hours);
}

#[test]
fn test_empty_filtered_set() {
    let file = create_test_listings();
    let dataset = load_file(file.path(), 100).unwrap();
    let params = FilterParams {
        min_rating: 5.0,
        max_review_count: 1,
    };
    let output = run(&dataset, &params, &PipelineConfig::default()).unwrap();

    assert!(output.view.is_empty());
    assert!(output.clusters.is_empty());
    assert!(output.opening_hours.samples.is_empty());
    assert!(output.top_categories.is_empty());
    assert_eq!(output.kpis.mean_rating, None);
    assert!(output.rating_summary.is_none());
}

#[test]
fn test_category_ranking_is_capped() {
    let lines: Vec<String> = (0..15)
        .map(|i| {
            format!(
                r#"{{"business_id":"c{i}","name":"n","stars":3.0,"review_count":1,"categories":"Restaurants, Kind{i}"}}"#
            )
        })
        .collect();
    let file = json_lines(&lines);
    let dataset = load_file(file.path(), 100).unwrap();
    let output = run(
        &dataset,
        &FilterParams::unrestricted(&dataset),
        &PipelineConfig::default(),
    )
    .unwrap();

    assert_eq!(output.top_categories.len(), 10);
    assert_eq!(output.top_categories[0].category, "Restaurants");
    assert_eq!(output.top_categories[0].count, 15);
    // Ties keep first-seen order
    assert_eq!(output.top_categories[1].category, "Kind0");
}

#[test]
fn test_cache_reload_picks_up_changes() {
    let mut file = create_test_listings();
    let mut cache = DatasetCache::new(file.path(), 100);
    assert!(!cache.is_loaded());

    let first = cache.get_or_load().unwrap();
    assert_eq!(first.len(), 6);
    assert!(cache.is_loaded());

    writeln!(file, "{}", listing("late", 40.0, -75.0, 4.0, 1, "Philadelphia")).unwrap();
    file.flush().unwrap();

    // Cached until an explicit reload
    assert_eq!(cache.get_or_load().unwrap().len(), 6);
    assert_eq!(cache.reload().unwrap().len(), 7);
}
