use std::collections::BTreeMap;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoints, Points,
};

use yelp_explorer::pipeline::hours::{opening_hour_spread, RatingBucket};
use yelp_explorer::{ClusterSummary, Weekday};

use crate::color::{bucket_color, generate_palette, rating_color};
use crate::state::{AppState, Page};

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Central panel – page dispatch
// ---------------------------------------------------------------------------

/// Render the active page in the central panel.
pub fn page(ui: &mut Ui, state: &mut AppState) {
    match state.page {
        Page::Map => map_page(ui, state),
        Page::Statistics => statistics_page(ui, state),
        Page::OpeningHours => opening_hours_page(ui, state),
        Page::Insights => insights_page(ui, state),
    }
}

/// Label only the integer grid marks with `names[mark]`.
fn index_labels(names: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        names.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn empty_notice(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}

// ---------------------------------------------------------------------------
// Map page
// ---------------------------------------------------------------------------

fn cluster_caption(cluster: &ClusterSummary) -> String {
    format!("{} ({} businesses)", cluster.label, cluster.size)
}

fn map_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📍 Clustered business map");

    let Some(current) = state.current_cluster().cloned() else {
        empty_notice(ui, "No cluster available for the current filters");
        return;
    };

    let mut selected = current.id;
    egui::ComboBox::from_id_salt("cluster_picker")
        .selected_text(cluster_caption(&current))
        .show_ui(ui, |ui: &mut Ui| {
            for cluster in &state.output.clusters {
                ui.selectable_value(&mut selected, cluster.id, cluster_caption(cluster));
            }
        });
    if selected != current.id {
        state.selected_cluster = Some(selected);
    }

    ui.label(format!(
        "Centre {:.3}, {:.3}  ·  mean rating {:.2}  ·  {} reviews",
        current.mean_latitude, current.mean_longitude, current.mean_rating, current.total_reviews
    ));

    let dataset = &state.dataset;
    let members = state.output.view.members(current.id);

    // One series per half-star step so the legend doubles as colour scale.
    let mut by_rating: BTreeMap<i64, Vec<[f64; 2]>> = BTreeMap::new();
    for &i in &members {
        let record = &dataset.records[i];
        if let Some([lat, lon]) = record.coordinates() {
            by_rating
                .entry((record.rating * 2.0).round() as i64)
                .or_default()
                .push([lon, lat]);
        }
    }

    Plot::new("cluster_map")
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .height(ui.available_height() * 0.6)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (half_stars, coords) in by_rating {
                let rating = half_stars as f64 / 2.0;
                let points: PlotPoints = coords.into_iter().collect();
                plot_ui.points(
                    Points::new(points)
                        .radius(4.0)
                        .color(rating_color(rating))
                        .name(format!("★ {rating:.1}")),
                );
            }
        });

    ui.add_space(6.0);
    ui.strong(format!("{} businesses in this cluster", members.len()));

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(70.0), 6)
        .header(20.0, |mut header| {
            for title in ["Name", "City", "State", "Rating", "Reviews", "Location"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, members.len(), |mut row| {
                let record = &dataset.records[members[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(&record.name);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.city.as_deref().unwrap_or("–"));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.state.as_deref().unwrap_or("–"));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.1}", record.rating));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.review_count.to_string());
                });
                row.col(|ui: &mut Ui| {
                    if let Some([lat, lon]) = record.coordinates() {
                        ui.label(format!("{lat:.4}, {lon:.4}"));
                    }
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Statistics page
// ---------------------------------------------------------------------------

fn statistics_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📊 Business statistics");
    let output = &state.output;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("⭐ Rating distribution");
            let bars: Vec<Bar> = output
                .rating_histogram
                .iter()
                .map(|bin| {
                    Bar::new((bin.lower + bin.upper) / 2.0, bin.count as f64)
                        .width((bin.upper - bin.lower).max(0.1))
                        .name(format!("{:.2} – {:.2}", bin.lower, bin.upper))
                })
                .collect();
            Plot::new("rating_histogram")
                .height(CHART_HEIGHT)
                .x_axis_label("Rating")
                .y_axis_label("Businesses")
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
                });

            ui.strong("📦 Rating box plot");
            Plot::new("rating_box")
                .height(CHART_HEIGHT * 0.5)
                .x_axis_label("Rating")
                .show_y(false)
                .show(ui, |plot_ui| {
                    if let Some(s) = &output.rating_summary {
                        let elem = BoxElem::new(
                            0.0,
                            BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max),
                        )
                        .name("Rating")
                        .box_width(0.5);
                        plot_ui.box_plot(BoxPlot::new(vec![elem]).horizontal());
                    }
                });

            ui.strong(format!(
                "🌍 Top {} categories among '{}' listings",
                state.config.top_n, state.config.category_marker
            ));
            if output.top_categories.is_empty() {
                ui.label("No matching listings.");
                return;
            }
            let colors = generate_palette(output.top_categories.len());
            let bars: Vec<Bar> = output
                .top_categories
                .iter()
                .zip(colors)
                .enumerate()
                .map(|(i, (entry, color))| {
                    Bar::new(i as f64, entry.count as f64)
                        .width(0.7)
                        .name(&entry.category)
                        .fill(color)
                })
                .collect();
            let names = output
                .top_categories
                .iter()
                .map(|c| c.category.clone())
                .collect();
            Plot::new("top_categories")
                .height(CHART_HEIGHT)
                .y_axis_label("Count")
                .x_axis_formatter(index_labels(names))
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars));
                });
        });
}

// ---------------------------------------------------------------------------
// Opening hours page
// ---------------------------------------------------------------------------

fn opening_hours_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("⏰ Opening hours");
    let hours = &state.output.opening_hours;
    let d = &hours.diagnostics;

    ui.label(format!(
        "{} schedule entries used, {} skipped ({} without range, {} malformed, {} out of range, {} unknown day), {} businesses without hours",
        d.parsed,
        d.skipped(),
        d.missing_separator,
        d.malformed_time,
        d.hour_out_of_range,
        d.unknown_weekday,
        d.without_schedule
    ));

    if hours.samples.is_empty() {
        empty_notice(ui, "No opening hours for the current filters");
        return;
    }

    let spread = opening_hour_spread(&hours.samples);
    let locale = state.config.locale;
    let day_names = Weekday::ALL
        .iter()
        .map(|d| d.label(locale).to_string())
        .collect();

    Plot::new("opening_hours")
        .legend(Legend::default())
        .x_axis_label("Weekday")
        .y_axis_label("Opening hour")
        .x_axis_formatter(index_labels(day_names))
        .show(ui, |plot_ui| {
            for (slot, bucket) in RatingBucket::ALL.into_iter().enumerate() {
                let offset = (slot as f64 - 2.0) * 0.16;
                let boxes: Vec<BoxElem> = spread
                    .iter()
                    .filter(|((_, b), _)| *b == bucket)
                    .map(|((day, _), s)| {
                        BoxElem::new(
                            day.index() as f64 + offset,
                            BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max),
                        )
                        .box_width(0.14)
                        .whisker_width(0.1)
                    })
                    .collect();
                if boxes.is_empty() {
                    continue;
                }
                plot_ui.box_plot(
                    BoxPlot::new(boxes)
                        .color(bucket_color(bucket))
                        .name(format!("Rating group {bucket}")),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Insights page
// ---------------------------------------------------------------------------

fn insights_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("⚡ Key figures");
    let output = &state.output;
    let dataset = &state.dataset;

    ui.columns(3, |cols| {
        cols[0].label("📍 Businesses");
        cols[0].label(RichText::new(output.kpis.business_count.to_string()).size(24.0));
        cols[1].label("⭐ Mean rating");
        cols[1].label(
            RichText::new(
                output
                    .kpis
                    .mean_rating
                    .map_or_else(|| "–".to_string(), |r| format!("{r:.2}")),
            )
            .size(24.0),
        );
        cols[2].label("💬 Reviews");
        cols[2].label(RichText::new(output.kpis.total_reviews.to_string()).size(24.0));
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("📈 Reviews vs rating");
            let points: PlotPoints = output
                .view
                .records(dataset)
                .map(|r| [r.review_count as f64, r.rating])
                .collect();
            Plot::new("reviews_vs_rating")
                .height(CHART_HEIGHT)
                .x_axis_label("Reviews")
                .y_axis_label("Rating")
                .show(ui, |plot_ui| {
                    plot_ui.points(Points::new(points).radius(2.0).color(Color32::LIGHT_BLUE));
                });

            ui.strong("🏆 Most reviewed businesses");
            let top: Vec<_> = state
                .top_reviewed
                .iter()
                .map(|&i| &dataset.records[i])
                .collect();
            let bars: Vec<Bar> = top
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    Bar::new(i as f64, r.review_count as f64)
                        .width(0.7)
                        .name(&r.name)
                })
                .collect();
            let names = top.iter().map(|r| r.name.clone()).collect();
            Plot::new("top_reviewed")
                .height(CHART_HEIGHT)
                .y_axis_label("Reviews")
                .x_axis_formatter(index_labels(names))
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).color(Color32::GOLD));
                });
        });
}
