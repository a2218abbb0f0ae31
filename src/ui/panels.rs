use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – navigation and filter widgets
// ---------------------------------------------------------------------------

/// Render the left navigation / filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Navigation");
    ui.separator();

    for page in Page::ALL {
        ui.radio_value(&mut state.page, page, page.title());
    }

    ui.add_space(8.0);
    ui.heading("Filters");
    ui.separator();

    // Work on copies so the pipeline reruns once per change.
    let mut min_rating = state.params.min_rating;
    let mut max_reviews = state.params.max_review_count;
    let review_max = state.review_slider_max();

    ui.label("Minimum rating per business");
    let rating_changed = ui
        .add(egui::Slider::new(&mut min_rating, 0.0..=5.0).step_by(0.5))
        .changed();

    ui.label("Maximum reviews per business");
    let reviews_changed = ui
        .add(egui::Slider::new(&mut max_reviews, 1..=review_max).logarithmic(true))
        .changed();

    if rating_changed || reviews_changed {
        state.set_filters(min_rating, max_reviews);
    }

    ui.separator();
    let output = &state.output;
    ui.label(format!("{} businesses match", output.view.len()));
    ui.label(format!(
        "{} clusters, {} noise points",
        output.clusters.len(),
        output.view.noise_count()
    ));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{}: {} listings loaded, {} visible",
            state.cache.path().display(),
            state.dataset.len(),
            state.output.view.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open business listings")
        .add_filter("Supported files", &["json", "jsonl", "ndjson", "csv", "parquet", "pq"])
        .add_filter("JSON lines", &["json", "jsonl", "ndjson"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
