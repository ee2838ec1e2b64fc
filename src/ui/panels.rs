use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // ---- Year range ----
    ui.strong("Year of Release");
    let bounds = state.year_bounds;
    let mut from = state.selection.year_range.min;
    let mut to = state.selection.year_range.max;
    let from_changed = ui
        .add(egui::Slider::new(&mut from, bounds.min..=bounds.max).text("from"))
        .changed();
    let to_changed = ui
        .add(egui::Slider::new(&mut to, bounds.min..=bounds.max).text("to"))
        .changed();
    if from_changed || to_changed {
        // Dragging one handle past the other pushes it along.
        if from_changed && from > to {
            to = from;
        } else if to_changed && to < from {
            from = to;
        }
        state.set_year_range(from, to);
    }
    ui.separator();

    // Cheap Arc clone so the lists can be walked while `state` is mutated.
    let dataset = state.dataset.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            category_filter(ui, state, "Platform Filter", dataset.platforms(), Category::Platform);
            category_filter(ui, state, "Genre Filter", dataset.genres(), Category::Genre);
        });
}

#[derive(Clone, Copy)]
enum Category {
    Platform,
    Genre,
}

/// A collapsible checkbox list. No box ticked means no filter.
fn category_filter(ui: &mut Ui, state: &mut AppState, title: &str, values: &[String], category: Category) {
    let selected = match category {
        Category::Platform => &state.selection.platforms,
        Category::Genre => &state.selection.genres,
    };

    let count = if selected.is_empty() {
        "all".to_string()
    } else {
        format!("{}/{}", selected.len(), values.len())
    };
    let header_text = format!("{title}  ({count})");

    let mut toggled: Option<&str> = None;
    let mut cleared = false;

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear").clicked() {
                cleared = true;
            }

            for value in values {
                let colors = match category {
                    Category::Platform => &state.platform_colors,
                    Category::Genre => &state.genre_colors,
                };
                let text = RichText::new(value).color(colors.color_for(value));

                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(value);
                }
            }
        });

    if cleared {
        match category {
            Category::Platform => state.clear_platforms(),
            Category::Genre => state.clear_genres(),
        }
    }
    if let Some(value) = toggled {
        match category {
            Category::Platform => state.toggle_platform(value),
            Category::Genre => state.toggle_genre(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary row
// ---------------------------------------------------------------------------

/// The three headline numbers, side by side.
pub fn summary_row(ui: &mut Ui, state: &AppState) {
    let summary = &state.output.summary;
    let no_data = summary.total_count == 0;

    ui.columns(3, |cols| {
        let texts = [
            summary.total_text(),
            summary.user_score_text(),
            summary.critic_score_text(),
        ];
        for (col, text) in cols.iter_mut().zip(texts) {
            col.vertical_centered(|ui: &mut Ui| {
                let mut label = RichText::new(text).size(16.0).strong();
                if no_data {
                    label = label.color(Color32::from_rgb(200, 120, 0));
                }
                ui.label(label);
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top title bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Game Industry Dashboard");
        ui.separator();
        ui.label(format!(
            "{} games loaded, {} match the filters",
            state.dataset.len(),
            state.output.summary.total_count
        ));
    });
}
