use eframe::egui::{RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, Points};

use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Charts (central panel)
// ---------------------------------------------------------------------------

/// Render the three charts for the current selection.
pub fn charts(ui: &mut Ui, state: &AppState) {
    if state.output.summary.total_count == 0 {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No games match the current filters");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            chart_title(ui, "Game Releases by Year and Platform");
            releases_chart(ui, state);
            ui.add_space(12.0);

            chart_title(ui, "User Scores vs. Critic Scores by Genre");
            scores_chart(ui, state);
            ui.add_space(12.0);

            chart_title(ui, "Average Age Rating by Genre");
            rating_chart(ui, state);
        });
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(title).strong().size(15.0));
    });
}

/// Releases per year, one stacked bar segment per platform.
fn releases_chart(ui: &mut Ui, state: &AppState) {
    let stacked = &state.stacked;

    // stack_on offsets bars by index, so every series covers every year.
    let mut charts: Vec<BarChart> = Vec::with_capacity(stacked.series.len());
    for (platform, counts) in &stacked.series {
        let bars: Vec<Bar> = stacked
            .years
            .iter()
            .zip(counts)
            .map(|(&year, &count)| Bar::new(f64::from(year), count as f64).width(0.8))
            .collect();

        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(platform)
            .color(state.platform_colors.color_for(platform))
            .stack_on(&below);
        charts.push(chart);
    }

    Plot::new("releases_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("year_of_release")
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// User score against critic score, coloured by genre.
fn scores_chart(ui: &mut Ui, state: &AppState) {
    let dataset = &state.dataset;
    let points = &state.output.score_points;

    Plot::new("scores_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("user_score")
        .y_axis_label("critic_score")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for genre in dataset.genres() {
                let xy: Vec<[f64; 2]> = points
                    .iter()
                    .filter(|p| &p.genre == genre)
                    .map(|p| [p.user_score, p.critic_score])
                    .collect();
                if xy.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(xy)
                        .name(genre)
                        .color(state.genre_colors.color_for(genre))
                        .radius(2.5),
                );
            }
        });
}

/// Mean age rating per genre; genres without ratings are left out.
fn rating_chart(ui: &mut Ui, state: &AppState) {
    let ratings: Vec<_> = state
        .output
        .genre_ratings
        .iter()
        .filter(|g| !g.mean_rating.is_nan())
        .collect();

    let bars: Vec<Bar> = ratings
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.mean_rating)
                .name(&g.genre)
                .fill(state.genre_colors.color_for(&g.genre))
                .width(0.7)
        })
        .collect();
    let names: Vec<String> = ratings.iter().map(|g| g.genre.clone()).collect();

    Plot::new("rating_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("genre")
        .y_axis_label("rating_numeric")
        .x_axis_formatter(move |mark: GridMark, _range| genre_label(&names, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Axis label for a bar position; empty between bars.
fn genre_label(names: &[String], position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    names.get(rounded as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::genre_label;

    #[test]
    fn genre_labels_only_on_bar_positions() {
        let names = vec!["Action".to_string(), "RPG".to_string()];
        assert_eq!(genre_label(&names, 0.0), "Action");
        assert_eq!(genre_label(&names, 1.0), "RPG");
        assert_eq!(genre_label(&names, 0.5), "");
        assert_eq!(genre_label(&names, 2.0), "");
        assert_eq!(genre_label(&names, -1.0), "");
    }
}
