use std::sync::Arc;

use games_dashboard::data::aggregate::{compute, pivot_year_platform, DashboardOutput, StackedSeries};
use games_dashboard::data::filter::{Selection, YearRange};
use games_dashboard::data::model::Dataset;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Dataset loaded at startup; never modified afterwards.
    pub dataset: Arc<Dataset>,

    /// Current platform / genre / year selection.
    pub selection: Selection,

    /// Limits of the year sliders.
    pub year_bounds: YearRange,

    /// Outputs for the current selection (cached until the selection changes).
    pub output: DashboardOutput,

    /// Year/platform counts pivoted for the stacked chart.
    pub stacked: StackedSeries,

    pub platform_colors: ColorMap,
    pub genre_colors: ColorMap,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, year_bounds: YearRange) -> Self {
        let selection = Selection {
            year_range: year_bounds,
            ..Default::default()
        };
        let output = compute(&dataset, &selection);
        let stacked = pivot_year_platform(&output.by_year_platform, dataset.platforms());

        Self {
            platform_colors: ColorMap::new(dataset.platforms()),
            genre_colors: ColorMap::new(dataset.genres()),
            dataset,
            selection,
            year_bounds,
            output,
            stacked,
        }
    }

    /// Recompute every output after a selection change.
    pub fn refresh(&mut self) {
        self.output = compute(&self.dataset, &self.selection);
        self.stacked = pivot_year_platform(&self.output.by_year_platform, self.dataset.platforms());
        log::debug!(
            "Selection {:?} matched {} games",
            self.selection,
            self.output.summary.total_count
        );
    }

    pub fn toggle_platform(&mut self, platform: &str) {
        self.selection.toggle_platform(platform);
        self.refresh();
    }

    pub fn toggle_genre(&mut self, genre: &str) {
        self.selection.toggle_genre(genre);
        self.refresh();
    }

    /// Drop the platform filter (every platform shown).
    pub fn clear_platforms(&mut self) {
        self.selection.platforms.clear();
        self.refresh();
    }

    /// Drop the genre filter (every genre shown).
    pub fn clear_genres(&mut self) {
        self.selection.genres.clear();
        self.refresh();
    }

    /// Set the year window, keeping `min <= max` within the slider bounds.
    pub fn set_year_range(&mut self, min: i32, max: i32) {
        let lo = self.year_bounds.min.min(self.year_bounds.max);
        let hi = self.year_bounds.min.max(self.year_bounds.max);
        let min = min.clamp(lo, hi);
        let max = max.clamp(min, hi);
        self.selection.year_range = YearRange::new(min, max);
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_dashboard::data::model::GameRecord;

    fn state() -> AppState {
        let ds = Dataset::from_records(vec![
            GameRecord::new("PC", "RPG", 2010).with_scores(8.0, 85.0),
            GameRecord::new("PS4", "Action", 2015).with_scores(6.0, 70.0),
        ]);
        AppState::new(Arc::new(ds), YearRange::new(2000, 2022))
    }

    #[test]
    fn starts_with_everything_selected() {
        let st = state();
        assert_eq!(st.output.summary.total_count, 2);
        assert_eq!(st.stacked.years, [2010, 2015]);
    }

    #[test]
    fn toggling_recomputes_outputs() {
        let mut st = state();
        st.toggle_platform("PS4");
        assert_eq!(st.output.summary.total_count, 1);
        assert_eq!(st.output.summary.avg_user_score, 6.0);

        st.clear_platforms();
        assert_eq!(st.output.summary.total_count, 2);
    }

    #[test]
    fn year_range_is_clamped_and_ordered() {
        let mut st = state();
        st.set_year_range(1990, 2011);
        assert_eq!(st.selection.year_range, YearRange::new(2000, 2011));
        assert_eq!(st.output.summary.total_count, 1);

        st.set_year_range(2016, 2012);
        assert_eq!(st.selection.year_range, YearRange::new(2016, 2016));
        assert_eq!(st.output.summary.total_count, 0);
    }
}
