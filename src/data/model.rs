use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GameRecord – one row of the games table
// ---------------------------------------------------------------------------

/// A single game release.
///
/// Scores and ratings are optional because the source data marks unreleased
/// or unrated titles with placeholders such as `tbd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub platform: String,
    pub genre: String,
    /// Release year. A record without one never matches a year range.
    pub year_of_release: Option<i32>,
    pub user_score: Option<f64>,
    pub critic_score: Option<f64>,
    /// Age rating mapped onto a numeric scale.
    pub rating_numeric: Option<f64>,
}

impl GameRecord {
    pub fn new(platform: &str, genre: &str, year: i32) -> Self {
        GameRecord {
            platform: platform.to_string(),
            genre: genre.to_string(),
            year_of_release: Some(year),
            user_score: None,
            critic_score: None,
            rating_numeric: None,
        }
    }

    pub fn with_scores(mut self, user: f64, critic: f64) -> Self {
        self.user_score = Some(user);
        self.critic_score = Some(critic);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating_numeric = Some(rating);
        self
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed categorical indices.
///
/// Fields are private so the table stays read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<GameRecord>,
    /// Distinct platforms in first-occurrence order.
    platforms: Vec<String>,
    /// Distinct genres in first-occurrence order.
    genres: Vec<String>,
}

impl Dataset {
    /// Build categorical indices from the loaded records.
    pub fn from_records(records: Vec<GameRecord>) -> Self {
        let platforms = distinct_in_order(records.iter().map(|r| r.platform.as_str()));
        let genres = distinct_in_order(records.iter().map(|r| r.genre.as_str()));
        Dataset {
            records,
            platforms,
            genres,
        }
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Smallest and largest known release year, if any record has one.
    pub fn year_extent(&self) -> Option<(i32, i32)> {
        let mut years = self.records.iter().filter_map(|r| r.year_of_release);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_values_keep_first_occurrence_order() {
        let ds = Dataset::from_records(vec![
            GameRecord::new("PS4", "Action", 2015),
            GameRecord::new("PC", "RPG", 2010),
            GameRecord::new("PS4", "Shooter", 2016),
            GameRecord::new("3DS", "Action", 2013),
        ]);

        assert_eq!(ds.platforms(), ["PS4", "PC", "3DS"]);
        assert_eq!(ds.genres(), ["Action", "RPG", "Shooter"]);
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn year_extent_skips_unknown_years() {
        let mut undated = GameRecord::new("PC", "RPG", 0);
        undated.year_of_release = None;
        let ds = Dataset::from_records(vec![
            GameRecord::new("PC", "RPG", 2012),
            undated,
            GameRecord::new("PC", "RPG", 2004),
        ]);
        assert_eq!(ds.year_extent(), Some((2004, 2012)));
        assert_eq!(Dataset::default().year_extent(), None);
    }
}
