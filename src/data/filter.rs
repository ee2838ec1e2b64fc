use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use super::model::{Dataset, GameRecord};

/// Lower bound of the year slider.
pub const DEFAULT_MIN_YEAR: i32 = 2000;
/// Upper bound of the year slider.
pub const DEFAULT_MAX_YEAR: i32 = 2022;

// ---------------------------------------------------------------------------
// Selection: the user's current filter
// ---------------------------------------------------------------------------

/// Inclusive release-year window. `min > max` matches nothing.
///
/// A bound left out when deserializing takes its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange {
            min: DEFAULT_MIN_YEAR,
            max: DEFAULT_MAX_YEAR,
        }
    }
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        YearRange { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// Platform / genre / year selection.
///
/// An empty platform or genre set means "no filter" on that column, not
/// "nothing selected". A cleared dropdown arrives as `null`, which is read
/// the same as an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    #[serde(deserialize_with = "null_as_default")]
    pub platforms: BTreeSet<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub genres: BTreeSet<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub year_range: YearRange,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Selection {
    pub fn with_years(min: i32, max: i32) -> Self {
        Selection {
            year_range: YearRange::new(min, max),
            ..Default::default()
        }
    }

    /// Whether a record passes all three criteria.
    pub fn matches(&self, record: &GameRecord) -> bool {
        (self.platforms.is_empty() || self.platforms.contains(&record.platform))
            && (self.genres.is_empty() || self.genres.contains(&record.genre))
            && record
                .year_of_release
                .is_some_and(|year| self.year_range.contains(year))
    }

    /// Toggle a single platform in the selection.
    pub fn toggle_platform(&mut self, platform: &str) {
        toggle(&mut self.platforms, platform);
    }

    /// Toggle a single genre in the selection.
    pub fn toggle_genre(&mut self, genre: &str) {
        toggle(&mut self.genres, genre);
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

/// Records passing the selection, in dataset order.
pub fn filtered_records<'a>(
    dataset: &'a Dataset,
    selection: &'a Selection,
) -> impl Iterator<Item = &'a GameRecord> + 'a {
    dataset.records().iter().filter(move |r| selection.matches(r))
}
