use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::filter::{filtered_records, Selection};
use super::model::{Dataset, GameRecord};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Headline numbers over the filtered records.
///
/// Means are `NaN` when no filtered record carries the score.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub avg_user_score: f64,
    pub avg_critic_score: f64,
}

impl Summary {
    pub fn total_text(&self) -> String {
        format!("Total number of games: {}", self.total_count)
    }

    pub fn user_score_text(&self) -> String {
        format!("Average user score: {}", format_mean(self.avg_user_score))
    }

    pub fn critic_score_text(&self) -> String {
        format!("Average critic score: {}", format_mean(self.avg_critic_score))
    }
}

/// Two decimals, or `no data` for an undefined mean.
pub fn format_mean(value: f64) -> String {
    if value.is_nan() {
        "no data".to_string()
    } else {
        format!("{value:.2}")
    }
}

/// Number of releases for one (year, platform) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearPlatformCount {
    pub year: i32,
    pub platform: String,
    pub count: usize,
}

/// Mean age rating of one genre.
#[derive(Debug, Clone, Serialize)]
pub struct GenreRating {
    pub genre: String,
    pub mean_rating: f64,
}

/// One point of the user-vs-critic scatter.
#[derive(Debug, Clone, Serialize)]
pub struct ScorePoint {
    pub user_score: f64,
    pub critic_score: f64,
    pub genre: String,
}

/// Everything the dashboard displays for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardOutput {
    pub summary: Summary,
    /// Ordered by year, then by platform first-occurrence order.
    pub by_year_platform: Vec<YearPlatformCount>,
    /// Ordered by genre name.
    pub genre_ratings: Vec<GenreRating>,
    pub score_points: Vec<ScorePoint>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Filter the dataset by `selection` and recompute every dashboard output.
///
/// Pure: the same inputs always produce the same output.
pub fn compute(dataset: &Dataset, selection: &Selection) -> DashboardOutput {
    let filtered: Vec<&GameRecord> = filtered_records(dataset, selection).collect();

    let summary = Summary {
        total_count: filtered.len(),
        avg_user_score: mean(filtered.iter().filter_map(|r| r.user_score)),
        avg_critic_score: mean(filtered.iter().filter_map(|r| r.critic_score)),
    };

    DashboardOutput {
        summary,
        by_year_platform: count_by_year_platform(dataset, &filtered),
        genre_ratings: mean_rating_by_genre(&filtered),
        score_points: score_points(&filtered),
    }
}

/// Arithmetic mean, `NaN` for an empty input.
pub fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

fn count_by_year_platform(dataset: &Dataset, filtered: &[&GameRecord]) -> Vec<YearPlatformCount> {
    let rank: HashMap<&str, usize> = dataset
        .platforms()
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_str(), i))
        .collect();

    let mut groups: BTreeMap<(i32, usize), (&str, usize)> = BTreeMap::new();
    for rec in filtered {
        // Filtered records always carry a year.
        let Some(year) = rec.year_of_release else {
            continue;
        };
        let r = rank.get(rec.platform.as_str()).copied().unwrap_or(usize::MAX);
        groups.entry((year, r)).or_insert((rec.platform.as_str(), 0)).1 += 1;
    }

    groups
        .into_iter()
        .map(|((year, _), (platform, count))| YearPlatformCount {
            year,
            platform: platform.to_string(),
            count,
        })
        .collect()
}

fn mean_rating_by_genre(filtered: &[&GameRecord]) -> Vec<GenreRating> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for rec in filtered {
        let ratings = groups.entry(rec.genre.as_str()).or_default();
        if let Some(r) = rec.rating_numeric {
            ratings.push(r);
        }
    }

    groups
        .into_iter()
        .map(|(genre, ratings)| GenreRating {
            genre: genre.to_string(),
            mean_rating: mean(ratings.into_iter()),
        })
        .collect()
}

fn score_points(filtered: &[&GameRecord]) -> Vec<ScorePoint> {
    filtered
        .iter()
        .filter_map(|r| {
            Some(ScorePoint {
                user_score: r.user_score?,
                critic_score: r.critic_score?,
                genre: r.genre.clone(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Chart helpers
// ---------------------------------------------------------------------------

/// Dense year × platform grid for stacked charts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackedSeries {
    pub years: Vec<i32>,
    /// One entry per platform present, each with a count for every year.
    pub series: Vec<(String, Vec<usize>)>,
}

/// Pivot the (year, platform) counts into one series per platform, filling
/// missing years with zero. Platforms keep `platform_order`.
pub fn pivot_year_platform(rows: &[YearPlatformCount], platform_order: &[String]) -> StackedSeries {
    let mut years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    years.dedup();

    let year_idx: HashMap<i32, usize> = years.iter().enumerate().map(|(i, y)| (*y, i)).collect();

    let mut by_platform: HashMap<&str, Vec<usize>> = HashMap::new();
    for row in rows {
        let counts = by_platform
            .entry(row.platform.as_str())
            .or_insert_with(|| vec![0; years.len()]);
        counts[year_idx[&row.year]] += row.count;
    }

    let series = platform_order
        .iter()
        .filter_map(|p| by_platform.remove(p.as_str()).map(|c| (p.clone(), c)))
        .collect();

    StackedSeries { years, series }
}
