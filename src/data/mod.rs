/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<GameRecord>, distinct platforms / genres
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Selection predicate → filtered records
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  summary + chart tables
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use aggregate::{compute, DashboardOutput, GenreRating, ScorePoint, Summary, YearPlatformCount};
pub use error::LoadError;
pub use filter::{Selection, YearRange};
pub use loader::load_file;
pub use model::{Dataset, GameRecord};
