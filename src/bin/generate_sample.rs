//! Writes a synthetic games table as `games.csv` and `games.parquet`.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Game {
    name: String,
    platform: &'static str,
    genre: &'static str,
    year: i64,
    user_score: Option<f64>,
    critic_score: Option<f64>,
    rating: Option<f64>,
}

/// (platform, first year, last year)
const PLATFORMS: [(&str, i64, i64); 8] = [
    ("PS2", 2000, 2011),
    ("XB", 2001, 2008),
    ("DS", 2004, 2013),
    ("Wii", 2006, 2015),
    ("X360", 2005, 2016),
    ("PS3", 2006, 2016),
    ("PC", 2000, 2022),
    ("PS4", 2013, 2022),
];

const GENRES: [&str; 8] = [
    "Action", "Sports", "Shooter", "Role-Playing", "Racing", "Platform", "Puzzle", "Strategy",
];

/// E, E10+, T, M
const RATINGS: [f64; 4] = [1.0, 2.0, 3.0, 4.0];

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<Game> {
    let platform_names: Vec<&str> = PLATFORMS.iter().map(|p| p.0).collect();
    (0..n)
        .map(|i| {
            let platform = rng.pick(&platform_names);
            let (_, first, last) = PLATFORMS
                .iter()
                .find(|p| p.0 == platform)
                .copied()
                .unwrap_or(PLATFORMS[0]);
            let year = first + (rng.next_u64() % (last - first + 1) as u64) as i64;

            let critic = rng.gauss(70.0, 12.0).clamp(20.0, 98.0).round();
            let user = (critic / 10.0 + rng.gauss(0.0, 0.8)).clamp(0.5, 9.7);
            let user = (user * 10.0).round() / 10.0;

            Game {
                name: format!("Game {i:04}"),
                platform,
                genre: rng.pick(&GENRES),
                year,
                user_score: (rng.next_f64() > 0.12).then_some(user),
                critic_score: (rng.next_f64() > 0.2).then_some(critic),
                rating: (rng.next_f64() > 0.15)
                    .then(|| RATINGS[(rng.next_u64() % RATINGS.len() as u64) as usize]),
            }
        })
        .collect()
}

/// Missing user scores are written as `tbd`, like the published data.
fn write_csv(games: &[Game], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "name",
        "platform",
        "year_of_release",
        "genre",
        "user_score",
        "critic_score",
        "rating_numeric",
    ])?;

    let opt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    for g in games {
        writer.write_record([
            g.name.clone(),
            g.platform.to_string(),
            g.year.to_string(),
            g.genre.to_string(),
            g.user_score.map(|x| x.to_string()).unwrap_or_else(|| "tbd".to_string()),
            opt(g.critic_score),
            opt(g.rating),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(games: &[Game], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("platform", DataType::Utf8, false),
        Field::new("genre", DataType::Utf8, false),
        Field::new("year_of_release", DataType::Int64, false),
        Field::new("user_score", DataType::Float64, true),
        Field::new("critic_score", DataType::Float64, true),
        Field::new("rating_numeric", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(games.iter().map(|g| g.name.as_str()))),
            Arc::new(StringArray::from_iter_values(games.iter().map(|g| g.platform))),
            Arc::new(StringArray::from_iter_values(games.iter().map(|g| g.genre))),
            Arc::new(Int64Array::from_iter_values(games.iter().map(|g| g.year))),
            Arc::new(Float64Array::from_iter(games.iter().map(|g| g.user_score))),
            Arc::new(Float64Array::from_iter(games.iter().map(|g| g.critic_score))),
            Arc::new(Float64Array::from_iter(games.iter().map(|g| g.rating))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let games = generate(&mut rng, 2000);

    write_csv(&games, "games.csv")?;
    write_parquet(&games, "games.parquet")?;

    log::info!("Wrote {} games to games.csv and games.parquet", games.len());
    println!("Wrote {} games to games.csv and games.parquet", games.len());
    Ok(())
}
