use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{Dataset, GameRecord};

/// Columns every input file must provide, in the order rows are decoded.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "platform",
    "genre",
    "year_of_release",
    "user_score",
    "critic_score",
    "rating_numeric",
];

/// Cell contents treated as "no value" in numeric columns.
const PLACEHOLDERS: [&str; 6] = ["tbd", "nan", "na", "n/a", "null", "none"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a games table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-separated with a header row
/// * `.tsv`          – tab-separated with a header row
/// * `.json`         – `[{ "platform": "PC", "genre": "RPG", ... }, ...]`
/// * `.parquet`      – one column per field, any castable Arrow type
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let undated = dataset
        .records()
        .iter()
        .filter(|r| r.year_of_release.is_none())
        .count();
    if undated > 0 {
        log::warn!("{undated} records have no release year and will never match a year filter");
    }
    log::info!(
        "Loaded {} games ({} platforms, {} genres) from {}",
        dataset.len(),
        dataset.platforms().len(),
        dataset.genres().len(),
        path.display()
    );

    Ok(dataset)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names; extra columns are ignored.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(open(path)?);

    let headers = reader.headers()?.clone();
    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        let cells = indices.map(|i| row.get(i));
        records.push(parse_record(row_no + 1, cells)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;

    let rows = root.as_array().ok_or(LoadError::MalformedRow {
        row: 0,
        message: "expected a top-level JSON array".to_string(),
    })?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| LoadError::MalformedRow {
            row: row_no + 1,
            message: "not a JSON object".to_string(),
        })?;

        let mut owned: [Option<String>; REQUIRED_COLUMNS.len()] = Default::default();
        for (slot, name) in owned.iter_mut().zip(REQUIRED_COLUMNS) {
            let value = obj
                .get(name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
            *slot = json_cell(value);
        }

        let cells = owned.each_ref().map(|c| c.as_deref());
        records.push(parse_record(row_no + 1, cells)?);
    }

    Ok(Dataset::from_records(records))
}

fn json_cell(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Every required column is cast to UTF-8 so all formats share one parser.
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;

    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    {
        let schema = builder.schema();
        for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name.to_string()))?;
        }
    }

    let reader = builder.build()?;
    let mut records = Vec::new();
    let mut row_offset = 0;

    for batch in reader {
        let batch = batch?;
        let columns: Vec<ArrayRef> = indices
            .iter()
            .map(|&i| cast(batch.column(i).as_ref(), &DataType::Utf8))
            .collect::<Result<_, _>>()?;

        for row in 0..batch.num_rows() {
            let mut cells = [None; REQUIRED_COLUMNS.len()];
            for (cell, col) in cells.iter_mut().zip(&columns) {
                let strings = col.as_string::<i32>();
                if !strings.is_null(row) {
                    *cell = Some(strings.value(row));
                }
            }
            records.push(parse_record(row_offset + row + 1, cells)?);
        }
        row_offset += batch.num_rows();
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Cell parsing shared by all formats
// ---------------------------------------------------------------------------

/// `cells` follows [`REQUIRED_COLUMNS`] order; `row` is the 1-based data row.
fn parse_record(row: usize, cells: [Option<&str>; 6]) -> Result<GameRecord, LoadError> {
    let [platform, genre, year, user, critic, rating] = cells;
    Ok(GameRecord {
        platform: platform.unwrap_or("").trim().to_string(),
        genre: genre.unwrap_or("").trim().to_string(),
        year_of_release: parse_year(row, year)?,
        user_score: parse_number(row, "user_score", user)?,
        critic_score: parse_number(row, "critic_score", critic)?,
        rating_numeric: parse_number(row, "rating_numeric", rating)?,
    })
}

fn is_placeholder(s: &str) -> bool {
    s.is_empty() || PLACEHOLDERS.iter().any(|p| s.eq_ignore_ascii_case(p))
}

fn parse_number(row: usize, column: &str, cell: Option<&str>) -> Result<Option<f64>, LoadError> {
    let Some(text) = cell.map(str::trim) else {
        return Ok(None);
    };
    if is_placeholder(text) {
        return Ok(None);
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(LoadError::invalid(row, column, text)),
    }
}

/// Accepts `2010` and `2010.0`; rejects fractional years.
fn parse_year(row: usize, cell: Option<&str>) -> Result<Option<i32>, LoadError> {
    let column = "year_of_release";
    let Some(value) = parse_number(row, column, cell)? else {
        return Ok(None);
    };
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(LoadError::invalid(row, column, cell.unwrap_or("").trim()));
    }
    Ok(Some(value as i32))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::tempdir;

    use super::*;

    const HEADER: &str = "name,platform,genre,year_of_release,user_score,critic_score,rating_numeric";

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_and_ignores_extra_columns() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "games.csv",
            &format!("{HEADER}\nFoo,PC,RPG,2010,8.0,85,3\nBar,PS4,Action,2015.0,6.0,70,4\n"),
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.records()[0],
            GameRecord::new("PC", "RPG", 2010)
                .with_scores(8.0, 85.0)
                .with_rating(3.0)
        );
        assert_eq!(ds.records()[1].year_of_release, Some(2015));
        assert_eq!(ds.platforms(), ["PC", "PS4"]);
    }

    #[test]
    fn placeholders_become_missing_values() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "games.csv",
            &format!("{HEADER}\nFoo,PC,RPG,,tbd,,NaN\n"),
        );

        let ds = load_file(&path).unwrap();
        let rec = &ds.records()[0];
        assert_eq!(rec.year_of_release, None);
        assert_eq!(rec.user_score, None);
        assert_eq!(rec.critic_score, None);
        assert_eq!(rec.rating_numeric, None);
    }

    #[test]
    fn garbage_in_numeric_column_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "games.csv",
            &format!("{HEADER}\nFoo,PC,RPG,2010,great,85,3\n"),
        );

        match load_file(&path) {
            Err(LoadError::InvalidValue { row, column, value }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "user_score");
                assert_eq!(value, "great");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn error_rows_count_data_rows_from_one() {
        let dir = tempdir().unwrap();
        let csv_path = write_file(
            dir.path(),
            "games.csv",
            &format!("{HEADER}\nFoo,PC,RPG,2010,8,85,3\nBar,PC,RPG,2011,8,oops,3\n"),
        );
        assert!(matches!(
            load_file(&csv_path),
            Err(LoadError::InvalidValue { row: 2, .. })
        ));

        let json_path = write_file(
            dir.path(),
            "games.json",
            r#"[{"platform": "PC", "genre": "RPG", "year_of_release": "later",
                 "user_score": null, "critic_score": null, "rating_numeric": null}]"#,
        );
        assert!(matches!(
            load_file(&json_path),
            Err(LoadError::InvalidValue { row: 1, .. })
        ));
    }

    #[test]
    fn fractional_year_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "games.csv",
            &format!("{HEADER}\nFoo,PC,RPG,2010.5,8,85,3\n"),
        );
        assert!(matches!(
            load_file(&path),
            Err(LoadError::InvalidValue { ref column, .. }) if column == "year_of_release"
        ));
    }

    #[test]
    fn missing_column_is_fatal() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "games.csv",
            "platform,genre,year_of_release,user_score,critic_score\nPC,RPG,2010,8,85\n",
        );
        assert!(matches!(
            load_file(&path),
            Err(LoadError::MissingColumn(ref c)) if c == "rating_numeric"
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        assert!(matches!(load_file(&path), Err(LoadError::Io { .. })));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "games.xlsx", "");
        assert!(matches!(
            load_file(&path),
            Err(LoadError::UnsupportedExtension(ref e)) if e == "xlsx"
        ));
    }

    #[test]
    fn loads_tab_separated_file() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "games.tsv",
            "platform\tgenre\tyear_of_release\tuser_score\tcritic_score\trating_numeric\n\
             Wii\tSports\t2006\t8.0\t76\t1\n",
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records()[0].platform, "Wii");
        assert_eq!(ds.records()[0].critic_score, Some(76.0));
    }

    #[test]
    fn loads_records_oriented_json() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "games.json",
            r#"[
                {"platform": "PC", "genre": "RPG", "year_of_release": 2010.0,
                 "user_score": "tbd", "critic_score": 85, "rating_numeric": null},
                {"platform": "DS", "genre": "Puzzle", "year_of_release": 2008,
                 "user_score": 7.5, "critic_score": null, "rating_numeric": 1}
            ]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].year_of_release, Some(2010));
        assert_eq!(ds.records()[0].user_score, None);
        assert_eq!(ds.records()[0].critic_score, Some(85.0));
        assert_eq!(ds.records()[1].user_score, Some(7.5));
        assert_eq!(ds.records()[1].rating_numeric, Some(1.0));
    }

    #[test]
    fn json_row_without_required_key_is_fatal() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "games.json",
            r#"[{"platform": "PC", "genre": "RPG"}]"#,
        );
        assert!(matches!(
            load_file(&path),
            Err(LoadError::MissingColumn(ref c)) if c == "year_of_release"
        ));
    }

    #[test]
    fn loads_parquet_with_numeric_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("games.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("platform", DataType::Utf8, false),
            Field::new("genre", DataType::Utf8, false),
            Field::new("year_of_release", DataType::Int64, true),
            Field::new("user_score", DataType::Float64, true),
            Field::new("critic_score", DataType::Float64, true),
            Field::new("rating_numeric", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["PC", "PS4"])),
                Arc::new(StringArray::from(vec!["RPG", "Action"])),
                Arc::new(Int64Array::from(vec![Some(2010), None])),
                Arc::new(Float64Array::from(vec![Some(8.0), None])),
                Arc::new(Float64Array::from(vec![Some(85.0), Some(70.0)])),
                Arc::new(Float64Array::from(vec![Some(3.0), Some(4.0)])),
            ],
        )
        .unwrap();

        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.records()[0],
            GameRecord::new("PC", "RPG", 2010)
                .with_scores(8.0, 85.0)
                .with_rating(3.0)
        );
        assert_eq!(ds.records()[1].year_of_release, None);
        assert_eq!(ds.records()[1].user_score, None);
        assert_eq!(ds.records()[1].critic_score, Some(70.0));
    }
}
