// ============================================================
// Layer 4 — Delimited Sensor File Loader
// ============================================================
// Reads a delimited text export (e.g. `t1.ASC`) into a
// SensorTable using the csv crate.
//
// File layout this loader expects:
//
//   <header line 1>            ┐
//   ...                        │ skip_header lines, ignored
//   <header line 8>            ┘
//   0.001 ; 1.2 ; 3.4 ; ...    ← data rows, one per time step
//   0.002 ; 1.3 ; 3.3 ; ...
//
// Parsing rules:
//   - everything from `#` to the end of a line is a comment
//   - fields are whitespace-trimmed
//   - blank lines (including comment-only lines) are skipped
//   - an empty or non-numeric field becomes NaN
//   - every data row must have the same number of fields
//
// Reference: csv crate documentation (ReaderBuilder)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use std::{fs, path::PathBuf};

use crate::domain::series::SensorTable;
use crate::domain::traits::TableSource;

/// Loads a delimited text file into memory.
/// Implements the TableSource trait from Layer 3.
pub struct DelimitedLoader {
    path:        PathBuf,
    delimiter:   u8,
    skip_header: usize,
}

impl DelimitedLoader {
    /// Create a loader with the defaults of the sensor export:
    /// `;` delimiter and 8 header lines.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path:        path.into(),
            delimiter:   b';',
            skip_header: 8,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_skip_header(mut self, lines: usize) -> Self {
        self.skip_header = lines;
        self
    }

    /// Parse already-read file contents. Split out from `load` so the
    /// parsing rules can be tested without touching the filesystem.
    pub fn parse(&self, contents: &str) -> Result<SensorTable> {
        // Drop the header block and comments before the csv reader sees anything
        let body = contents
            .lines()
            .skip(self.skip_header)
            .map(strip_comment)
            .collect::<Vec<_>>()
            .join("\n");

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(body.as_bytes());

        let mut rows: Vec<Vec<f32>> = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.with_context(|| {
                format!("Malformed record {} in '{}'", i + 1, self.path.display())
            })?;
            rows.push(record.iter().map(parse_field).collect());
        }

        let table = SensorTable::from_rows(rows)
            .with_context(|| format!("Inconsistent row width in '{}'", self.path.display()))?;

        let nan_count = table.values().iter().filter(|v| v.is_nan()).count();
        if nan_count > 0 {
            tracing::warn!(
                "{} fields in '{}' were empty or non-numeric and read as NaN",
                nan_count,
                self.path.display()
            );
        }

        Ok(table)
    }
}

impl TableSource for DelimitedLoader {
    fn load(&self) -> Result<SensorTable> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read sensor file '{}'", self.path.display()))?;

        let table = self.parse(&contents)?;
        tracing::info!(
            "Loaded '{}': {} rows × {} columns",
            self.path.display(),
            table.rows(),
            table.cols()
        );
        Ok(table)
    }
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(data, _)| data)
}

/// Numeric field → f32; anything unparsable becomes NaN.
fn parse_field(field: &str) -> f32 {
    field.parse::<f32>().unwrap_or(f32::NAN)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "h1\nh2\nh3\nh4\nh5\nh6\nh7\nh8\n";

    #[test]
    fn test_skips_header_and_trims() {
        let text = format!("{HEADER}  1.5 ; 2 ;3\n4;  5.25 ; 6 \n");
        let t = DelimitedLoader::new("mem").parse(&text).unwrap();
        assert_eq!(t.shape(), (2, 3));
        assert_eq!(t.row(0), &[1.5, 2.0, 3.0]);
        assert_eq!(t.row(1), &[4.0, 5.25, 6.0]);
    }

    #[test]
    fn test_non_numeric_becomes_nan() {
        let text = format!("{HEADER}1;abc;\n");
        let t = DelimitedLoader::new("mem").parse(&text).unwrap();
        assert_eq!(t.cols(), 3);
        assert_eq!(t.row(0)[0], 1.0);
        assert!(t.row(0)[1].is_nan());
        assert!(t.row(0)[2].is_nan());
    }

    #[test]
    fn test_comments_are_stripped() {
        let text = format!("{HEADER}1;2 # calibrated\n# sensor restart\n3;4\n");
        let t = DelimitedLoader::new("mem").parse(&text).unwrap();
        assert_eq!(t.shape(), (2, 2));
        assert_eq!(t.row(0), &[1.0, 2.0]);
        assert_eq!(t.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn test_ragged_rows_are_an_error() {
        let text = format!("{HEADER}1;2;3\n4;5\n");
        assert!(DelimitedLoader::new("mem").parse(&text).is_err());
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = format!("{HEADER}1;2\n\n3;4\n");
        let t = DelimitedLoader::new("mem").parse(&text).unwrap();
        assert_eq!(t.rows(), 2);
    }

    #[test]
    fn test_custom_delimiter_and_header() {
        let text = "only header\n1,2\n3,4\n";
        let t = DelimitedLoader::new("mem")
            .with_delimiter(b',')
            .with_skip_header(1)
            .parse(text)
            .unwrap();
        assert_eq!(t.shape(), (2, 2));
        assert_eq!(t.column(1), vec![2.0, 4.0]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{HEADER}0;1;2\n3;4;5\n").unwrap();

        let t = DelimitedLoader::new(file.path()).load().unwrap();
        assert_eq!(t.shape(), (2, 3));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let loader = DelimitedLoader::new("/definitely/not/here.ASC");
        assert!(loader.load().is_err());
    }
}
