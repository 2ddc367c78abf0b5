use crate::source::models::{OutcomeSequence, RawRounds};
use crate::source::{validate_outcomes, OutcomeSource, SourceError};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Reads round history from a local export.
///
/// JSON files hold either an array of numbers or an array of round records.
/// Anything else is read as plain text, one multiplier per line, with blank
/// lines and `#` comments skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
    /// Set when the export lists the latest round first
    pub newest_first: bool,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, newest_first: bool) -> Self {
        Self {
            path: path.into(),
            newest_first,
        }
    }

    fn parse(&self, content: &str) -> Result<Vec<f64>, SourceError> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('[') {
            let raw: RawRounds = serde_json::from_str(trimmed)
                .map_err(|e| SourceError::NoData(format!("malformed JSON: {}", e)))?;
            return Ok(raw.into_values());
        }

        let mut values = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let value = line.parse::<f64>().map_err(|e| {
                SourceError::NoData(format!("line {}: {:?} is not a number ({})", line_no + 1, line, e))
            })?;
            values.push(value);
        }
        Ok(values)
    }
}

impl OutcomeSource for FileSource {
    fn load(&self) -> Result<OutcomeSequence, SourceError> {
        info!("Loading rounds from {}", self.path.display());
        let content = fs::read_to_string(&self.path)?;

        let mut values = self.parse(&content)?;
        if self.newest_first {
            values.reverse();
        }
        debug!("Parsed {} rounds", values.len());

        validate_outcomes(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_json_number_array() {
        let file = write_temp("[1.00, 1.02, 3.5]");
        let seq = FileSource::new(file.path(), false).load().unwrap();
        assert_eq!(seq.as_slice(), &[1.00, 1.02, 3.5]);
    }

    #[test]
    fn loads_json_records_with_alias() {
        let file = write_temp(r#"[{"crash_point": 2.0, "round_id": 7}, {"multiplier": 1.05}]"#);
        let seq = FileSource::new(file.path(), false).load().unwrap();
        assert_eq!(seq.as_slice(), &[2.0, 1.05]);
    }

    #[test]
    fn loads_plain_text_and_reverses_newest_first() {
        let file = write_temp("# newest first\n3.0\n\n1.01\n1.00\n");
        let seq = FileSource::new(file.path(), true).load().unwrap();
        assert_eq!(seq.as_slice(), &[1.00, 1.01, 3.0]);
    }

    #[test]
    fn malformed_data_is_no_data() {
        let file = write_temp("1.0\nabc\n");
        let err = FileSource::new(file.path(), false).load().unwrap_err();
        assert!(matches!(err, SourceError::NoData(_)));

        let file = write_temp("[1.0, ");
        let err = FileSource::new(file.path(), false).load().unwrap_err();
        assert!(matches!(err, SourceError::NoData(_)));
    }

    #[test]
    fn empty_or_out_of_domain_is_no_data() {
        let empty = write_temp("\n# nothing\n");
        assert!(matches!(
            FileSource::new(empty.path(), false).load(),
            Err(SourceError::NoData(_))
        ));

        let below_one = write_temp("[1.5, 0.5]");
        assert!(matches!(
            FileSource::new(below_one.path(), false).load(),
            Err(SourceError::NoData(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FileSource::new("/nonexistent/rounds.json", false).load().unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
