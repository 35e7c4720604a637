use super::{Record, RecordValue, Recorder};
use anyhow::{Context, Result};
use std::{fs::File, path::Path};

/// Writes selected values of records as rows of a CSV file.
///
/// The header is the list of keys given on construction. A key missing from
/// a record leaves its cell empty.
pub struct CsvRecorder {
    keys: Vec<String>,
    wtr: csv::Writer<File>,
}

impl CsvRecorder {
    /// Creates the file at `path` and writes the header.
    pub fn new<K: AsRef<str>>(path: impl AsRef<Path>, keys: &[K]) -> Result<Self> {
        let path = path.as_ref();
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {:?}", path))?;
        let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        wtr.write_record(&keys)?;
        Ok(Self { keys, wtr })
    }
}

fn cell(value: Option<&RecordValue>) -> String {
    match value {
        None => String::new(),
        Some(RecordValue::Scalar(v)) => v.to_string(),
    }
}

impl Recorder for CsvRecorder {
    fn write(&mut self, record: Record) -> Result<()> {
        let row: Vec<String> = self.keys.iter().map(|k| cell(record.get(k))).collect();
        self.wtr.write_record(&row)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_csv_recorder() -> Result<()> {
        let dir = TempDir::new("csv_recorder")?;
        let path = dir.path().join("episodes.csv");
        let mut recorder = CsvRecorder::new(&path, &["episode", "reward"])?;

        recorder.write(Record::from_slice(&[
            ("episode", RecordValue::Scalar(1.0)),
            ("reward", RecordValue::Scalar(-21.0)),
        ]))?;
        recorder.write(Record::from_slice(&[("episode", RecordValue::Scalar(2.0))]))?;
        recorder.flush()?;

        let text = std::fs::read_to_string(&path)?;
        assert_eq!(text, "episode,reward\n1,-21\n2,\n");
        Ok(())
    }
}
