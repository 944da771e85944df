//! CSV instrument universe adapter.
//!
//! Reads a listing file with `code,name,aum` rows. File-level problems are
//! fatal universe failures; a bad cell in one row flows through as a
//! malformed entry for the selection stage to skip and record.

use crate::domain::error::EtfRankError;
use crate::domain::instrument::UniverseEntry;
use crate::ports::universe_port::UniversePort;
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;

pub struct CsvUniverseAdapter {
    path: PathBuf,
}

impl CsvUniverseAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl UniversePort for CsvUniverseAdapter {
    async fn fetch_entries(&self) -> Result<Vec<UniverseEntry>, EtfRankError> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| EtfRankError::UniverseUnavailable {
                reason: format!("failed to read {}: {}", self.path.display(), e),
            })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut entries = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| EtfRankError::UniverseUnavailable {
                reason: format!("CSV parse error: {}", e),
            })?;

            let code = record.get(0).unwrap_or("").to_string();
            let name = record.get(1).unwrap_or("").to_string();
            let aum: f64 = record
                .get(2)
                .and_then(|v| v.parse().ok())
                .unwrap_or(f64::NAN);

            entries.push(UniverseEntry { code, name, aum });
        }

        Ok(entries)
    }
}
