use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::DataSupplier;
use crate::errors::PortalResult;
use crate::models::{FieldDescriptor, Record};

/// Reads an exported CSV file; the header row names the fields
#[derive(Debug, Clone)]
pub struct CsvSupplier {
    path: PathBuf,
    name: String,
}

impl CsvSupplier {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    fn reader(&self) -> PortalResult<::csv::Reader<std::fs::File>> {
        Ok(::csv::ReaderBuilder::new()
            .flexible(true)
            .trim(::csv::Trim::All)
            .from_path(&self.path)?)
    }
}

#[async_trait]
impl DataSupplier for CsvSupplier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_fields(&self) -> PortalResult<Vec<FieldDescriptor>> {
        let mut reader = self.reader()?;
        Ok(reader
            .headers()?
            .iter()
            .map(|header| FieldDescriptor::new(header, header))
            .collect())
    }

    async fn fetch_rows(&self) -> PortalResult<Vec<Record>> {
        let mut reader = self.reader()?;
        let headers = reader.headers()?.clone();

        let mut rows: Vec<Record> = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect(),
            );
        }
        Ok(rows)
    }
}
