//! Record views shown by the dashboard and the `table` command
//!
//! Donors and recipients share one table component; a view only decides
//! the title, which columns get priority styling, and where data comes from.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::errors::{PortalError, PortalResult};
use crate::supplier::{CsvSupplier, DataSupplier, HttpSupplier, SampleSupplier};
use crate::table::TableConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordView {
    Donors,
    Recipients,
}

impl RecordView {
    pub fn parse(view: &str) -> PortalResult<Self> {
        match view.trim().to_lowercase().as_str() {
            "donors" | "donor" => Ok(RecordView::Donors),
            "recipients" | "recipient" => Ok(RecordView::Recipients),
            other => Err(PortalError::InvalidInput(format!(
                "Unknown view: {}. Supported views: donors, recipients",
                other
            ))),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RecordView::Donors => "Donor Management",
            RecordView::Recipients => "Recipients",
        }
    }

    pub fn noun(&self) -> &'static str {
        match self {
            RecordView::Donors => "donor",
            RecordView::Recipients => "recipient",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            RecordView::Donors => "/api/donors",
            RecordView::Recipients => "/api/recipients",
        }
    }

    /// Key of the record list in a wrapped HTTP response
    pub fn rows_key(&self) -> &'static str {
        match self {
            RecordView::Donors => "donors",
            RecordView::Recipients => "recipients",
        }
    }

    pub fn table_config(&self) -> TableConfig {
        match self {
            RecordView::Donors => TableConfig::new("Donor Details"),
            RecordView::Recipients => {
                TableConfig::new("Recipients Details").with_priority_column("priority")
            }
        }
    }

    pub fn sample_supplier(&self) -> SampleSupplier {
        match self {
            RecordView::Donors => SampleSupplier::donors(),
            RecordView::Recipients => SampleSupplier::recipients(),
        }
    }
}

/// Where a view's fields and records come from
#[derive(Debug, Clone, PartialEq)]
pub enum SupplierSource {
    Sample,
    Http { endpoint: Option<String> },
    Csv { path: PathBuf },
}

impl SupplierSource {
    pub fn parse(source: &str, endpoint: Option<&str>, csv: Option<&str>) -> PortalResult<Self> {
        match source.trim().to_lowercase().as_str() {
            "sample" => Ok(SupplierSource::Sample),
            "http" | "api" => Ok(SupplierSource::Http {
                endpoint: endpoint.map(str::to_string),
            }),
            "csv" => csv
                .map(|path| SupplierSource::Csv { path: PathBuf::from(path) })
                .ok_or_else(|| PortalError::InvalidInput("CSV source requires --csv <PATH>".to_string())),
            other => Err(PortalError::InvalidInput(format!(
                "Unsupported source: {}. Supported sources: sample, http, csv",
                other
            ))),
        }
    }
}

pub fn build_supplier(
    config: &Config,
    view: RecordView,
    source: &SupplierSource,
) -> PortalResult<Arc<dyn DataSupplier>> {
    let supplier: Arc<dyn DataSupplier> = match source {
        SupplierSource::Sample => Arc::new(view.sample_supplier()),
        SupplierSource::Http { endpoint } => {
            let endpoint = endpoint.as_deref().unwrap_or(view.default_endpoint());
            Arc::new(HttpSupplier::new(config, endpoint)?.with_rows_key(view.rows_key()))
        }
        SupplierSource::Csv { path } => Arc::new(CsvSupplier::new(path)),
    };
    Ok(supplier)
}
