//! Data suppliers for the record table
//!
//! A supplier furnishes the field list and the records for one view. The
//! dashboard ships with sample data; HTTP and CSV suppliers cover the same
//! contract against a live portal or an exported file.

use async_trait::async_trait;
use tracing::info;

use crate::errors::PortalResult;
use crate::models::{FieldDescriptor, Record};

pub mod csv;
pub mod http;
pub mod sample;

pub use self::csv::CsvSupplier;
pub use self::http::HttpSupplier;
pub use self::sample::SampleSupplier;

#[async_trait]
pub trait DataSupplier: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Ordered column descriptors
    async fn fetch_fields(&self) -> PortalResult<Vec<FieldDescriptor>>;

    /// Flat records to display
    async fn fetch_rows(&self) -> PortalResult<Vec<Record>>;
}

/// Fetch fields, then rows, from `supplier`
pub async fn load(supplier: &dyn DataSupplier) -> PortalResult<(Vec<FieldDescriptor>, Vec<Record>)> {
    let fields = supplier.fetch_fields().await?;
    let rows = supplier.fetch_rows().await?;
    info!(
        "Loaded {} fields and {} rows from {}",
        fields.len(),
        rows.len(),
        supplier.name()
    );
    Ok((fields, rows))
}
