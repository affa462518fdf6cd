//! Record store access: loading actions and facet values into a catalog.

pub mod error;
pub mod record_set;
pub mod source;

pub use error::StoreError;
pub use record_set::RecordSet;
pub use source::{JsonSnapshotSource, RecordSource, StaticSource};

use solidarity_core::catalog::Catalog;

/// Fetch a record set from `source` and build a catalog from it.
///
/// Fails with [`StoreError::Validation`] when no action survives
/// validation, so a broken export never replaces a live catalog.
pub async fn load_catalog(source: &dyn RecordSource) -> Result<Catalog, StoreError> {
    let records = source.fetch().await?;
    let received = records.actions.len();
    let catalog = records.into_catalog();
    if catalog.is_empty() {
        return Err(StoreError::Validation(format!(
            "none of the {received} actions from {} passed validation",
            source.describe()
        )));
    }
    Ok(catalog)
}
