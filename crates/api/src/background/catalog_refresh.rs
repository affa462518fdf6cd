//! Periodic catalog reload.
//!
//! Re-reads the record source every `CATALOG_TTL_SECS` and swaps in a fresh
//! [`Explorer`]. A failed reload keeps serving the previous catalog.

use std::time::Duration;

use serde::Serialize;
use solidarity_core::explorer::Explorer;
use solidarity_store::StoreError;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Outcome of one successful reload.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReloadSummary {
    pub generation: u64,
    pub previous_generation: Option<u64>,
    pub actions: usize,
    pub skipped_fields: usize,
}

/// Fetch the record set, build a new explorer and install it.
pub async fn reload(state: &AppState) -> Result<ReloadSummary, StoreError> {
    let catalog = solidarity_store::load_catalog(state.source.as_ref()).await?;
    let explorer = Explorer::new(catalog);

    let generation = explorer.generation();
    let actions = explorer.catalog().len();
    let skipped_fields = explorer.index().skipped_fields().len();
    let previous_generation = state.catalog.replace(explorer);

    tracing::info!(
        generation,
        previous_generation = ?previous_generation,
        actions,
        skipped_fields,
        "Catalog loaded"
    );

    Ok(ReloadSummary {
        generation,
        previous_generation,
        actions,
        skipped_fields,
    })
}

/// Run the catalog refresh loop until `cancel` is triggered.
///
/// The first reload happens one period after start; the initial load is the
/// caller's job.
pub async fn run(state: AppState, cancel: CancellationToken) {
    let period = Duration::from_secs(state.config.catalog_ttl_secs);

    tracing::info!(
        ttl_secs = period.as_secs(),
        source = %state.source.describe(),
        "Catalog refresh job started"
    );

    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Catalog refresh job stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = reload(&state).await {
                    tracing::warn!(error = %e, "Catalog refresh failed, keeping previous catalog");
                }
            }
        }
    }
}
