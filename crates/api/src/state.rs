use std::sync::{Arc, PoisonError, RwLock};

use solidarity_core::explorer::Explorer;
use solidarity_store::RecordSource;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The catalog currently being served.
    pub catalog: Arc<CatalogHandle>,
    /// Where catalog reloads read from.
    pub source: Arc<dyn RecordSource>,
}

/// Swappable pointer to the current [`Explorer`].
///
/// Requests clone the inner `Arc` and work on that snapshot, so a reload
/// never changes the catalog under a request already in flight.
#[derive(Debug, Default)]
pub struct CatalogHandle {
    current: RwLock<Option<Arc<Explorer>>>,
}

impl CatalogHandle {
    pub fn new(explorer: Explorer) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(explorer))),
        }
    }

    /// A handle with nothing loaded; every read fails until [`replace`](Self::replace).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn current(&self) -> AppResult<Arc<Explorer>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(AppError::CatalogUnavailable)
    }

    pub fn generation(&self) -> Option<u64> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|explorer| explorer.generation())
    }

    /// Install `explorer`, returning the generation it replaced.
    pub fn replace(&self, explorer: Explorer) -> Option<u64> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current
            .replace(Arc::new(explorer))
            .map(|previous| previous.generation())
    }
}
