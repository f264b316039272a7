use std::sync::Arc;

use crate::models::Catalog;
use crate::services::Scorer;

/// Shared application state
///
/// Catalog and scorer are built once at startup and only ever read
/// afterwards, so requests share them through plain `Arc`s with no locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub scorer: Arc<dyn Scorer>,
}

impl AppState {
    /// Creates the application state from a loaded catalog and strategy
    pub fn new(catalog: Catalog, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            scorer,
        }
    }
}
