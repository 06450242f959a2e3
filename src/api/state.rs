use std::sync::Arc;

use crate::{db::DataStore, services::Repository};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Repository>,
}

impl AppState {
    /// Creates state over `store`, serving lists of `top_n` articles
    pub fn new(store: Arc<dyn DataStore>, top_n: usize) -> Self {
        Self {
            repository: Arc::new(Repository::new(store, top_n)),
        }
    }
}
