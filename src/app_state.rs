use std::sync::Arc;

use crate::db::RecordStore;
use crate::services::fal::ImageGenerator;
use crate::services::tryon::TryOnService;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub tryon: Arc<TryOnService>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, generator: Arc<dyn ImageGenerator>) -> Self {
        let tryon = TryOnService::new(store.clone(), generator);
        Self {
            store,
            tryon: Arc::new(tryon),
        }
    }
}
