use std::sync::Arc;

use pia_aggregate::translate::Translator;
use pia_service::{AssessmentManager, RevisionService};
use pia_storage::PiaStore;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<AssessmentManager<dyn PiaStore>>,
    pub revisions: Arc<RevisionService<dyn PiaStore>>,
}

impl AppState {
    pub fn new(store: Arc<dyn PiaStore>, translator: Arc<dyn Translator>) -> Self {
        let manager = Arc::new(AssessmentManager::new(store, translator));
        Self {
            revisions: Arc::new(RevisionService::new(Arc::clone(&manager))),
            manager,
        }
    }
}
