//! Application state shared across handlers.

use std::sync::Arc;

use tracker_core::service::{PageService, SessionService};
use tracker_core::{PageVisitStore, SessionStore};
use tracker_identity::IdentityProvider;

/// Shared application state: the two services plus the identity seam.
///
/// Constructed once at startup and cloned into handlers; there are no
/// module-level singletons anywhere in the tree.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionService,
    pub pages: PageService,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        session_store: Arc<dyn SessionStore>,
        page_store: Arc<dyn PageVisitStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            sessions: SessionService::new(session_store, page_store.clone()),
            pages: PageService::new(page_store),
            identity,
        }
    }
}
