use std::sync::Arc;

use service::auth::AuthService;
use service::storage::Storage;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Storage>,
    pub auth: AuthService<dyn Storage>,
}

impl AppState {
    pub fn new(store: Arc<dyn Storage>, auth_cfg: service::auth::AuthConfig) -> Self {
        let auth = AuthService::new(store.clone(), auth_cfg);
        Self { store, auth }
    }
}
