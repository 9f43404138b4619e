use std::sync::Arc;

use dreammap_auth::{Hs256TokenService, TokenService};
use dreammap_infra::{Geocoder, InMemoryStore, Store};

/// Shared, explicitly constructed services handed to every handler.
///
/// Built once at startup (see `main.rs`); the store is closed at shutdown.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn Store>,
    pub geocoder: Arc<dyn Geocoder>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn Store>,
        geocoder: Arc<dyn Geocoder>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            store,
            geocoder,
            tokens,
        }
    }

    /// In-memory store plus HS256 tokens keyed by `jwt_secret`.
    pub fn in_memory(jwt_secret: &str, geocoder: Arc<dyn Geocoder>) -> Self {
        Self::new(
            Arc::new(InMemoryStore::new()),
            geocoder,
            Arc::new(Hs256TokenService::new(jwt_secret)),
        )
    }
}
