use std::sync::Arc;

use vodlink_metadata::resolve::Resolver;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
}
