use std::sync::Arc;

use crate::config::Config;
use crate::layout::FontPair;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Plain/bold pairing used for every layout. Read-only once loaded.
    pub fonts: Arc<FontPair>,
}

impl AppState {
    pub fn new(config: Config, fonts: FontPair) -> Self {
        AppState {
            config,
            fonts: Arc::new(fonts),
        }
    }
}
