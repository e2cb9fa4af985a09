use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::tailoring::pipeline::TailoringPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Collaborators are constructed once at startup and injected here — no
/// module-level singletons.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TailoringPipeline>,
    pub auth: Arc<dyn TokenVerifier>,
    #[allow(dead_code)]
    pub config: Config,
}
