use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelInvoker;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide model capability. Stateless per call, so shared without locking.
    pub model: Arc<dyn ModelInvoker>,
    pub config: Config,
}
