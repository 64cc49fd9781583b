use sqlx::PgPool;

use crate::matching::AiService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Model-backed operations. Wraps an `Arc<dyn TextGenerator>`.
    pub ai: AiService,
}
