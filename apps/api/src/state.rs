use std::sync::Arc;

use tera::Tera;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::profile::store::ProfileStore;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Authoritative profile documents (Postgres in production).
    pub profiles: Arc<dyn ProfileStore>,
    /// Session cookie → active profile id (Redis in production).
    pub sessions: Arc<dyn SessionStore>,
    pub llm: Arc<dyn TextGenerator>,
    pub templates: Arc<Tera>,
    pub config: Config,
}
