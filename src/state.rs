use crate::config::Config;
use axum::extract::FromRef;
use sqlx::PgPool;

/// Shared application state, constructed once at startup and injected into
/// every handler. The pool is the single persistence client; no module-level
/// globals.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
