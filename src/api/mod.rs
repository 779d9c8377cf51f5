//! api
//!
//! HTTP surface for the editorial client.
//!
//! # Routes
//!
//! - `POST   /api/articles`        - create an article
//! - `GET    /api/articles`        - list article slugs
//! - `GET    /api/articles/{slug}` - fetch raw markdown
//! - `PUT    /api/articles/{slug}` - update (optionally rename) an article
//! - `DELETE /api/articles/{slug}` - delete an article
//! - `GET    /health`              - liveness probe
//!
//! Handlers hold the store as `dyn ContentStore`; which backend serves a
//! request was decided once at startup.

pub mod articles;
pub mod error;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::config::Config;
use crate::store::ContentStore;

pub use error::{ApiError, ErrorBody};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// The configured persistence backend.
    pub store: Arc<dyn ContentStore>,
    /// Local directory the read endpoints serve from.
    pub content_dir: String,
    /// Whether error responses may carry internal detail.
    pub expose_error_detail: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, config: &Config) -> Self {
        Self {
            store,
            content_dir: config.content_dir.clone(),
            expose_error_detail: config.expose_error_detail(),
        }
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/api/articles/:slug",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .with_state(state)
}
