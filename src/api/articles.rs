//! api::articles
//!
//! Article CRUD handlers.
//!
//! Write handlers validate input (size ceiling, slug sanitization) before
//! anything touches the store, then delegate to the configured
//! `ContentStore`. Read handlers serve straight from the local content
//! directory, which in the hosted deployment is the checked-out site
//! content.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;
use crate::content::{
    article_path, create_message, delete_message, sanitize_slug, update_message,
    MAX_CONTENT_BYTES,
};
use crate::store::{ContentFile, StoreError};

/// Request body for creating an article.
#[derive(Debug, Deserialize)]
pub struct CreateArticle {
    pub slug: String,
    pub content: String,
}

/// Request body for updating an article. A differing `new_slug` moves the
/// article: the old path is deleted and the new one committed, as two
/// separate revisions.
#[derive(Debug, Deserialize)]
pub struct UpdateArticle {
    pub content: String,
    #[serde(default)]
    pub new_slug: Option<String>,
}

/// Response body for successful writes.
#[derive(Debug, Serialize)]
pub struct ArticleSaved {
    pub message: String,
    pub path: String,
}

/// Response body for deletions.
#[derive(Debug, Serialize)]
pub struct ArticleDeleted {
    pub message: String,
}

/// Response body for a single article read.
#[derive(Debug, Serialize)]
pub struct Article {
    pub slug: String,
    pub content: String,
}

/// Response body for the article listing.
#[derive(Debug, Serialize)]
pub struct ArticleList {
    pub slugs: Vec<String>,
    pub total: usize,
}

fn check_content(content: &str) -> Result<(), ApiError> {
    if content.is_empty() {
        return Err(ApiError::bad_request("Content gerekli."));
    }
    if content.len() > MAX_CONTENT_BYTES {
        return Err(ApiError::bad_request("Content çok büyük (max 1MB)."));
    }
    Ok(())
}

/// `POST /api/articles`
pub async fn create_article(
    State(state): State<AppState>,
    Json(request): Json<CreateArticle>,
) -> Result<Json<ArticleSaved>, ApiError> {
    check_content(&request.content)?;
    let slug = sanitize_slug(&request.slug)
        .map_err(|e| ApiError::from_slug(e, state.expose_error_detail))?;
    let path = article_path(&state.content_dir, &slug);

    state
        .store
        .commit(
            &[ContentFile::new(path.clone(), request.content)],
            &create_message(&slug),
        )
        .await
        .map_err(|e| ApiError::from_store(e, state.expose_error_detail))?;

    tracing::info!(slug = %slug, "article created");
    Ok(Json(ArticleSaved {
        message: "Makale başarıyla kaydedildi.".to_string(),
        path,
    }))
}

/// `PUT /api/articles/{slug}`
pub async fn update_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<UpdateArticle>,
) -> Result<Json<ArticleSaved>, ApiError> {
    check_content(&request.content)?;
    let old_slug = sanitize_slug(&slug)
        .map_err(|e| ApiError::from_slug(e, state.expose_error_detail))?;
    let target_slug = match &request.new_slug {
        Some(new) => sanitize_slug(new)
            .map_err(|e| ApiError::from_slug(e, state.expose_error_detail))?,
        None => old_slug.clone(),
    };

    // A changed slug is two independent revisions: remove the old path, then
    // commit the new one. A crash between them leaves the article absent
    // until the second call; the editorial client retries by saving again.
    if target_slug != old_slug {
        let old_path = article_path(&state.content_dir, &old_slug);
        match state
            .store
            .delete(&old_path, &delete_message(&old_slug))
            .await
        {
            // The old path may never have been committed (e.g. a draft that
            // was renamed before its first save succeeded).
            Ok(()) | Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(ApiError::from_store(e, state.expose_error_detail)),
        }
    }

    let path = article_path(&state.content_dir, &target_slug);
    state
        .store
        .commit(
            &[ContentFile::new(path.clone(), request.content)],
            &update_message(&target_slug),
        )
        .await
        .map_err(|e| ApiError::from_store(e, state.expose_error_detail))?;

    tracing::info!(slug = %target_slug, renamed = target_slug != old_slug, "article updated");
    Ok(Json(ArticleSaved {
        message: "Makale başarıyla güncellendi.".to_string(),
        path,
    }))
}

/// `DELETE /api/articles/{slug}`
pub async fn delete_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleDeleted>, ApiError> {
    let slug = sanitize_slug(&slug)
        .map_err(|e| ApiError::from_slug(e, state.expose_error_detail))?;
    let path = article_path(&state.content_dir, &slug);

    state
        .store
        .delete(&path, &delete_message(&slug))
        .await
        .map_err(|e| ApiError::from_store(e, state.expose_error_detail))?;

    tracing::info!(slug = %slug, "article deleted");
    Ok(Json(ArticleDeleted {
        message: "Makale başarıyla silindi.".to_string(),
    }))
}

/// `GET /api/articles/{slug}`
pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let slug = sanitize_slug(&slug)
        .map_err(|e| ApiError::from_slug(e, state.expose_error_detail))?;
    let path = article_path(&state.content_dir, &slug);

    let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::not_found("Makale bulunamadı.")
        } else {
            ApiError::from_store(StoreError::Io(e.to_string()), state.expose_error_detail)
        }
    })?;

    Ok(Json(Article { slug, content }))
}

/// `GET /api/articles`
pub async fn list_articles(
    State(state): State<AppState>,
) -> Result<Json<ArticleList>, ApiError> {
    let mut slugs = Vec::new();

    match tokio::fs::read_dir(&state.content_dir).await {
        Ok(mut entries) => {
            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                ApiError::from_store(StoreError::Io(e.to_string()), state.expose_error_detail)
            })? {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if let Some(slug) = name.strip_suffix(".md") {
                    slugs.push(slug.to_string());
                }
            }
        }
        // No content directory yet: an empty site, not an error.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ApiError::from_store(
                StoreError::Io(e.to_string()),
                state.expose_error_detail,
            ))
        }
    }

    slugs.sort();
    let total = slugs.len();
    Ok(Json(ArticleList { slugs, total }))
}
