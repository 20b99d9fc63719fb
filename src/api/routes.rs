//! Routes and handlers for the image endpoints

use crate::error::ImgcacheError;
use crate::profile::ProfileCatalog;
use crate::service::ImageService;
use crate::validate::RequestValidator;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ImageService>,
    pub validator: Arc<RequestValidator>,
    pub catalog: Arc<ProfileCatalog>,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/image/show/{profile}", get(show))
        .route("/image/show/{profile}/{seo_name}", get(show_with_seo))
        .route("/image/flush/{profile}", delete(flush))
        .with_state(state)
}

#[derive(Deserialize)]
struct ReferenceQuery {
    reference: String,
}

async fn show(
    State(state): State<AppState>,
    Path(profile): Path<String>,
    Query(query): Query<ReferenceQuery>,
) -> Result<Response, ApiError> {
    serve_image(&state, &profile, &query.reference).await
}

// the SEO name segment exists only for crawler-friendly URLs; it plays no
// part in resolution
async fn show_with_seo(
    State(state): State<AppState>,
    Path((profile, _seo_name)): Path<(String, String)>,
    Query(query): Query<ReferenceQuery>,
) -> Result<Response, ApiError> {
    serve_image(&state, &profile, &query.reference).await
}

async fn serve_image(
    state: &AppState,
    profile: &str,
    reference: &str,
) -> Result<Response, ApiError> {
    state.validator.check_profile_for_fetch(profile)?;
    state.validator.check_image_name(reference)?;
    let bytes = state.service.resolve(reference, profile).await?;
    let mime = state
        .catalog
        .find(profile)
        .map(|p| p.format.mime())
        .unwrap_or("application/octet-stream");
    Ok(([(header::CONTENT_TYPE, mime)], bytes).into_response())
}

async fn flush(
    State(state): State<AppState>,
    Path(profile): Path<String>,
    Query(query): Query<ReferenceQuery>,
) -> Result<StatusCode, ApiError> {
    state.validator.check_profile_for_delete(&profile)?;
    state.validator.check_image_name(&query.reference)?;
    state.service.invalidate(&query.reference, &profile).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Maps error kinds to transport status codes
struct ApiError(ImgcacheError);

impl From<ImgcacheError> for ApiError {
    fn from(error: ImgcacheError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ImgcacheError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ImgcacheError::UnknownProfile { .. }
            | ImgcacheError::NotFound { .. }
            | ImgcacheError::NotFoundInSource { .. } => StatusCode::NOT_FOUND,
            ImgcacheError::Loader { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_client_error() {
            debug!(%status, error = %self.0, "request rejected");
        } else {
            error!(%status, error = %self.0, "request failed");
        }
        status.into_response()
    }
}
