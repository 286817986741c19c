//! Catalog home page

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use super::pages::{AppError, Page};
use crate::infrastructure::AppState;
use crate::services::catalog_service;

pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    let summary = catalog_service::summary(&state.catalog()).await?;

    Ok(Page::new("index", "Local Library Home")
        .with("summary", summary)
        .into_response())
}
