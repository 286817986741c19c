//! Genre pages

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use super::pages::{AppError, DeleteForm, Page, detail_url, list_url};
use crate::domain::{Dependents, DomainError, EntityKind, FieldError};
use crate::infrastructure::AppState;
use crate::services::genre_service;
use crate::validation::GenreForm;

fn form_page(title: &str, form: &GenreForm, errors: &[FieldError]) -> Page {
    Page::form("genre_form", title, form, errors)
}

pub async fn genre_list(State(state): State<AppState>) -> Result<Response, AppError> {
    let genres = genre_service::list_genres(&state.catalog()).await?;

    Ok(Page::new("genre_list", "Genre List")
        .with("genres", genres)
        .into_response())
}

pub async fn genre_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let detail = genre_service::genre_detail(&state.catalog(), id).await?;

    Ok(Page::new("genre_detail", "Genre Detail")
        .with("genre", detail.genre)
        .with("books", detail.books)
        .into_response())
}

pub async fn genre_create_get() -> Response {
    form_page("Create Genre", &GenreForm::default(), &[]).into_response()
}

pub async fn genre_create_post(
    State(state): State<AppState>,
    Form(form): Form<GenreForm>,
) -> Result<Response, AppError> {
    match genre_service::create_genre(&state.catalog(), &form).await {
        Ok(saved) => Ok(Redirect::to(&detail_url(EntityKind::Genre, saved.id())).into_response()),
        Err(DomainError::Validation(errors)) => {
            Ok(form_page("Create Genre", &form, &errors).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn genre_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    match genre_service::genre_detail(&state.catalog(), id).await {
        Ok(detail) => Ok(Page::new("genre_delete", "Delete Genre")
            .with("genre", detail.genre)
            .with("books", detail.books)
            .into_response()),
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::Genre)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn genre_delete_post(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Result<Response, AppError> {
    let list = Redirect::to(&list_url(EntityKind::Genre)).into_response();
    let Some(id) = form.id() else {
        return Ok(list);
    };

    let catalog = state.catalog();
    match genre_service::delete_genre(&catalog, id).await {
        Ok(()) | Err(DomainError::NotFound { .. }) => Ok(list),
        Err(DomainError::Blocked {
            dependents: Dependents::Books(books),
            ..
        }) => {
            let genre = genre_service::get_genre(&catalog, id).await?;
            Ok(Page::new("genre_delete", "Delete Genre")
                .with("genre", genre)
                .with("books", books)
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn genre_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    match genre_service::get_genre(&state.catalog(), id).await {
        Ok(genre) => {
            let form = GenreForm {
                name: genre.name.clone(),
            };
            Ok(form_page("Update Genre", &form, &[])
                .with("id", genre.id)
                .into_response())
        }
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::Genre)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn genre_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<GenreForm>,
) -> Result<Response, AppError> {
    match genre_service::update_genre(&state.catalog(), id, &form).await {
        Ok(genre) => Ok(Redirect::to(&detail_url(EntityKind::Genre, genre.id)).into_response()),
        Err(DomainError::Validation(errors)) => Ok(form_page("Update Genre", &form, &errors)
            .with("id", id)
            .into_response()),
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::Genre)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
