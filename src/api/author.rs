//! Author pages

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use serde::Serialize;

use super::pages::{AppError, DeleteForm, Page, detail_url, list_url};
use crate::domain::{Author, Dependents, DomainError, EntityKind, FieldError};
use crate::infrastructure::AppState;
use crate::services::author_service;
use crate::validation::AuthorForm;

/// Author as displayed, with the derived name, lifespan and age
#[derive(Debug, Serialize)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub lifespan: String,
    pub age: Option<u32>,
}

impl AuthorView {
    pub fn new(author: Author, today: NaiveDate) -> Self {
        Self {
            name: author.name(),
            lifespan: author.lifespan(),
            age: author.age(today),
            author,
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn form_page(title: &str, form: &AuthorForm, errors: &[FieldError]) -> Page {
    Page::form("author_form", title, form, errors)
}

pub async fn author_list(State(state): State<AppState>) -> Result<Response, AppError> {
    let today = today();
    let authors: Vec<AuthorView> = author_service::list_authors(&state.catalog())
        .await?
        .into_iter()
        .map(|a| AuthorView::new(a, today))
        .collect();

    Ok(Page::new("author_list", "Author List")
        .with("authors", authors)
        .into_response())
}

pub async fn author_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let detail = author_service::author_detail(&state.catalog(), id).await?;

    Ok(Page::new("author_detail", "Author Detail")
        .with("author", AuthorView::new(detail.author, today()))
        .with("books", detail.books)
        .into_response())
}

pub async fn author_create_get() -> Response {
    form_page("Create Author", &AuthorForm::default(), &[]).into_response()
}

pub async fn author_create_post(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> Result<Response, AppError> {
    match author_service::create_author(&state.catalog(), &form).await {
        Ok(saved) => Ok(Redirect::to(&detail_url(EntityKind::Author, saved.id())).into_response()),
        Err(DomainError::Validation(errors)) => {
            Ok(form_page("Create Author", &form, &errors).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn author_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    match author_service::author_detail(&state.catalog(), id).await {
        Ok(detail) => Ok(Page::new("author_delete", "Delete Author")
            .with("author", AuthorView::new(detail.author, today()))
            .with("books", detail.books)
            .into_response()),
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::Author)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn author_delete_post(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Result<Response, AppError> {
    let list = Redirect::to(&list_url(EntityKind::Author)).into_response();
    let Some(id) = form.id() else {
        return Ok(list);
    };

    let catalog = state.catalog();
    match author_service::delete_author(&catalog, id).await {
        Ok(()) | Err(DomainError::NotFound { .. }) => Ok(list),
        Err(DomainError::Blocked {
            dependents: Dependents::Books(books),
            ..
        }) => {
            let author = author_service::get_author(&catalog, id).await?;
            Ok(Page::new("author_delete", "Delete Author")
                .with("author", AuthorView::new(author, today()))
                .with("books", books)
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn author_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    match author_service::get_author(&state.catalog(), id).await {
        Ok(author) => Ok(form_page("Update Author", &AuthorForm::from(&author), &[])
            .with("id", author.id)
            .into_response()),
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::Author)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn author_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<AuthorForm>,
) -> Result<Response, AppError> {
    match author_service::update_author(&state.catalog(), id, &form).await {
        Ok(author) => Ok(Redirect::to(&detail_url(EntityKind::Author, author.id)).into_response()),
        Err(DomainError::Validation(errors)) => Ok(form_page("Update Author", &form, &errors)
            .with("id", id)
            .into_response()),
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::Author)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
