//! Book pages
//!
//! Form pages carry the author and genre choices, on first render and on
//! every re-render after a failed submission.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use super::pages::{AppError, DeleteForm, Page, detail_url, list_url};
use crate::domain::{Dependents, DomainError, EntityKind, FieldError};
use crate::infrastructure::AppState;
use crate::services::{Catalog, book_service};
use crate::validation::BookForm;

async fn form_page(
    catalog: &Catalog<'_>,
    title: &str,
    form: &BookForm,
    errors: &[FieldError],
) -> Result<Page, DomainError> {
    let options = book_service::form_options(catalog).await?;

    Ok(Page::form("book_form", title, form, errors)
        .with("authors", options.authors)
        .with("genres", options.genres))
}

pub async fn book_list(State(state): State<AppState>) -> Result<Response, AppError> {
    let books = book_service::list_books(&state.catalog()).await?;

    Ok(Page::new("book_list", "Book List")
        .with("books", books)
        .into_response())
}

pub async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let detail = book_service::book_detail(&state.catalog(), id).await?;

    Ok(Page::new("book_detail", detail.book.title.clone())
        .with("book", detail.book)
        .with("author", detail.author)
        .with("genre", detail.genre)
        .with("book_instances", detail.copies)
        .into_response())
}

pub async fn book_create_get(State(state): State<AppState>) -> Result<Response, AppError> {
    let page = form_page(&state.catalog(), "Create Book", &BookForm::default(), &[]).await?;
    Ok(page.into_response())
}

pub async fn book_create_post(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> Result<Response, AppError> {
    let catalog = state.catalog();
    match book_service::create_book(&catalog, &form).await {
        Ok(saved) => Ok(Redirect::to(&detail_url(EntityKind::Book, saved.id())).into_response()),
        Err(DomainError::Validation(errors)) => {
            let page = form_page(&catalog, "Create Book", &form, &errors).await?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn book_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    match book_service::delete_preview(&state.catalog(), id).await {
        Ok((book, copies)) => Ok(Page::new("book_delete", "Delete Book")
            .with("book", book)
            .with("book_instances", copies)
            .into_response()),
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::Book)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn book_delete_post(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Result<Response, AppError> {
    let list = Redirect::to(&list_url(EntityKind::Book)).into_response();
    let Some(id) = form.id() else {
        return Ok(list);
    };

    let catalog = state.catalog();
    match book_service::delete_book(&catalog, id).await {
        Ok(()) | Err(DomainError::NotFound { .. }) => Ok(list),
        Err(DomainError::Blocked {
            dependents: Dependents::BookInstances(copies),
            ..
        }) => {
            let book = book_service::get_book(&catalog, id).await?;
            Ok(Page::new("book_delete", "Delete Book")
                .with("book", book)
                .with("book_instances", copies)
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn book_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let catalog = state.catalog();
    match book_service::get_book(&catalog, id).await {
        Ok(book) => {
            let page = form_page(&catalog, "Update Book", &BookForm::from(&book), &[]).await?;
            Ok(page.with("id", book.id).into_response())
        }
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::Book)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn book_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<BookForm>,
) -> Result<Response, AppError> {
    let catalog = state.catalog();
    match book_service::update_book(&catalog, id, &form).await {
        Ok(book) => Ok(Redirect::to(&detail_url(EntityKind::Book, book.id)).into_response()),
        Err(DomainError::Validation(errors)) => {
            let page = form_page(&catalog, "Update Book", &form, &errors).await?;
            Ok(page.with("id", id).into_response())
        }
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::Book)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
