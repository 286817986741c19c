//! Book instance pages

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use super::pages::{AppError, DeleteForm, Page, detail_url, list_url};
use crate::domain::{DomainError, EntityKind, FieldError};
use crate::infrastructure::AppState;
use crate::services::{Catalog, book_instance_service};
use crate::validation::BookInstanceForm;

async fn form_page(
    catalog: &Catalog<'_>,
    title: &str,
    form: &BookInstanceForm,
    errors: &[FieldError],
) -> Result<Page, DomainError> {
    let options = book_instance_service::form_options(catalog).await?;

    Ok(Page::form("bookinstance_form", title, form, errors)
        .with("books", options.books)
        .with("statuses", options.statuses))
}

pub async fn instance_list(State(state): State<AppState>) -> Result<Response, AppError> {
    let instances = book_instance_service::list_instances(&state.catalog()).await?;

    Ok(Page::new("bookinstance_list", "Book Instance List")
        .with("book_instances", instances)
        .into_response())
}

pub async fn instance_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let detail = book_instance_service::instance_detail(&state.catalog(), id).await?;

    Ok(Page::new("bookinstance_detail", format!("Book: {}", detail.book.title))
        .with("book_instance", detail.instance)
        .with("book", detail.book)
        .with("author", detail.author)
        .into_response())
}

pub async fn instance_create_get(State(state): State<AppState>) -> Result<Response, AppError> {
    let page = form_page(
        &state.catalog(),
        "Create BookInstance",
        &BookInstanceForm::default(),
        &[],
    )
    .await?;
    Ok(page.into_response())
}

pub async fn instance_create_post(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> Result<Response, AppError> {
    let catalog = state.catalog();
    match book_instance_service::create_instance(&catalog, &form).await {
        Ok(saved) => {
            Ok(Redirect::to(&detail_url(EntityKind::BookInstance, saved.id())).into_response())
        }
        Err(DomainError::Validation(errors)) => {
            let page = form_page(&catalog, "Create BookInstance", &form, &errors).await?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn instance_delete_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    match book_instance_service::instance_detail(&state.catalog(), id).await {
        Ok(detail) => Ok(Page::new("bookinstance_delete", "Delete BookInstance")
            .with("book_instance", detail.instance)
            .with("book", detail.book)
            .into_response()),
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::BookInstance)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn instance_delete_post(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Result<Response, AppError> {
    let list = Redirect::to(&list_url(EntityKind::BookInstance)).into_response();
    let Some(id) = form.id() else {
        return Ok(list);
    };

    match book_instance_service::delete_instance(&state.catalog(), id).await {
        Ok(()) | Err(DomainError::NotFound { .. }) => Ok(list),
        Err(e) => Err(e.into()),
    }
}

pub async fn instance_update_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let catalog = state.catalog();
    match book_instance_service::get_instance(&catalog, id).await {
        Ok(instance) => {
            let form = BookInstanceForm::from(&instance);
            let page = form_page(&catalog, "Update BookInstance", &form, &[]).await?;
            Ok(page.with("id", instance.id).into_response())
        }
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::BookInstance)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn instance_update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<BookInstanceForm>,
) -> Result<Response, AppError> {
    let catalog = state.catalog();
    match book_instance_service::update_instance(&catalog, id, &form).await {
        Ok(instance) => {
            Ok(Redirect::to(&detail_url(EntityKind::BookInstance, instance.id)).into_response())
        }
        Err(DomainError::Validation(errors)) => {
            let page = form_page(&catalog, "Update BookInstance", &form, &errors).await?;
            Ok(page.with("id", id).into_response())
        }
        Err(DomainError::NotFound { .. }) => {
            Ok(Redirect::to(&list_url(EntityKind::BookInstance)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
