pub mod author;
pub mod book_instance;
pub mod books;
pub mod catalog;
pub mod genre;
pub mod health;
pub mod pages;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::infrastructure::AppState;
use pages::CATALOG_ROOT;

/// Catalog pages, relative to `CATALOG_ROOT`
pub fn catalog_router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        // Books
        .route("/book/list", get(books::book_list))
        .route(
            "/book/create",
            get(books::book_create_get).post(books::book_create_post),
        )
        .route("/book/delete", post(books::book_delete_post))
        .route("/book/:id", get(books::book_detail))
        .route("/book/:id/delete", get(books::book_delete_get))
        .route(
            "/book/:id/update",
            get(books::book_update_get).post(books::book_update_post),
        )
        // Authors
        .route("/author/list", get(author::author_list))
        .route(
            "/author/create",
            get(author::author_create_get).post(author::author_create_post),
        )
        .route("/author/delete", post(author::author_delete_post))
        .route("/author/:id", get(author::author_detail))
        .route("/author/:id/delete", get(author::author_delete_get))
        .route(
            "/author/:id/update",
            get(author::author_update_get).post(author::author_update_post),
        )
        // Genres
        .route("/genre/list", get(genre::genre_list))
        .route(
            "/genre/create",
            get(genre::genre_create_get).post(genre::genre_create_post),
        )
        .route("/genre/delete", post(genre::genre_delete_post))
        .route("/genre/:id", get(genre::genre_detail))
        .route("/genre/:id/delete", get(genre::genre_delete_get))
        .route(
            "/genre/:id/update",
            get(genre::genre_update_get).post(genre::genre_update_post),
        )
        // Book instances
        .route("/bookinstance/list", get(book_instance::instance_list))
        .route(
            "/bookinstance/create",
            get(book_instance::instance_create_get).post(book_instance::instance_create_post),
        )
        .route(
            "/bookinstance/delete",
            post(book_instance::instance_delete_post),
        )
        .route("/bookinstance/:id", get(book_instance::instance_detail))
        .route(
            "/bookinstance/:id/delete",
            get(book_instance::instance_delete_get),
        )
        .route(
            "/bookinstance/:id/update",
            get(book_instance::instance_update_get).post(book_instance::instance_update_post),
        )
}

pub fn api_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to(CATALOG_ROOT) }))
        .route("/health", get(health::health_check))
        .nest(CATALOG_ROOT, catalog_router())
        .with_state(state)
}
