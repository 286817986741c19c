use async_trait::async_trait;
use chrono::NaiveDate;
use local_library::db;
use local_library::domain::{
    Book, BookListing, BookRepository, BookStatus, BookSummary, Dependents, DomainError,
    EntityKind, NewBook,
};
use local_library::infrastructure::{AppState, SeaOrmBookRepository};
use local_library::seed;
use local_library::services::{
    Catalog, Saved, author_service, book_instance_service, book_service, catalog_service,
    genre_service,
};
use local_library::validation::{AuthorForm, BookForm, BookInstanceForm, GenreForm};
use sea_orm::{ConnectionTrait, DatabaseConnection};

// Helper to create a test state over an in-memory database
async fn setup_state() -> AppState {
    let db = db::init_db("sqlite::memory:", 1)
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

fn author_form(first: &str, family: &str) -> AuthorForm {
    AuthorForm {
        first_name: first.to_string(),
        family_name: family.to_string(),
        ..Default::default()
    }
}

fn genre_form(name: &str) -> GenreForm {
    GenreForm {
        name: name.to_string(),
    }
}

fn book_form(title: &str, isbn: &str, author: i32, genre: i32) -> BookForm {
    BookForm {
        title: title.to_string(),
        author: author.to_string(),
        summary: format!("Summary of {}", title),
        isbn: isbn.to_string(),
        genre: genre.to_string(),
    }
}

fn copy_form(book: i32, status: &str, due_back: &str) -> BookInstanceForm {
    BookInstanceForm {
        book: book.to_string(),
        status: status.to_string(),
        due_back: due_back.to_string(),
    }
}

async fn create_book_fixture(state: &AppState) -> (i32, i32, i32) {
    let catalog = state.catalog();
    let author = author_service::create_author(&catalog, &author_form("Ursula", "Leguin"))
        .await
        .expect("create author")
        .id();
    let genre = genre_service::create_genre(&catalog, &genre_form("Fantasy"))
        .await
        .expect("create genre")
        .id();
    let book = book_service::create_book(
        &catalog,
        &book_form("A Wizard of Earthsea", "9780547773742", author, genre),
    )
    .await
    .expect("create book")
    .id();
    (author, genre, book)
}

async fn raw(db: &DatabaseConnection, sql: &str) {
    db.execute_unprepared(sql).await.expect("raw sql");
}

fn fields(err: DomainError) -> Vec<String> {
    match err {
        DomainError::Validation(errors) => {
            let mut fields: Vec<String> = errors.into_iter().map(|e| e.field).collect();
            fields.sort();
            fields.dedup();
            fields
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_author_create_is_idempotent() {
    let state = setup_state().await;
    let catalog = state.catalog();

    let first = author_service::create_author(&catalog, &author_form("Jane", "Doe"))
        .await
        .unwrap();
    let second = author_service::create_author(&catalog, &author_form("  Jane ", "Doe"))
        .await
        .unwrap();

    assert!(matches!(first, Saved::Created(_)));
    assert_eq!(second, Saved::Existing(first.id()));
    assert_eq!(author_service::list_authors(&catalog).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_genre_create_matches_case_insensitively() {
    let state = setup_state().await;
    let catalog = state.catalog();

    let first = genre_service::create_genre(&catalog, &genre_form("Fantasy"))
        .await
        .unwrap();
    let second = genre_service::create_genre(&catalog, &genre_form("fantasy"))
        .await
        .unwrap();

    assert_eq!(second, Saved::Existing(first.id()));
    assert_eq!(genre_service::list_genres(&catalog).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_book_create_is_idempotent_on_natural_key() {
    let state = setup_state().await;
    let (author, genre, book) = create_book_fixture(&state).await;
    let catalog = state.catalog();

    let again = book_service::create_book(
        &catalog,
        &book_form("A Wizard of Earthsea", "9780547773742", author, genre),
    )
    .await
    .unwrap();

    assert_eq!(again, Saved::Existing(book));
    assert_eq!(book_service::list_books(&catalog).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_author_validation_collects_every_violation() {
    let state = setup_state().await;
    let catalog = state.catalog();

    let form = AuthorForm {
        first_name: "   ".to_string(),
        family_name: "D0e".to_string(),
        date_of_birth: "not-a-date".to_string(),
        date_of_death: String::new(),
    };
    let err = author_service::create_author(&catalog, &form)
        .await
        .unwrap_err();

    assert_eq!(fields(err), vec!["date_of_birth", "family_name", "first_name"]);
    assert_eq!(author_service::list_authors(&catalog).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_author_death_before_birth_is_rejected() {
    let state = setup_state().await;
    let catalog = state.catalog();

    let form = AuthorForm {
        date_of_birth: "1990-01-01".to_string(),
        date_of_death: "1980-01-01".to_string(),
        ..author_form("Jane", "Doe")
    };
    let err = author_service::create_author(&catalog, &form)
        .await
        .unwrap_err();

    assert_eq!(fields(err), vec!["date_of_death"]);
}

#[tokio::test]
async fn test_genre_name_too_short_is_rejected() {
    let state = setup_state().await;
    let err = genre_service::create_genre(&state.catalog(), &genre_form("Sf"))
        .await
        .unwrap_err();

    assert_eq!(fields(err), vec!["name"]);
}

#[tokio::test]
async fn test_book_validation_reports_rules_and_missing_references() {
    let state = setup_state().await;
    let catalog = state.catalog();

    let form = BookForm {
        title: String::new(),
        author: "999".to_string(),
        summary: "Something".to_string(),
        isbn: "12345".to_string(),
        genre: "998".to_string(),
    };
    let err = book_service::create_book(&catalog, &form).await.unwrap_err();

    assert_eq!(fields(err), vec!["author", "genre", "isbn", "title"]);
    assert_eq!(book_service::list_books(&catalog).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_instance_rejects_unknown_status_and_book() {
    let state = setup_state().await;
    let err = book_instance_service::create_instance(
        &state.catalog(),
        &copy_form(42, "LOST", ""),
    )
    .await
    .unwrap_err();

    assert_eq!(fields(err), vec!["book", "status"]);
}

#[tokio::test]
async fn test_instance_due_back_only_kept_for_loans() {
    let state = setup_state().await;
    let (_, _, book) = create_book_fixture(&state).await;
    let catalog = state.catalog();

    let on_loan =
        book_instance_service::create_instance(&catalog, &copy_form(book, "ON_LOAN", "2030-05-01"))
            .await
            .unwrap();
    let available = book_instance_service::create_instance(
        &catalog,
        &copy_form(book, "AVAILABLE", "2030-05-01"),
    )
    .await
    .unwrap();

    let on_loan = book_instance_service::get_instance(&catalog, on_loan.id())
        .await
        .unwrap();
    let available = book_instance_service::get_instance(&catalog, available.id())
        .await
        .unwrap();

    assert_eq!(on_loan.status, BookStatus::OnLoan);
    assert!(on_loan.due_back.is_some());
    assert_eq!(available.status, BookStatus::Available);
    assert_eq!(available.due_back, None);
}

#[tokio::test]
async fn test_instances_are_never_deduplicated() {
    let state = setup_state().await;
    let (_, _, book) = create_book_fixture(&state).await;
    let catalog = state.catalog();

    for _ in 0..2 {
        let saved = book_instance_service::create_instance(
            &catalog,
            &copy_form(book, "AVAILABLE", ""),
        )
        .await
        .unwrap();
        assert!(matches!(saved, Saved::Created(_)));
    }

    assert_eq!(
        book_instance_service::list_instances(&catalog)
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn test_genre_delete_blocked_while_books_reference_it() {
    let state = setup_state().await;
    let (_, genre, book) = create_book_fixture(&state).await;
    let catalog = state.catalog();

    let err = genre_service::delete_genre(&catalog, genre).await.unwrap_err();
    match err {
        DomainError::Blocked {
            entity,
            id,
            dependents: Dependents::Books(books),
        } => {
            assert_eq!(entity, EntityKind::Genre);
            assert_eq!(id, genre);
            assert_eq!(books.len(), 1);
            assert_eq!(books[0].id, book);
        }
        other => panic!("Expected blocked delete, got {:?}", other),
    }

    // Still there
    assert!(genre_service::get_genre(&catalog, genre).await.is_ok());

    // Once the last book is gone the genre can go too
    book_service::delete_book(&catalog, book).await.unwrap();
    genre_service::delete_genre(&catalog, genre).await.unwrap();

    let err = genre_service::get_genre(&catalog, genre).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            entity: EntityKind::Genre,
            ..
        }
    ));
}

#[tokio::test]
async fn test_author_delete_blocked_then_allowed() {
    let state = setup_state().await;
    let (author, _, book) = create_book_fixture(&state).await;
    let catalog = state.catalog();

    let err = author_service::delete_author(&catalog, author)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Blocked { entity: EntityKind::Author, .. }));

    book_service::delete_book(&catalog, book).await.unwrap();
    author_service::delete_author(&catalog, author).await.unwrap();

    let err = author_service::get_author(&catalog, author)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: EntityKind::Author, .. }));
}

#[tokio::test]
async fn test_book_delete_blocked_while_copies_exist() {
    let state = setup_state().await;
    let (_, _, book) = create_book_fixture(&state).await;
    let catalog = state.catalog();

    book_instance_service::create_instance(&catalog, &copy_form(book, "AVAILABLE", ""))
        .await
        .unwrap();

    let err = book_service::delete_book(&catalog, book).await.unwrap_err();
    match err {
        DomainError::Blocked {
            dependents: Dependents::BookInstances(copies),
            ..
        } => assert_eq!(copies.len(), 1),
        other => panic!("Expected blocked delete, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_missing_entity_is_not_found() {
    let state = setup_state().await;
    let catalog = state.catalog();

    let err = genre_service::delete_genre(&catalog, 77).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            entity: EntityKind::Genre,
            id: 77
        }
    ));
}

#[tokio::test]
async fn test_instance_detail_cascades_not_found() {
    let state = setup_state().await;
    let (_, _, book) = create_book_fixture(&state).await;
    let catalog = state.catalog();

    let copy = book_instance_service::create_instance(&catalog, &copy_form(book, "AVAILABLE", ""))
        .await
        .unwrap()
        .id();

    let detail = book_instance_service::instance_detail(&catalog, copy)
        .await
        .unwrap();
    assert_eq!(detail.book.id, book);

    // Remove the book behind the store's back, leaving a dangling copy
    raw(state.db(), "PRAGMA foreign_keys = OFF").await;
    raw(state.db(), &format!("DELETE FROM books WHERE id = {}", book)).await;
    raw(state.db(), "PRAGMA foreign_keys = ON").await;

    let err = book_instance_service::instance_detail(&catalog, copy)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            entity: EntityKind::Book,
            ..
        }
    ));

    let err = book_instance_service::instance_detail(&catalog, copy + 100)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            entity: EntityKind::BookInstance,
            ..
        }
    ));
}

#[tokio::test]
async fn test_update_preserves_identity() {
    let state = setup_state().await;
    let (author, genre, book) = create_book_fixture(&state).await;
    let catalog = state.catalog();

    let rejected =
        author_service::update_author(&catalog, author, &author_form("Ursula K", "Leguin")).await;
    assert_eq!(fields(rejected.unwrap_err()), vec!["first_name"]);

    let updated = author_service::update_author(&catalog, author, &author_form("Ursula", "Kroeber"))
        .await
        .unwrap();
    assert_eq!(updated.id, author);
    assert_eq!(updated.family_name, "Kroeber");

    let renamed = genre_service::update_genre(&catalog, genre, &genre_form("High Fantasy"))
        .await
        .unwrap();
    assert_eq!(renamed.id, genre);

    let retitled = book_service::update_book(
        &catalog,
        book,
        &book_form("The Tombs of Atuan", "9780689845369", author, genre),
    )
    .await
    .unwrap();
    assert_eq!(retitled.id, book);
    assert_eq!(book_service::list_books(&catalog).await.unwrap().len(), 1);
    assert_eq!(author_service::list_authors(&catalog).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_missing_entity_is_not_found() {
    let state = setup_state().await;
    let err = genre_service::update_genre(&state.catalog(), 5, &genre_form("Horror"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::NotFound {
            entity: EntityKind::Genre,
            id: 5
        }
    ));
}

#[tokio::test]
async fn test_update_onto_existing_name_is_a_field_error() {
    let state = setup_state().await;
    let catalog = state.catalog();

    genre_service::create_genre(&catalog, &genre_form("Fantasy"))
        .await
        .unwrap();
    let poetry = genre_service::create_genre(&catalog, &genre_form("Poetry"))
        .await
        .unwrap()
        .id();

    let err = genre_service::update_genre(&catalog, poetry, &genre_form("Fantasy"))
        .await
        .unwrap_err();
    assert_eq!(fields(err), vec!["name"]);
}

#[tokio::test]
async fn test_lists_are_sorted_regardless_of_insertion_order() {
    let state = setup_state().await;
    let catalog = state.catalog();

    for (first, family) in [("Zoe", "Adams"), ("Alice", "Young"), ("Mike", "Brown")] {
        author_service::create_author(&catalog, &author_form(first, family))
            .await
            .unwrap();
    }
    let mut genre_ids = Vec::new();
    for name in ["Western", "Biography", "Mystery"] {
        genre_ids.push(
            genre_service::create_genre(&catalog, &genre_form(name))
                .await
                .unwrap()
                .id(),
        );
    }
    let authors = author_service::list_authors(&catalog).await.unwrap();
    for (title, isbn) in [("Zebra", "9780000000001"), ("Apple", "9780000000002")] {
        book_service::create_book(&catalog, &book_form(title, isbn, authors[0].id, genre_ids[0]))
            .await
            .unwrap();
    }

    let first_names: Vec<String> = authors.into_iter().map(|a| a.first_name).collect();
    assert_eq!(first_names, vec!["Alice", "Mike", "Zoe"]);

    let genres: Vec<String> = genre_service::list_genres(&catalog)
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(genres, vec!["Biography", "Mystery", "Western"]);

    let books = book_service::list_books(&catalog).await.unwrap();
    let titles: Vec<&str> = books.iter().map(|b| b.book.title.as_str()).collect();
    assert_eq!(titles, vec!["Apple", "Zebra"]);
    assert_eq!(books[0].author_name.as_deref(), Some("Young, Alice"));
    assert_eq!(books[0].genre_name.as_deref(), Some("Western"));
}

#[tokio::test]
async fn test_seed_populates_catalog_once() {
    let state = setup_state().await;
    let catalog = state.catalog();

    assert!(seed::seed_demo_data(&catalog).await.unwrap());
    assert!(!seed::seed_demo_data(&catalog).await.unwrap());

    let summary = catalog_service::summary(&catalog).await.unwrap();
    assert_eq!(summary.genre_count, 3);
    assert_eq!(summary.author_count, 5);
    assert_eq!(summary.book_count, 7);
    assert_eq!(summary.book_instance_count, 11);
    assert_eq!(summary.book_instance_available_count, 8);
}

#[tokio::test]
async fn test_update_date_of_death_keeps_everything_else() {
    let state = setup_state().await;
    let catalog = state.catalog();

    let form = AuthorForm {
        date_of_birth: "1920-01-02".to_string(),
        ..author_form("Isaac", "Asimov")
    };
    let id = author_service::create_author(&catalog, &form)
        .await
        .unwrap()
        .id();

    let with_death = AuthorForm {
        date_of_death: "1992-04-06".to_string(),
        ..form
    };
    author_service::update_author(&catalog, id, &with_death)
        .await
        .unwrap();

    let stored = author_service::get_author(&catalog, id).await.unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.first_name, "Isaac");
    assert_eq!(stored.family_name, "Asimov");
    assert_eq!(stored.date_of_birth, NaiveDate::from_ymd_opt(1920, 1, 2));
    assert_eq!(stored.date_of_death, NaiveDate::from_ymd_opt(1992, 4, 6));
    assert_eq!(author_service::list_authors(&catalog).await.unwrap().len(), 1);
}

/// Book store that deletes a genre just before applying an update
struct GenreDeletedBeforeUpdate {
    inner: SeaOrmBookRepository,
    db: DatabaseConnection,
    genre_id: i32,
}

#[async_trait]
impl BookRepository for GenreDeletedBeforeUpdate {
    async fn find_all(&self) -> Result<Vec<BookListing>, DomainError> {
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_natural_key(
        &self,
        isbn: &str,
        title: &str,
        summary: &str,
    ) -> Result<Option<Book>, DomainError> {
        self.inner.find_by_natural_key(isbn, title, summary).await
    }

    async fn find_by_author(&self, author_id: i32) -> Result<Vec<BookSummary>, DomainError> {
        self.inner.find_by_author(author_id).await
    }

    async fn find_by_genre(&self, genre_id: i32) -> Result<Vec<BookSummary>, DomainError> {
        self.inner.find_by_genre(genre_id).await
    }

    async fn create(&self, input: NewBook) -> Result<Book, DomainError> {
        self.inner.create(input).await
    }

    async fn update(&self, id: i32, input: NewBook) -> Result<Book, DomainError> {
        raw(
            &self.db,
            &format!("DELETE FROM genres WHERE id = {}", self.genre_id),
        )
        .await;
        self.inner.update(id, input).await
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.inner.delete(id).await
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.inner.count().await
    }
}

#[tokio::test]
async fn test_update_reports_genre_deleted_after_the_check() {
    let state = setup_state().await;
    let (author, _, book) = create_book_fixture(&state).await;
    let poetry = genre_service::create_genre(&state.catalog(), &genre_form("Poetry"))
        .await
        .unwrap()
        .id();

    let books = GenreDeletedBeforeUpdate {
        inner: SeaOrmBookRepository::new(state.db().clone()),
        db: state.db().clone(),
        genre_id: poetry,
    };
    let catalog = Catalog {
        books: &books,
        ..state.catalog()
    };

    let err = book_service::update_book(
        &catalog,
        book,
        &book_form("A Wizard of Earthsea", "9780547773742", author, poetry),
    )
    .await
    .unwrap_err();

    assert_eq!(fields(err), vec!["genre"]);
}
