use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

const KEEP_ALIVE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Pool settings for `database_url`.
///
/// An in-memory database lives only as long as its connection, so memory URLs
/// get exactly one connection that the pool keeps open.
pub fn connect_options(database_url: &str, max_connections: u32) -> ConnectOptions {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    if database_url.contains(":memory:") {
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(KEEP_ALIVE)
            .max_lifetime(KEEP_ALIVE);
    } else {
        options.max_connections(max_connections);
    }
    options
}

/// Open the process-wide connection pool and bring the schema up to date.
pub async fn init_db(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let options = connect_options(database_url, max_connections);
    let db = Database::connect(options).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    tracing::debug!("Database ready at {}", database_url);
    Ok(db)
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(db.get_database_backend(), sql.to_owned()))
        .await?;
    Ok(())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // sqlx enables this on every pooled connection; the schema relies on it
    execute(db, "PRAGMA foreign_keys = ON").await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            family_name TEXT NOT NULL,
            date_of_birth TEXT,
            date_of_death TEXT
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            summary TEXT NOT NULL,
            isbn TEXT NOT NULL,
            author_id INTEGER NOT NULL,
            genre_id INTEGER NOT NULL,
            FOREIGN KEY (author_id) REFERENCES authors(id) ON DELETE RESTRICT,
            FOREIGN KEY (genre_id) REFERENCES genres(id) ON DELETE RESTRICT
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS book_instances (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'MAINTENANCE'
                CHECK (status IN ('AVAILABLE', 'ON_LOAN', 'MAINTENANCE', 'RESERVED')),
            due_back TEXT,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE RESTRICT
        )
        "#,
    )
    .await?;

    // Natural keys: the workflows check these before inserting, the indexes
    // settle concurrent creates that both passed the check.
    execute(
        db,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_genres_name ON genres (name COLLATE NOCASE)",
    )
    .await?;
    execute(
        db,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_authors_name \
         ON authors (first_name COLLATE NOCASE, family_name COLLATE NOCASE)",
    )
    .await?;
    execute(
        db,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_books_natural_key ON books (isbn, title, summary)",
    )
    .await?;

    // Foreign-key lookups (books by author/genre, copies by book)
    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_books_author_id ON books (author_id)",
    )
    .await?;
    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_books_genre_id ON books (genre_id)",
    )
    .await?;
    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_book_instances_book_id ON book_instances (book_id)",
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_pool_keeps_its_only_connection() {
        let options = connect_options("sqlite::memory:", 5);
        assert_eq!(options.get_max_connections(), Some(1));
        assert_eq!(options.get_min_connections(), Some(1));
        assert_eq!(options.get_idle_timeout(), Some(KEEP_ALIVE));
        assert_eq!(options.get_max_lifetime(), Some(KEEP_ALIVE));
    }

    #[test]
    fn file_pool_uses_configured_size() {
        let options = connect_options("sqlite://local_library.db?mode=rwc", 5);
        assert_eq!(options.get_max_connections(), Some(5));
        assert_eq!(options.get_min_connections(), None);
    }
}
