//! Demo catalog fixture.
//!
//! Each tier is created concurrently, and `try_join_all` keeps the results in
//! input order, so `genres[0]` is always Fantasy and `books[3]` is always
//! "Apes and Angels" when the next tier wires its foreign keys.

use chrono::NaiveDate;
use futures::future::try_join_all;

use crate::domain::{
    Author, Book, BookInstance, BookStatus, DomainError, Genre, NewAuthor, NewBook,
    NewBookInstance,
};
use crate::services::Catalog;

const GENRES: [&str; 3] = ["Fantasy", "Science Fiction", "French Poetry"];

const AUTHORS: [(&str, &str, Option<&str>, Option<&str>); 5] = [
    ("Patrick", "Rothfuss", Some("1973-06-06"), None),
    ("Ben", "Bova", Some("1932-11-08"), None),
    ("Isaac", "Asimov", Some("1920-01-02"), Some("1992-04-06")),
    ("Bob", "Billings", Some("1965-03-04"), None),
    ("Jim", "Jones", Some("1971-12-16"), None),
];

/// (title, summary, isbn, author index, genre index)
const BOOKS: [(&str, &str, &str, usize, usize); 7] = [
    (
        "The Name of the Wind (The Kingkiller Chronicle, #1)",
        "I have stolen princesses back from sleeping barrow kings. I burned down the town of Trebon. I have spent the night with Felurian and left with both my sanity and my life. I was expelled from the University at a younger age than most people are allowed in. I tread paths by moonlight that others fear to speak of during day. I have talked to Gods, loved women, and written songs that make the minstrels weep.",
        "9781473211896",
        0,
        0,
    ),
    (
        "The Wise Man's Fear (The Kingkiller Chronicle, #2)",
        "Picking up the tale of Kvothe Kingkiller once again, we follow him into exile, into political intrigue, courtship, adventure, love and magic... and further along the path that has turned Kvothe, the mightiest magician of his age, a legend in his own time, into Kote, the unassuming pub landlord.",
        "9788401352836",
        0,
        0,
    ),
    (
        "The Slow Regard of Silent Things (Kingkiller Chronicle)",
        "Deep below the University, there is a dark place. Few people know of it: a broken web of ancient passageways and abandoned rooms. A young woman lives there, tucked among the sprawling tunnels of the Underthing, snug in the heart of this forgotten place.",
        "9780756411336",
        0,
        0,
    ),
    (
        "Apes and Angels",
        "Humankind headed out to the stars not for conquest, nor exploration, nor even for curiosity. Humans went to the stars in a desperate crusade to save intelligent life wherever they found it. A wave of death is spreading through the Milky Way galaxy, an expanding sphere of lethal gamma ...",
        "9780765379528",
        1,
        1,
    ),
    (
        "Death Wave",
        "In Ben Bova's previous novel New Earth, Jordan Kell led the first human mission beyond the solar system. They discovered the ruins of an ancient alien civilization. But one alien AI survived, and it revealed to Jordan Kell that an explosion in the black hole at the heart of the Milky Way galaxy has created a wave of deadly radiation, expanding out from the core toward Earth. Unless the human race acts to save itself, all life on Earth will be wiped out...",
        "9780765379504",
        1,
        1,
    ),
    (
        "Test Book 1",
        "Summary of test book 1",
        "ISBN111111",
        4,
        0,
    ),
    (
        "Test Book 2",
        "Summary of test book 2",
        "ISBN222222",
        4,
        0,
    ),
];

/// (book index, status)
const BOOK_INSTANCES: [(usize, BookStatus); 11] = [
    (0, BookStatus::Available),
    (1, BookStatus::OnLoan),
    (2, BookStatus::Available),
    (3, BookStatus::Available),
    (3, BookStatus::Available),
    (3, BookStatus::Available),
    (4, BookStatus::Available),
    (4, BookStatus::Maintenance),
    (4, BookStatus::OnLoan),
    (0, BookStatus::Available),
    (1, BookStatus::Available),
];

fn date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

/// Insert the demo catalog. Returns `false` and leaves the store untouched
/// when authors already exist.
pub async fn seed_demo_data(catalog: &Catalog<'_>) -> Result<bool, DomainError> {
    if catalog.authors.count().await? > 0 {
        tracing::info!("Catalog already has authors, skipping demo seed");
        return Ok(false);
    }

    tracing::info!("Adding genres");
    let genres: Vec<Genre> =
        try_join_all(GENRES.iter().map(|name| catalog.genres.create(name.to_string()))).await?;

    tracing::info!("Adding authors");
    let authors: Vec<Author> = try_join_all(AUTHORS.iter().map(|(first, family, birth, death)| {
        catalog.authors.create(NewAuthor {
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: date(*birth),
            date_of_death: date(*death),
        })
    }))
    .await?;

    tracing::info!("Adding books");
    let books: Vec<Book> = try_join_all(BOOKS.iter().map(
        |(title, summary, isbn, author, genre)| {
            catalog.books.create(NewBook {
                title: title.to_string(),
                summary: summary.to_string(),
                isbn: isbn.to_string(),
                author_id: authors[*author].id,
                genre_id: genres[*genre].id,
            })
        },
    ))
    .await?;

    tracing::info!("Adding book instances");
    let copies: Vec<BookInstance> = try_join_all(BOOK_INSTANCES.iter().map(|(book, status)| {
        catalog.instances.create(NewBookInstance {
            book_id: books[*book].id,
            status: *status,
            due_back: None,
        })
    }))
    .await?;

    tracing::info!(
        "Seeded {} genres, {} authors, {} books, {} book instances",
        genres.len(),
        authors.len(),
        books.len(),
        copies.len()
    );
    Ok(true)
}
