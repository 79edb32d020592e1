//! Movie database schema
//!
//! Table names and column layout of the movie dataset, plus the canned report
//! queries run against it (see [`reports`]).

pub mod reports;

pub use reports::Report;

use crate::catalog::{Catalog, CatalogResult, ColumnDef, DataType, TableDef};

pub const MOVIES: &str = "movies";
pub const DIRECTORS: &str = "directors";
pub const MOVIE_DIRECTORS: &str = "movie_directors";
pub const KEYWORDS: &str = "keywords";
pub const MOVIE_KEYWORDS: &str = "movie_keywords";
pub const ACTORS: &str = "actors";
pub const MOVIE_ACTORS: &str = "movie_actors";
pub const GENRES: &str = "genres";
pub const MOVIE_GENRES: &str = "movie_genres";
pub const MOVIE_RATINGS: &str = "movie_ratings";

/// Every table of the dataset
pub const TABLES: [&str; 10] = [
    MOVIES,
    DIRECTORS,
    MOVIE_DIRECTORS,
    KEYWORDS,
    MOVIE_KEYWORDS,
    ACTORS,
    MOVIE_ACTORS,
    GENRES,
    MOVIE_GENRES,
    MOVIE_RATINGS,
];

fn id(name: &str) -> ColumnDef {
    ColumnDef::new(name, DataType::Int).nullable(false)
}

fn text(name: &str) -> ColumnDef {
    ColumnDef::new(name, DataType::Text)
}

/// Table definitions of the movie dataset
pub fn table_defs() -> Vec<TableDef> {
    vec![
        TableDef::new(MOVIES)
            .column(id("id"))
            .column(text("original_title").nullable(false))
            .column(text("release_date"))
            .column(ColumnDef::new("runtime", DataType::Int))
            .column(ColumnDef::new("popularity", DataType::Double))
            .column(ColumnDef::new("budget_adjusted", DataType::Double))
            .column(ColumnDef::new("revenue_adjusted", DataType::Double)),
        TableDef::new(DIRECTORS)
            .column(id("id"))
            .column(text("full_name").nullable(false)),
        TableDef::new(MOVIE_DIRECTORS)
            .column(id("director_id"))
            .column(id("movie_id")),
        TableDef::new(KEYWORDS)
            .column(id("id"))
            .column(text("keyword").nullable(false)),
        TableDef::new(MOVIE_KEYWORDS)
            .column(id("movie_id"))
            .column(id("keyword_id")),
        TableDef::new(ACTORS)
            .column(id("id"))
            .column(text("full_name").nullable(false)),
        TableDef::new(MOVIE_ACTORS)
            .column(id("movie_id"))
            .column(id("actor_id")),
        TableDef::new(GENRES)
            .column(id("id"))
            .column(text("genre").nullable(false)),
        TableDef::new(MOVIE_GENRES)
            .column(id("movie_id"))
            .column(id("genre_id")),
        TableDef::new(MOVIE_RATINGS)
            .column(id("user_id"))
            .column(id("movie_id"))
            .column(ColumnDef::new("rating", DataType::Double).nullable(false))
            .column(text("time_created")),
    ]
}

/// Catalog holding every table of the movie dataset
pub fn schema() -> CatalogResult<Catalog> {
    let mut catalog = Catalog::new();
    for def in table_defs() {
        catalog.create_table(def)?;
    }
    Ok(catalog)
}
