//! Deterministic synthetic movie dataset
//!
//! Same schema and referential integrity as the real movie database, sized so
//! that the canned reports produce known results. Built once per test binary.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use serde_json::{Map, Value};

use reeldb::executor::{Datum, Row};
use reeldb::movies::{
    self, ACTORS, DIRECTORS, GENRES, KEYWORDS, MOVIES, MOVIE_ACTORS, MOVIE_DIRECTORS,
    MOVIE_GENRES, MOVIE_KEYWORDS, MOVIE_RATINGS,
};
use reeldb::storage::{Relation, RelationStore};

/// Dataset id the fixture is registered under
pub const DATASET: &str = "movies";

/// Directors and the adjusted budgets of their movies
const DIRECTOR_BUDGETS: &[(&str, &[Option<f64>])] = &[
    ("Christopher Nolan", &[Some(150000000.00), Some(300000000.00)]),
    ("Michael Bay", &[Some(300000000.05), Some(218297522.05)]),
    ("Greta Gerwig", &[None, Some(100000000.00)]),
    (
        "Ridley Scott",
        &[Some(250000000.00), Some(272882143.58), Some(200000000.00)],
    ),
    ("Jane Campion", &[None]),
    ("David Yates", &[Some(250000000.25), Some(254100108.25)]),
    ("Peter Jackson", &[Some(480000000.75)]),
    ("Orson Welles", &[]),
];

/// Keywords and the number of movies tagged with each
const KEYWORD_COUNTS: &[(&str, usize)] = &[
    ("sport", 50),
    ("dystopia", 47),
    ("woman director", 162),
    ("revenge", 51),
    ("based on novel", 85),
    ("friendship", 30),
    ("murder", 66),
    ("independent film", 115),
    ("high school", 48),
    ("biography", 78),
    ("sex", 60),
    ("duringcreditsstinger", 82),
    ("silent film", 0),
];

/// Movies available for keyword tagging
const KEYWORD_MOVIES: usize = 200;

/// Titles and their cast sizes
const CASTS: &[(&str, usize)] = &[("Life of Pi", 5), ("Life", 12), ("Alien", 7)];

/// Genres with (rating, number of ratings) spread over two movies each
const GENRE_RATINGS: &[(&str, &[(f64, usize)])] = &[
    ("Comedy", &[(5.0, 500), (2.0, 500)]),
    ("Drama", &[(5.0, 15052), (1.0, 9032)]),
    ("Music", &[(4.0, 73), (3.0, 27)]),
    ("Thriller", &[(5.0, 11771), (1.0, 7063)]),
    ("Crime", &[(5.0, 8670), (1.0, 3760)]),
    ("Documentary", &[(4.0, 71), (3.0, 29)]),
    ("Western", &[]),
];

const MOVIES_PER_GENRE: usize = 2;
const RATING_USERS: i64 = 1000;

static FIXTURE: OnceLock<RelationStore> = OnceLock::new();

/// The shared movie dataset snapshot
pub fn movie_store() -> RelationStore {
    FIXTURE.get_or_init(build).clone()
}

#[derive(Default)]
struct Builder {
    tables: HashMap<&'static str, Vec<Row>>,
    next_movie: i64,
}

impl Builder {
    fn push(&mut self, table: &'static str, values: Vec<Datum>) {
        self.tables.entry(table).or_default().push(Row::new(values));
    }

    fn movie(&mut self, title: &str, budget: Option<f64>) -> i64 {
        self.next_movie += 1;
        let id = self.next_movie;
        self.push(
            MOVIES,
            vec![
                Datum::Int(id),
                Datum::from(title),
                Datum::from(format!("20{:02}-01-01", id % 24)),
                Datum::Int(90 + id % 60),
                Datum::Float((id % 100) as f64 / 4.0),
                budget.map_or(Datum::Null, Datum::Float),
                Datum::Null,
            ],
        );
        id
    }

    fn directors(&mut self) {
        for (i, (name, budgets)) in DIRECTOR_BUDGETS.iter().enumerate() {
            let director = i as i64 + 1;
            self.push(DIRECTORS, vec![Datum::Int(director), Datum::from(*name)]);
            for (n, budget) in budgets.iter().enumerate() {
                let movie = self.movie(&format!("{} feature {}", name, n + 1), *budget);
                self.push(MOVIE_DIRECTORS, vec![Datum::Int(director), Datum::Int(movie)]);
            }
        }
    }

    fn keywords(&mut self) {
        let tagged: Vec<i64> = (0..KEYWORD_MOVIES)
            .map(|n| self.movie(&format!("Untitled {}", n + 1), None))
            .collect();
        for (i, (keyword, count)) in KEYWORD_COUNTS.iter().enumerate() {
            let keyword_id = i as i64 + 1;
            self.push(KEYWORDS, vec![Datum::Int(keyword_id), Datum::from(*keyword)]);
            for movie in &tagged[..*count] {
                self.push(MOVIE_KEYWORDS, vec![Datum::Int(*movie), Datum::Int(keyword_id)]);
            }
        }
    }

    fn casts(&mut self) {
        let largest = CASTS.iter().map(|(_, n)| *n).max().unwrap_or(0);
        for actor in 1..=largest as i64 {
            self.push(
                ACTORS,
                vec![Datum::Int(actor), Datum::from(format!("Actor {}", actor))],
            );
        }
        for (title, size) in CASTS {
            let movie = self.movie(title, None);
            for actor in 1..=*size as i64 {
                self.push(MOVIE_ACTORS, vec![Datum::Int(movie), Datum::Int(actor)]);
            }
        }
    }

    fn ratings(&mut self) {
        let mut user = 0i64;
        for (i, (genre, ratings)) in GENRE_RATINGS.iter().enumerate() {
            let genre_id = i as i64 + 1;
            self.push(GENRES, vec![Datum::Int(genre_id), Datum::from(*genre)]);
            if ratings.is_empty() {
                continue;
            }

            let genre_movies: Vec<i64> = (0..MOVIES_PER_GENRE)
                .map(|n| self.movie(&format!("{} story {}", genre, n + 1), None))
                .collect();
            for movie in &genre_movies {
                self.push(MOVIE_GENRES, vec![Datum::Int(*movie), Datum::Int(genre_id)]);
            }

            let mut slot = 0usize;
            for (rating, count) in ratings.iter() {
                for _ in 0..*count {
                    let movie = genre_movies[slot % genre_movies.len()];
                    slot += 1;
                    user = (user % RATING_USERS) + 1;
                    self.push(
                        MOVIE_RATINGS,
                        vec![
                            Datum::Int(user),
                            Datum::Int(movie),
                            Datum::Float(*rating),
                            Datum::Null,
                        ],
                    );
                }
            }
        }
    }

    fn finish(mut self) -> RelationStore {
        let mut store = RelationStore::new();
        for def in movies::table_defs() {
            let rows = self.tables.remove(def.name.as_str()).unwrap_or_default();
            let mut relation = Relation::new(def);
            relation.extend(rows).expect("fixture row rejected");
            store.add_relation(relation).expect("fixture table registered twice");
        }
        store
    }
}

fn build() -> RelationStore {
    let mut builder = Builder::default();
    builder.directors();
    builder.keywords();
    builder.casts();
    builder.ratings();
    builder.finish()
}

/// Write a store as `<root>/<dataset>/<table>.json`; NULL fields are omitted
pub fn write_json_fixture(store: &RelationStore, root: &Path, dataset: &str) -> std::io::Result<()> {
    let dir = root.join(dataset);
    std::fs::create_dir_all(&dir)?;

    for def in store.catalog().tables() {
        let relation = store.relation(&def.name).expect("catalog table without relation");
        let objects: Vec<Value> = relation
            .rows()
            .iter()
            .map(|row| {
                let mut object = Map::new();
                for (col, value) in def.columns.iter().zip(row.iter()) {
                    if !value.is_null() {
                        object.insert(col.name.clone(), serde_json::to_value(value).unwrap());
                    }
                }
                Value::Object(object)
            })
            .collect();
        let json = serde_json::to_string(&Value::Array(objects)).map_err(std::io::Error::other)?;
        std::fs::write(dir.join(format!("{}.json", def.name)), json)?;
    }
    Ok(())
}
