//! Multi-table report tests.

use reeldb::config::LoaderConfig;
use reeldb::database::Database;
use reeldb::executor::Datum;
use reeldb::movies::{self, reports, Report};
use reeldb::storage::JsonFixtureSource;
use tempfile::TempDir;

use crate::movies_suite::MovieDb;
use crate::test_utils::compare::{assert_records_eq, assert_same_records, record};
use crate::test_utils::movie_fixture::{movie_store, write_json_fixture, DATASET};

fn s(v: &str) -> Datum {
    Datum::from(v)
}

#[tokio::test]
async fn test_top_three_directors_by_total_budget() {
    let db = MovieDb::open("directors_by_budget").await;

    let result = db
        .select_multiple_rows(&reports::top_directors_by_budget(3))
        .expect("query failed");

    assert_records_eq(
        &result,
        &[
            record([
                ("director", s("Ridley Scott")),
                ("total_budget", Datum::Float(722882143.58)),
            ]),
            record([
                ("director", s("Michael Bay")),
                ("total_budget", Datum::Float(518297522.1)),
            ]),
            record([
                ("director", s("David Yates")),
                ("total_budget", Datum::Float(504100108.5)),
            ]),
        ],
    );

    db.close();
}

#[tokio::test]
async fn test_top_ten_keywords_by_appearance() {
    let db = MovieDb::open("top_keywords").await;

    let result = db
        .select_multiple_rows(&reports::top_keywords(10))
        .expect("query failed");

    let expected: Vec<_> = [
        ("woman director", 162),
        ("independent film", 115),
        ("based on novel", 85),
        ("duringcreditsstinger", 82),
        ("biography", 78),
        ("murder", 66),
        ("sex", 60),
        ("revenge", 51),
        ("sport", 50),
        ("high school", 48),
    ]
    .into_iter()
    .map(|(keyword, count)| record([("keyword", s(keyword)), ("count", Datum::Int(count))]))
    .collect();
    assert_records_eq(&result, &expected);

    db.close();
}

#[tokio::test]
async fn test_actor_count_for_movies_called_life() {
    let db = MovieDb::open("life_actor_count").await;

    let result = db
        .select_single_row(&reports::actor_count_for_title("Life"))
        .expect("query failed");

    assert_same_records(
        &[result],
        &[record([("original_title", s("Life")), ("count", Datum::Int(12))])],
    );

    db.close();
}

#[tokio::test]
async fn test_actor_count_for_missing_title() {
    let db = MovieDb::open("missing_title").await;

    // The implicit group exists even when the filter removes every row
    let result = db
        .select_single_row(&reports::actor_count_for_title("Solaris"))
        .expect("query failed");

    assert_eq!(
        result,
        record([("original_title", Datum::Null), ("count", Datum::Int(0))])
    );

    db.close();
}

#[tokio::test]
async fn test_top_three_genres_by_five_star_ratings() {
    let db = MovieDb::open("five_star_genres").await;

    let result = db
        .select_multiple_rows(&reports::top_five_star_genres(3))
        .expect("query failed");

    assert_records_eq(
        &result,
        &[
            record([("genre", s("Drama")), ("five_stars_count", Datum::Int(15052))]),
            record([("genre", s("Thriller")), ("five_stars_count", Datum::Int(11771))]),
            record([("genre", s("Crime")), ("five_stars_count", Datum::Int(8670))]),
        ],
    );

    db.close();
}

#[tokio::test]
async fn test_top_three_genres_by_average_rating() {
    let db = MovieDb::open("genres_by_average").await;

    let result = db
        .select_multiple_rows(&reports::top_genres_by_average_rating(3))
        .expect("query failed");

    assert_records_eq(
        &result,
        &[
            record([("genre", s("Crime")), ("avg_rating", Datum::Float(3.79))]),
            record([("genre", s("Music")), ("avg_rating", Datum::Float(3.73))]),
            record([("genre", s("Documentary")), ("avg_rating", Datum::Float(3.71))]),
        ],
    );

    db.close();
}

#[tokio::test]
async fn test_reports_from_json_fixture() {
    let dir = TempDir::new().expect("temp dir");
    write_json_fixture(&movie_store(), dir.path(), DATASET).expect("write fixture");

    let config = LoaderConfig::default().with_fixture_dir(dir.path());
    let source = JsonFixtureSource::new(&config.fixture_dir);
    let catalog = movies::schema().unwrap();
    let db = Database::from_existing(&source, DATASET, &catalog, &config)
        .await
        .expect("load from JSON failed");

    let from_memory = MovieDb::open("json_fixture").await;
    for report in Report::ALL {
        let expected = from_memory
            .select_multiple_rows(&report.query())
            .expect("memory query failed");
        let actual = db
            .select_multiple_rows(&report.query())
            .expect("json query failed");
        assert_records_eq(&actual, &expected);
    }

    from_memory.close();
    db.close();
}
