//! Schema and type errors surfaced through the database handle.

use reeldb::database::DatabaseError;
use reeldb::executor::ExecutorError;
use reeldb::planner::{Aggregate, PlannerError, Query};

use crate::movies_suite::MovieDb;

fn planner_error(err: DatabaseError) -> PlannerError {
    match err {
        DatabaseError::Executor(ExecutorError::Plan(e)) => e,
        other => panic!("expected a planner error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_table() {
    let db = MovieDb::open("unknown_table").await;

    let err = db
        .select_multiple_rows(&Query::from("studios").count_star("n").build())
        .unwrap_err();
    assert!(err.is_schema_error());
    assert_eq!(planner_error(err), PlannerError::UnknownTable("studios".to_string()));

    db.close();
}

#[tokio::test]
async fn test_unknown_column() {
    let db = MovieDb::open("unknown_column").await;

    let query = Query::from("directors")
        .inner_join("movie_directors", "directors.id", "movie_directors.director_id")
        .group_by("full_name")
        .select("full_name")
        .aggregate(Aggregate::sum("budget"), "total")
        .build();
    let err = db.select_multiple_rows(&query).unwrap_err();
    assert!(matches!(planner_error(err), PlannerError::UnknownColumn(c) if c == "budget"));

    db.close();
}

#[tokio::test]
async fn test_ambiguous_column() {
    let db = MovieDb::open("ambiguous_column").await;

    // Both tables have an `id` column
    let query = Query::from("genres")
        .inner_join("movie_genres", "genres.id", "movie_genres.genre_id")
        .inner_join("movies", "movie_genres.movie_id", "movies.id")
        .select("id")
        .build();
    let err = db.select_multiple_rows(&query).unwrap_err();
    assert!(err.is_schema_error());
    assert!(matches!(planner_error(err), PlannerError::AmbiguousColumn { .. }));

    db.close();
}

#[tokio::test]
async fn test_sum_of_text_column() {
    let db = MovieDb::open("sum_text").await;

    let query = Query::from("genres")
        .aggregate(Aggregate::sum("genre"), "total")
        .build();
    let err = db.select_multiple_rows(&query).unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Executor(ref e) if e.is_type_mismatch()
    ));

    db.close();
}

#[tokio::test]
async fn test_filter_literal_type_mismatch() {
    let db = MovieDb::open("filter_mismatch").await;

    let query = Query::from("movie_ratings")
        .where_eq("rating", "five")
        .count_star("n")
        .build();
    let err = db.select_multiple_rows(&query).unwrap_err();
    assert!(matches!(
        planner_error(err),
        PlannerError::TypeMismatch { .. }
    ));

    db.close();
}

#[tokio::test]
async fn test_average_of_only_nulls_is_empty_group() {
    let db = MovieDb::open("avg_empty_group").await;

    // Every budget of Jane Campion's movies is NULL
    let query = Query::from("directors")
        .inner_join("movie_directors", "directors.id", "movie_directors.director_id")
        .inner_join("movies", "movie_directors.movie_id", "movies.id")
        .where_eq("full_name", "Jane Campion")
        .aggregate(Aggregate::avg("budget_adjusted"), "avg_budget")
        .build();
    let err = db.select_multiple_rows(&query).unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Executor(ExecutorError::EmptyGroup(_))
    ));

    // SUM over the same rows is NULL instead
    let query = Query::from("directors")
        .inner_join("movie_directors", "directors.id", "movie_directors.director_id")
        .inner_join("movies", "movie_directors.movie_id", "movies.id")
        .where_eq("full_name", "Jane Campion")
        .aggregate(Aggregate::sum("budget_adjusted"), "total")
        .build();
    let row = db.select_single_row(&query).unwrap();
    assert!(row.get("total").is_some_and(|d| d.is_null()));

    db.close();
}
