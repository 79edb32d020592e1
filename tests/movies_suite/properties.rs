//! Invariants of join, grouping, ordering and limiting over the movie dataset.

use reeldb::executor::Record;
use reeldb::movies::reports;
use reeldb::planner::{Aggregate, Query};

use crate::movies_suite::MovieDb;

fn int(record: &Record, field: &str) -> i64 {
    record
        .get(field)
        .and_then(|d| d.as_int())
        .unwrap_or_else(|| panic!("{} is not an integer in {:?}", field, record))
}

fn float(record: &Record, field: &str) -> f64 {
    record
        .get(field)
        .and_then(|d| d.as_float())
        .unwrap_or_else(|| panic!("{} is not numeric in {:?}", field, record))
}

fn ratings_by_genre() -> reeldb::planner::QueryBuilder {
    Query::from("genres")
        .inner_join("movie_genres", "genres.id", "movie_genres.genre_id")
        .inner_join("movie_ratings", "movie_genres.movie_id", "movie_ratings.movie_id")
        .group_by("genre")
        .select("genre")
}

#[tokio::test]
async fn test_join_drops_unmatched_keys() {
    let db = MovieDb::open("join_drops_unmatched").await;

    // "silent film" tags no movie, "Western" has no movies
    let keywords = db
        .select_multiple_rows(&reports::top_keywords(100))
        .unwrap();
    assert_eq!(keywords.len(), 12);
    assert!(keywords
        .iter()
        .all(|r| r.get("keyword").and_then(|d| d.as_str()) != Some("silent film")));

    let genres = db
        .select_multiple_rows(&reports::top_five_star_genres(100))
        .unwrap();
    assert!(genres
        .iter()
        .all(|r| r.get("genre").and_then(|d| d.as_str()) != Some("Western")));

    db.close();
}

#[tokio::test]
async fn test_group_counts_sum_to_filtered_rows() {
    let db = MovieDb::open("group_counts_sum").await;

    let groups = db
        .select_multiple_rows(&reports::top_five_star_genres(100))
        .unwrap();
    let grouped_total: i64 = groups.iter().map(|r| int(r, "five_stars_count")).sum();

    let total = db
        .select_single_row(
            &Query::from("movie_ratings")
                .where_eq("rating", 5)
                .count_star("n")
                .build(),
        )
        .unwrap();
    assert_eq!(grouped_total, int(&total, "n"));
    assert_eq!(grouped_total, 15052 + 11771 + 8670 + 500);

    db.close();
}

#[tokio::test]
async fn test_avg_times_count_equals_sum() {
    let db = MovieDb::open("avg_count_sum").await;

    let groups = db
        .select_multiple_rows(
            &ratings_by_genre()
                .aggregate(Aggregate::avg("rating"), "avg")
                .count_star("n")
                .aggregate(Aggregate::sum("rating"), "total")
                .build(),
        )
        .unwrap();
    assert_eq!(groups.len(), 6);

    for group in &groups {
        let product = float(group, "avg") * int(group, "n") as f64;
        let total = float(group, "total");
        assert!(
            (product - total).abs() <= total * 1e-9,
            "{:?}: {} != {}",
            group,
            product,
            total
        );
    }

    db.close();
}

#[tokio::test]
async fn test_descending_order_is_non_increasing() {
    let db = MovieDb::open("descending_order").await;

    let groups = db
        .select_multiple_rows(
            &ratings_by_genre()
                .aggregate(Aggregate::avg("rating"), "avg")
                .order_by_desc("avg")
                .build(),
        )
        .unwrap();
    let values: Vec<f64> = groups.iter().map(|r| float(r, "avg")).collect();
    assert!(values.windows(2).all(|w| w[0] >= w[1]), "{:?}", values);

    // Unrounded ordering separates Thriller from Drama even though both round to 3.5
    let names: Vec<_> = groups
        .iter()
        .filter_map(|r| r.get("genre").and_then(|d| d.as_str()).map(str::to_string))
        .collect();
    assert_eq!(
        names,
        vec!["Crime", "Music", "Documentary", "Comedy", "Thriller", "Drama"]
    );

    db.close();
}

#[tokio::test]
async fn test_limit_yields_min_of_limit_and_groups() {
    let db = MovieDb::open("limit_min").await;

    for (limit, expected) in [(0, 0), (2, 2), (6, 6), (100, 6)] {
        let rows = db
            .select_multiple_rows(&reports::top_genres_by_average_rating(limit))
            .unwrap();
        assert_eq!(rows.len(), expected, "limit {}", limit);
    }

    db.close();
}

#[tokio::test]
async fn test_offset_skips_leading_groups() {
    let db = MovieDb::open("offset").await;

    let query = Query::from("keywords")
        .inner_join("movie_keywords", "keywords.id", "movie_keywords.keyword_id")
        .group_by("keyword")
        .select("keyword")
        .count_star("count")
        .order_by_desc("count")
        .offset(1)
        .limit(2)
        .build();
    let rows = db.select_multiple_rows(&query).unwrap();
    let counts: Vec<i64> = rows.iter().map(|r| int(r, "count")).collect();
    assert_eq!(counts, vec![115, 85]);

    db.close();
}
