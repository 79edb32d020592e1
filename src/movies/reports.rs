//! Canned report queries over the movie dataset

use std::fmt;
use std::str::FromStr;

use crate::planner::{Aggregate, Query};

use super::{
    ACTORS, DIRECTORS, GENRES, KEYWORDS, MOVIES, MOVIE_ACTORS, MOVIE_DIRECTORS, MOVIE_GENRES,
    MOVIE_KEYWORDS, MOVIE_RATINGS,
};

/// Directors ranked by the summed adjusted budget of their movies
pub fn top_directors_by_budget(limit: u64) -> Query {
    Query::from(DIRECTORS)
        .inner_join(MOVIE_DIRECTORS, "directors.id", "movie_directors.director_id")
        .inner_join(MOVIES, "movie_directors.movie_id", "movies.id")
        .group_by("full_name")
        .select_as("full_name", "director")
        .aggregate(Aggregate::sum("budget_adjusted").rounded(2), "total_budget")
        .order_by_desc("total_budget")
        .limit(limit)
        .build()
}

/// Keywords ranked by the number of movies tagged with them
pub fn top_keywords(limit: u64) -> Query {
    Query::from(KEYWORDS)
        .inner_join(MOVIE_KEYWORDS, "keywords.id", "movie_keywords.keyword_id")
        .inner_join(MOVIES, "movie_keywords.movie_id", "movies.id")
        .group_by("keyword")
        .select("keyword")
        .count_star("count")
        .order_by_desc("count")
        .limit(limit)
        .build()
}

/// Number of actor credits across movies with the given title
pub fn actor_count_for_title(title: &str) -> Query {
    Query::from(ACTORS)
        .inner_join(MOVIE_ACTORS, "actors.id", "movie_actors.actor_id")
        .inner_join(MOVIES, "movie_actors.movie_id", "movies.id")
        .where_eq("original_title", title)
        .select("original_title")
        .count_star("count")
        .build()
}

/// Genres ranked by the number of five-star ratings
pub fn top_five_star_genres(limit: u64) -> Query {
    Query::from(GENRES)
        .inner_join(MOVIE_GENRES, "genres.id", "movie_genres.genre_id")
        .inner_join(MOVIE_RATINGS, "movie_genres.movie_id", "movie_ratings.movie_id")
        .where_eq("rating", 5)
        .group_by("genre")
        .select("genre")
        .count_star("five_stars_count")
        .order_by_desc("five_stars_count")
        .limit(limit)
        .build()
}

/// Genres ranked by average rating
pub fn top_genres_by_average_rating(limit: u64) -> Query {
    Query::from(GENRES)
        .inner_join(MOVIE_GENRES, "genres.id", "movie_genres.genre_id")
        .inner_join(MOVIE_RATINGS, "movie_genres.movie_id", "movie_ratings.movie_id")
        .group_by("genre")
        .select("genre")
        .aggregate(Aggregate::avg("rating").rounded(2), "avg_rating")
        .order_by_desc("avg_rating")
        .limit(limit)
        .build()
}

/// A named report with its default parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    DirectorsByBudget,
    TopKeywords,
    LifeActorCount,
    FiveStarGenres,
    GenresByAverageRating,
}

impl Report {
    pub const ALL: [Report; 5] = [
        Report::DirectorsByBudget,
        Report::TopKeywords,
        Report::LifeActorCount,
        Report::FiveStarGenres,
        Report::GenresByAverageRating,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Report::DirectorsByBudget => "directors-by-budget",
            Report::TopKeywords => "top-keywords",
            Report::LifeActorCount => "life-actor-count",
            Report::FiveStarGenres => "five-star-genres",
            Report::GenresByAverageRating => "genres-by-average-rating",
        }
    }

    pub fn query(&self) -> Query {
        match self {
            Report::DirectorsByBudget => top_directors_by_budget(3),
            Report::TopKeywords => top_keywords(10),
            Report::LifeActorCount => actor_count_for_title("Life"),
            Report::FiveStarGenres => top_five_star_genres(3),
            Report::GenresByAverageRating => top_genres_by_average_rating(3),
        }
    }

    /// Single-row lookup rather than a ranked list
    pub fn is_single_row(&self) -> bool {
        matches!(self, Report::LifeActorCount)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Report {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Report::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| format!("unknown report: {}", s))
    }
}
