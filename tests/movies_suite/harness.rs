//! Test harness for movies_suite integration tests.
//!
//! The synthetic dataset is built once per binary; each test opens its own
//! handle on that snapshot and closes it when done.

use std::ops::Deref;

use reeldb::config::LoaderConfig;
use reeldb::database::Database;
use reeldb::movies;
use reeldb::storage::MemorySource;

use crate::test_utils::init_tracing;
use crate::test_utils::movie_fixture::{movie_store, DATASET};

/// Database handle scoped to one test
pub struct MovieDb {
    test_name: String,
    db: Database,
}

impl MovieDb {
    /// Open the shared movie dataset.
    pub async fn open(name: &str) -> Self {
        init_tracing();
        let source = MemorySource::new().with_dataset(DATASET, movie_store());
        let catalog = movies::schema().expect("movie schema");
        let db = Database::from_existing(&source, DATASET, &catalog, &LoaderConfig::default())
            .await
            .unwrap_or_else(|e| panic!("{}: failed to open movie dataset: {}", name, e));
        tracing::debug!(test = name, "opened movie dataset");
        Self {
            test_name: name.to_string(),
            db,
        }
    }

    /// Release the handle.
    pub fn close(self) {
        tracing::debug!(test = %self.test_name, "closing movie dataset");
        self.db.close();
    }
}

impl Deref for MovieDb {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.db
    }
}
