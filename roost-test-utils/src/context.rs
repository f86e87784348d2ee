//! Test context returned by `TestBuilder`.

use std::sync::Arc;

use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use tower_sessions::{MemoryStore, Session};

use crate::{
    error::TestError,
    fixtures::{
        inventory::InventoryFixtures, media::MediaFixtures, rental::RentalFixtures,
        user::UserFixtures,
    },
};

/// Test environment with an in-memory SQLite database and a memory backed session.
pub struct TestContext {
    /// Database connection to in-memory SQLite database
    pub db: DatabaseConnection,
    /// Session used by handlers under test
    pub session: Session,
}

impl TestContext {
    pub(crate) async fn new() -> Result<Self, TestError> {
        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestContext { db, session })
    }

    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// A fresh session sharing nothing with `self.session`, for tests involving two users.
    pub fn new_session(&self) -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    pub fn user(&self) -> UserFixtures<'_> {
        UserFixtures { db: &self.db }
    }

    pub fn rental(&self) -> RentalFixtures<'_> {
        RentalFixtures { db: &self.db }
    }

    pub fn inventory(&self) -> InventoryFixtures<'_> {
        InventoryFixtures { db: &self.db }
    }

    pub fn media(&self) -> MediaFixtures<'_> {
        MediaFixtures { db: &self.db }
    }
}
