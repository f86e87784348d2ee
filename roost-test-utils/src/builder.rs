//! Declarative test builder.
//!
//! Queues the tables a test needs and creates them against a fresh in-memory SQLite database
//! when `build()` is called.

use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{error::TestError, TestContext};

/// Builder for test initialization.
///
/// Methods can be chained together and finalized with `build()`.
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_all_tables: bool,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Create a new TestBuilder without any tables configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_all_tables: false,
        }
    }

    /// Create every table of the schema, parents before children so foreign keys resolve.
    pub fn with_all_tables(mut self) -> Self {
        self.include_all_tables = true;
        self
    }

    /// Add a single entity table to the test database.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use roost_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), roost_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(AppUser)
    ///     .with_table(Invitation)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Build the test context and create all configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Test environment ready for use
    /// - `Err(TestError::DbErr)` - Database connection or table creation failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let context = TestContext::new().await?;

        let mut all_tables = Vec::new();

        if self.include_all_tables {
            let schema = Schema::new(sea_orm::DbBackend::Sqlite);
            all_tables.extend(vec![
                schema.create_table_from_entity(entity::prelude::AppUser),
                schema.create_table_from_entity(entity::prelude::Property),
                schema.create_table_from_entity(entity::prelude::Unit),
                schema.create_table_from_entity(entity::prelude::Guest),
                schema.create_table_from_entity(entity::prelude::Booking),
                schema.create_table_from_entity(entity::prelude::InventoryItem),
                schema.create_table_from_entity(entity::prelude::InventoryAssignment),
                schema.create_table_from_entity(entity::prelude::CheckoutReport),
                schema.create_table_from_entity(entity::prelude::CheckoutItemCheck),
                schema.create_table_from_entity(entity::prelude::Media),
                schema.create_table_from_entity(entity::prelude::Invitation),
            ]);
        }

        all_tables.extend(self.tables);
        context.with_tables(all_tables).await?;

        Ok(context)
    }
}
