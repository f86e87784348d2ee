//! Shared test setup for Roost.
//!
//! Tests declare the tables they need with [`TestBuilder`], then insert rows through the
//! fixture helpers on the returned [`TestContext`]:
//!
//! ```ignore
//! let test = TestBuilder::new().with_all_tables().build().await?;
//! let admin = test.user().insert_user("admin@example.com", "admin").await?;
//! let property = test.rental().insert_property(admin.id).await?;
//! ```

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        constant::{TEST_JWT_AUDIENCE, TEST_JWT_SECRET},
        fixtures::{
            auth::{access_token, signed_token},
            rental::date,
            user::subject_for,
        },
        TestBuilder, TestContext, TestError,
    };
}
