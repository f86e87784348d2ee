//! User account management.

use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::{ListParams, Paginated},
        user::{Role, UpdateUserDto, UserDto, UserFilter},
    },
    server::{
        data::user::{UserRepository, USER_SORTABLE},
        error::{domain::DomainError, Error},
        service::retry::RetryContext,
        util::pagination::ListQuery,
    },
};

/// Service for managing user accounts.
///
/// Single user reads use automatic retry logic for transient failures.
pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    /// Creates a new instance of [`UserService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Retrieves a user by ID.
    ///
    /// # Returns
    /// - `Ok(Some(UserDto))` - User found
    /// - `Ok(None)` - User not found in database
    /// - `Err(Error::DbErr)` - Database operation failed after retries
    /// - `Err(Error::ParseError)` - Stored role is not a known role
    pub async fn get_user(&self, user_id: i32) -> Result<Option<UserDto>, Error> {
        let mut ctx: RetryContext<()> = RetryContext::new();

        let db = self.db.clone();

        ctx.execute_with_retry(&format!("get user ID {}", user_id), |_| {
            let db = db.clone();

            Box::pin(async move {
                let user_repo = UserRepository::new(&db);

                user_repo
                    .get_by_id(user_id)
                    .await?
                    .map(UserDto::try_from)
                    .transpose()
            })
        })
        .await
    }

    pub async fn list(
        &self,
        params: &ListParams,
        filter: &UserFilter,
    ) -> Result<Paginated<UserDto>, Error> {
        let query = ListQuery::from_params(params, USER_SORTABLE, entity::app_user::Column::CreatedAt)?;

        UserRepository::new(self.db)
            .list(&query, filter)
            .await?
            .try_map(UserDto::try_from)
    }

    /// Updates a user's name, role or active flag.
    ///
    /// # Returns
    /// - `Ok(UserDto)` - Updated user
    /// - `Err(DomainError::Validation)` - Blank name
    /// - `Err(DomainError::NotFound)` - No user with `user_id`
    /// - `Err(DomainError::Conflict)` - `actor_id` tried to demote or deactivate themselves
    pub async fn update(
        &self,
        actor_id: i32,
        user_id: i32,
        update: UpdateUserDto,
    ) -> Result<UserDto, Error> {
        if actor_id == user_id {
            if update.role.is_some_and(|role| role != Role::Admin) {
                return Err(DomainError::conflict("Administrators cannot change their own role").into());
            }
            if update.is_active == Some(false) {
                return Err(DomainError::conflict("Administrators cannot deactivate themselves").into());
            }
        }

        let update = UpdateUserDto {
            name: match update.name {
                Some(name) if name.trim().is_empty() => {
                    return Err(DomainError::validation("name: must not be blank").into())
                }
                name => name.map(|n| n.trim().to_string()),
            },
            ..update
        };

        let user = UserRepository::new(self.db)
            .update(user_id, &update)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        tracing::info!("User ID {} updated user ID {}", actor_id, user_id);

        UserDto::try_from(user)
    }
}
