pub mod invitation;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::{
    model::{
        api::Paginated,
        user::{Role, UpdateUserDto, UserFilter},
    },
    server::util::pagination::{fetch_page, ListQuery},
};

use entity::app_user::Column;

/// Columns users can be sorted by
pub const USER_SORTABLE: &[(&str, Column)] = &[
    ("name", Column::Name),
    ("email", Column::Email),
    ("role", Column::Role),
    ("created_at", Column::CreatedAt),
];

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new active user
    pub async fn create(
        &self,
        auth_subject: &str,
        email: &str,
        name: &str,
        role: Role,
    ) -> Result<entity::app_user::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let user = entity::app_user::ActiveModel {
            auth_subject: ActiveValue::Set(auth_subject.to_string()),
            email: ActiveValue::Set(email.to_string()),
            name: ActiveValue::Set(name.to_string()),
            role: ActiveValue::Set(role.as_str().to_string()),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        user.insert(self.db).await
    }

    pub async fn get_by_id(&self, user_id: i32) -> Result<Option<entity::app_user::Model>, DbErr> {
        entity::prelude::AppUser::find_by_id(user_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_subject(
        &self,
        auth_subject: &str,
    ) -> Result<Option<entity::app_user::Model>, DbErr> {
        entity::prelude::AppUser::find()
            .filter(Column::AuthSubject.eq(auth_subject))
            .one(self.db)
            .await
    }

    /// Finds a user by email, `email` must already be normalized to lower case
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<entity::app_user::Model>, DbErr> {
        entity::prelude::AppUser::find()
            .filter(Column::Email.eq(email))
            .one(self.db)
            .await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::AppUser::find().count(self.db).await
    }

    /// Lists users matching `filter`, searching name and email
    pub async fn list(
        &self,
        query: &ListQuery<Column>,
        filter: &UserFilter,
    ) -> Result<Paginated<entity::app_user::Model>, DbErr> {
        let mut select = entity::prelude::AppUser::find();

        if let Some(role) = filter.role {
            select = select.filter(Column::Role.eq(role.as_str()));
        }

        if let Some(is_active) = filter.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

        if let Some(term) = &query.search {
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(term))
                    .add(Column::Email.contains(term)),
            );
        }

        let select = select
            .order_by(query.sort, query.order.clone())
            .order_by_asc(Column::Id);

        fetch_page(self.db, select, query.page, query.per_page).await
    }

    /// Applies the set fields of `update`
    ///
    /// Returns `Ok(None)` when the user does not exist.
    pub async fn update(
        &self,
        user_id: i32,
        update: &UpdateUserDto,
    ) -> Result<Option<entity::app_user::Model>, DbErr> {
        let Some(user) = self.get_by_id(user_id).await? else {
            return Ok(None);
        };

        let mut user_am = user.into_active_model();

        if let Some(name) = &update.name {
            user_am.name = ActiveValue::Set(name.clone());
        }
        if let Some(role) = update.role {
            user_am.role = ActiveValue::Set(role.as_str().to_string());
        }
        if let Some(is_active) = update.is_active {
            user_am.is_active = ActiveValue::Set(is_active);
        }
        user_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(user_am.update(self.db).await?))
    }
}
