use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::{
    model::{
        api::Paginated,
        invitation::{InvitationFilter, InvitationStatus},
        user::Role,
    },
    server::util::pagination::{fetch_page, ListQuery},
};

use entity::invitation::Column;

pub const INVITATION_SORTABLE: &[(&str, Column)] = &[
    ("email", Column::Email),
    ("expires_at", Column::ExpiresAt),
    ("created_at", Column::CreatedAt),
];

pub struct InvitationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> InvitationRepository<'a, C> {
    /// Creates a new instance of [`InvitationRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a pending invitation
    pub async fn create(
        &self,
        email: &str,
        role: Role,
        token: &str,
        invited_by: i32,
        expires_at: NaiveDateTime,
    ) -> Result<entity::invitation::Model, DbErr> {
        let invitation = entity::invitation::ActiveModel {
            email: ActiveValue::Set(email.to_string()),
            role: ActiveValue::Set(role.as_str().to_string()),
            token: ActiveValue::Set(token.to_string()),
            invited_by: ActiveValue::Set(invited_by),
            status: ActiveValue::Set(InvitationStatus::Pending.as_str().to_string()),
            expires_at: ActiveValue::Set(expires_at),
            accepted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        invitation.insert(self.db).await
    }

    pub async fn get_by_id(
        &self,
        invitation_id: i32,
    ) -> Result<Option<entity::invitation::Model>, DbErr> {
        entity::prelude::Invitation::find_by_id(invitation_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<entity::invitation::Model>, DbErr> {
        entity::prelude::Invitation::find()
            .filter(Column::Token.eq(token))
            .one(self.db)
            .await
    }

    /// Finds a pending, unexpired invitation for an email
    pub async fn find_open_for_email(
        &self,
        email: &str,
        now: NaiveDateTime,
    ) -> Result<Option<entity::invitation::Model>, DbErr> {
        entity::prelude::Invitation::find()
            .filter(Column::Email.eq(email))
            .filter(Column::Status.eq(InvitationStatus::Pending.as_str()))
            .filter(Column::ExpiresAt.gt(now))
            .one(self.db)
            .await
    }

    pub async fn list(
        &self,
        query: &ListQuery<Column>,
        filter: &InvitationFilter,
    ) -> Result<Paginated<entity::invitation::Model>, DbErr> {
        let mut select = entity::prelude::Invitation::find();

        if let Some(status) = filter.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        if let Some(term) = &query.search {
            select = select.filter(Column::Email.contains(term));
        }

        let select = select
            .order_by(query.sort, query.order.clone())
            .order_by_asc(Column::Id);

        fetch_page(self.db, select, query.page, query.per_page).await
    }

    /// Sets the status of an invitation, recording `accepted_at` when accepting
    pub async fn set_status(
        &self,
        invitation: entity::invitation::Model,
        status: InvitationStatus,
    ) -> Result<entity::invitation::Model, DbErr> {
        let mut invitation_am = invitation.into_active_model();
        invitation_am.status = ActiveValue::Set(status.as_str().to_string());

        if status == InvitationStatus::Accepted {
            invitation_am.accepted_at = ActiveValue::Set(Some(Utc::now().naive_utc()));
        }

        invitation_am.update(self.db).await
    }

    /// Marks every pending invitation that expired before `now` as expired
    ///
    /// Returns the number of invitations updated.
    pub async fn expire_pending(&self, now: NaiveDateTime) -> Result<u64, DbErr> {
        let result = entity::prelude::Invitation::update_many()
            .col_expr(
                Column::Status,
                Expr::value(InvitationStatus::Expired.as_str()),
            )
            .filter(Column::Status.eq(InvitationStatus::Pending.as_str()))
            .filter(Column::ExpiresAt.lte(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
