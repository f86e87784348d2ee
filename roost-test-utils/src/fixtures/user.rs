use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue};

use crate::error::TestError;

pub struct UserFixtures<'a> {
    pub(crate) db: &'a sea_orm::DatabaseConnection,
}

/// Auth provider subject assigned to fixture users
pub fn subject_for(email: &str) -> String {
    format!("auth|{}", email)
}

impl<'a> UserFixtures<'a> {
    /// Insert an active user with the given role, the auth subject is derived from the email.
    pub async fn insert_user(
        &self,
        email: &str,
        role: &str,
    ) -> Result<entity::app_user::Model, TestError> {
        let now = Utc::now().naive_utc();

        let user = entity::app_user::ActiveModel {
            auth_subject: ActiveValue::Set(subject_for(email)),
            email: ActiveValue::Set(email.to_string()),
            name: ActiveValue::Set("Test User".to_string()),
            role: ActiveValue::Set(role.to_string()),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(user.insert(self.db).await?)
    }

    pub async fn insert_admin(&self) -> Result<entity::app_user::Model, TestError> {
        self.insert_user("admin@example.com", "admin").await
    }

    /// Insert a user with `is_active` set to false
    pub async fn insert_inactive_user(
        &self,
        email: &str,
        role: &str,
    ) -> Result<entity::app_user::Model, TestError> {
        let user = self.insert_user(email, role).await?;

        let mut user_am: entity::app_user::ActiveModel = user.into();
        user_am.is_active = ActiveValue::Set(false);

        Ok(user_am.update(self.db).await?)
    }

    /// Insert an invitation expiring `expires_in_hours` from now, negative values are expired.
    pub async fn insert_invitation(
        &self,
        invited_by: i32,
        email: &str,
        token: &str,
        status: &str,
        expires_in_hours: i64,
    ) -> Result<entity::invitation::Model, TestError> {
        let now = Utc::now().naive_utc();

        let invitation = entity::invitation::ActiveModel {
            email: ActiveValue::Set(email.to_string()),
            role: ActiveValue::Set("staff".to_string()),
            token: ActiveValue::Set(token.to_string()),
            invited_by: ActiveValue::Set(invited_by),
            status: ActiveValue::Set(status.to_string()),
            expires_at: ActiveValue::Set(now + chrono::Duration::hours(expires_in_hours)),
            accepted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(invitation.insert(self.db).await?)
    }
}
