use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    config::Config, error::Error, scheduler::Scheduler, service::invitation::InvitationService,
};

/// Top of every hour
pub const INVITATION_EXPIRY_CRON: &str = "0 0 * * * *";

/// Marks pending invitations past their expiry as expired
pub async fn expire_invitations(db: DatabaseConnection, config: Arc<Config>) -> Result<u64, Error> {
    let expired = InvitationService::new(&db, &config)
        .expire(Utc::now().naive_utc())
        .await?;

    if expired > 0 {
        tracing::info!("Expired {} invitation(s)", expired);
    }

    Ok(expired)
}

/// Registers all maintenance jobs and starts the scheduler
pub async fn start_scheduler(db: &DatabaseConnection, config: Arc<Config>) -> Result<(), Error> {
    let mut scheduler = Scheduler::new(db.clone(), config).await?;

    scheduler
        .schedule_job(
            INVITATION_EXPIRY_CRON,
            "invitation expiry",
            expire_invitations,
        )
        .await?;

    scheduler.start().await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use roost_test_utils::prelude::*;

    use crate::server::{
        config::Config, data::user::invitation::InvitationRepository,
        scheduler::cron::expire_invitations,
    };

    /// Expect overdue pending invitations to be expired by the job
    #[tokio::test]
    async fn expires_overdue_invitations() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let admin = test.user().insert_admin().await?;
        let overdue = test
            .user()
            .insert_invitation(admin.id, "late@example.com", "late", "pending", -1)
            .await?;

        let expired = expire_invitations(test.db.clone(), Arc::new(Config::for_tests())).await;

        assert!(matches!(expired, Ok(1)));
        let stored = InvitationRepository::new(&test.db)
            .get_by_id(overdue.id)
            .await?
            .unwrap();
        assert_eq!(stored.status, "expired");

        Ok(())
    }
}
