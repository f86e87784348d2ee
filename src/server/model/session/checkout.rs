//! Checkout wizard draft stored in the session.
//!
//! The draft is written after every completed wizard step and removed once the checkout is
//! submitted or cancelled, so at most one checkout is in progress per session.

use tower_sessions::Session;

use crate::{model::checkout::CheckoutDraft, server::error::Error};

pub const SESSION_CHECKOUT_DRAFT_KEY: &str = "roost:checkout:draft";

pub struct SessionCheckoutDraft;

impl SessionCheckoutDraft {
    /// Stores the draft, replacing any previous one
    pub async fn insert(session: &Session, draft: &CheckoutDraft) -> Result<(), Error> {
        session.insert(SESSION_CHECKOUT_DRAFT_KEY, draft).await?;

        Ok(())
    }

    pub async fn get(session: &Session) -> Result<Option<CheckoutDraft>, Error> {
        Ok(session.get(SESSION_CHECKOUT_DRAFT_KEY).await?)
    }

    /// Removes and returns the draft
    pub async fn remove(session: &Session) -> Result<Option<CheckoutDraft>, Error> {
        Ok(session.remove(SESSION_CHECKOUT_DRAFT_KEY).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use roost_test_utils::prelude::*;

    use crate::{
        model::checkout::{CheckoutDraft, CheckoutStep},
        server::model::session::checkout::SessionCheckoutDraft,
    };

    fn draft() -> CheckoutDraft {
        CheckoutDraft {
            booking_id: 1,
            unit_id: 2,
            step: CheckoutStep::Inventory,
            expected: Vec::new(),
            inventory: None,
            condition: None,
            media_ids: Vec::new(),
            started_at: Utc::now().naive_utc(),
        }
    }

    /// Tests that a stored draft is returned unchanged.
    ///
    /// Expected: Ok(Some(draft)) equal to the inserted draft
    #[tokio::test]
    async fn round_trips_draft() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;
        let draft = draft();

        SessionCheckoutDraft::insert(&test.session, &draft).await.unwrap();
        let result = SessionCheckoutDraft::get(&test.session).await.unwrap();

        assert_eq!(result, Some(draft));

        Ok(())
    }

    /// Tests that removing the draft leaves the session without one.
    ///
    /// Expected: remove returns the draft, a following get returns None
    #[tokio::test]
    async fn remove_clears_draft() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;
        SessionCheckoutDraft::insert(&test.session, &draft()).await.unwrap();

        let removed = SessionCheckoutDraft::remove(&test.session).await.unwrap();
        let remaining = SessionCheckoutDraft::get(&test.session).await.unwrap();

        assert!(removed.is_some());
        assert!(remaining.is_none());

        Ok(())
    }
}
