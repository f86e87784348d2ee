//! Invitations are how new users join, the first admin aside.

use chrono::{NaiveDateTime, TimeDelta, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{ListParams, Paginated},
        invitation::{
            AcceptInvitationDto, CreateInvitationDto, InvitationDto, InvitationFilter,
            InvitationStatus, PublicInvitationDto,
        },
        user::UserDto,
    },
    server::{
        config::Config,
        data::user::{
            invitation::{InvitationRepository, INVITATION_SORTABLE},
            UserRepository,
        },
        error::{auth::AuthError, domain::DomainError, Error},
        model::db::{parse_column, InvitationModel},
        service::auth::verify_token,
        util::{
            pagination::ListQuery,
            token::{random_token, INVITATION_TOKEN_LEN},
        },
    },
};

/// Trims and lower-cases an email, rejecting values that are clearly not addresses
pub fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(DomainError::validation("email: must be a valid email address")),
    }
}

/// Conflict unless the invitation is pending and has not expired at `now`
fn ensure_open(invitation: &InvitationModel, now: NaiveDateTime) -> Result<(), Error> {
    let status: InvitationStatus = parse_column(&invitation.status)?;

    if status != InvitationStatus::Pending {
        return Err(DomainError::conflict(format!("Invitation is {}", status)).into());
    }
    if invitation.expires_at <= now {
        return Err(DomainError::conflict("Invitation has expired").into());
    }

    Ok(())
}

pub struct InvitationService<'a> {
    db: &'a DatabaseConnection,
    config: &'a Config,
}

impl<'a> InvitationService<'a> {
    /// Creates a new instance of [`InvitationService`]
    pub fn new(db: &'a DatabaseConnection, config: &'a Config) -> Self {
        Self { db, config }
    }

    /// Invites an email with a role.
    ///
    /// # Returns
    /// - `Ok(InvitationDto)` - Pending invitation with its acceptance token
    /// - `Err(DomainError::Validation)` - Malformed email
    /// - `Err(DomainError::Conflict)` - Email belongs to a user or has an open invitation
    pub async fn create(
        &self,
        invited_by: i32,
        invitation: CreateInvitationDto,
    ) -> Result<InvitationDto, Error> {
        let email = normalize_email(&invitation.email)?;
        let now = Utc::now().naive_utc();

        if UserRepository::new(self.db)
            .find_by_email(&email)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(format!("A user with email {} already exists", email)).into());
        }

        let invitation_repo = InvitationRepository::new(self.db);
        if invitation_repo
            .find_open_for_email(&email, now)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(format!(
                "A pending invitation for {} already exists",
                email
            ))
            .into());
        }

        let expires_at = TimeDelta::try_hours(self.config.invitation_ttl_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                Error::InternalError(format!(
                    "Invitation TTL of {} hours is out of range",
                    self.config.invitation_ttl_hours
                ))
            })?;
        let created = invitation_repo
            .create(
                &email,
                invitation.role,
                &random_token(INVITATION_TOKEN_LEN),
                invited_by,
                expires_at,
            )
            .await?;

        tracing::info!(
            "User ID {} invited {} as {}",
            invited_by,
            email,
            invitation.role
        );

        InvitationDto::try_from(created)
    }

    pub async fn list(
        &self,
        params: &ListParams,
        filter: &InvitationFilter,
    ) -> Result<Paginated<InvitationDto>, Error> {
        let query = ListQuery::from_params(
            params,
            INVITATION_SORTABLE,
            entity::invitation::Column::CreatedAt,
        )?;

        InvitationRepository::new(self.db)
            .list(&query, filter)
            .await?
            .try_map(InvitationDto::try_from)
    }

    /// Revokes a pending invitation, other statuses are a conflict
    pub async fn revoke(&self, invitation_id: i32) -> Result<InvitationDto, Error> {
        let invitation_repo = InvitationRepository::new(self.db);

        let invitation = invitation_repo
            .get_by_id(invitation_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Invitation", invitation_id))?;

        let status: InvitationStatus = parse_column(&invitation.status)?;
        if status != InvitationStatus::Pending {
            return Err(DomainError::conflict(format!("Invitation is {}", status)).into());
        }

        let revoked = invitation_repo
            .set_status(invitation, InvitationStatus::Revoked)
            .await?;

        InvitationDto::try_from(revoked)
    }

    /// Public view of an open invitation
    pub async fn lookup(&self, token: &str) -> Result<PublicInvitationDto, Error> {
        let invitation = InvitationRepository::new(self.db)
            .find_by_token(token)
            .await?
            .ok_or_else(|| DomainError::NotFound("Invitation not found".to_string()))?;

        ensure_open(&invitation, Utc::now().naive_utc())?;

        PublicInvitationDto::try_from(invitation)
    }

    /// Accepts an invitation with the invitee's provider access token.
    ///
    /// The user is created with the invited role and the invitation marked accepted in one
    /// transaction.
    ///
    /// # Returns
    /// - `Ok(UserDto)` - The new user, to be stored in session
    /// - `Err(AuthError::InvalidToken)` - Access token failed verification
    /// - `Err(AuthError::EmailMismatch)` - Token email differs from the invited email
    /// - `Err(DomainError::NotFound)` - Unknown invitation token
    /// - `Err(DomainError::Conflict)` - Invitation is not open, or the account already exists
    pub async fn accept(
        &self,
        token: &str,
        accept: AcceptInvitationDto,
    ) -> Result<UserDto, Error> {
        let claims = verify_token(self.config, &accept.access_token)?;

        let name = accept.name.trim();
        let name = if name.is_empty() {
            claims.display_name()
        } else {
            name.to_string()
        };

        let txn = self.db.begin().await?;
        let invitation_repo = InvitationRepository::new(&txn);
        let user_repo = UserRepository::new(&txn);

        let invitation = invitation_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| DomainError::NotFound("Invitation not found".to_string()))?;

        ensure_open(&invitation, Utc::now().naive_utc())?;

        if claims.normalized_email() != invitation.email.to_lowercase() {
            return Err(AuthError::EmailMismatch.into());
        }

        if user_repo.find_by_subject(&claims.sub).await?.is_some()
            || user_repo.find_by_email(&invitation.email).await?.is_some()
        {
            return Err(DomainError::conflict("An account already exists for this login").into());
        }

        let role = parse_column(&invitation.role)?;
        let user = user_repo
            .create(&claims.sub, &invitation.email, &name, role)
            .await?;
        invitation_repo
            .set_status(invitation, InvitationStatus::Accepted)
            .await?;

        txn.commit().await?;

        tracing::info!("User ID {} joined as {}", user.id, role);

        UserDto::try_from(user)
    }

    /// Marks pending invitations past their expiry as expired, returning how many changed
    pub async fn expire(&self, now: NaiveDateTime) -> Result<u64, Error> {
        Ok(InvitationRepository::new(self.db)
            .expire_pending(now)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_email;

    /// Expect emails trimmed and lower-cased, malformed ones rejected
    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  Ana@Example.COM ").unwrap(), "ana@example.com");
        assert!(normalize_email("ana").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("ana@localhost").is_err());
    }

    mod create {
        use roost_test_utils::prelude::*;

        use crate::{
            model::{
                invitation::{CreateInvitationDto, InvitationStatus},
                user::Role,
            },
            server::{
                config::Config,
                error::{domain::DomainError, Error},
                service::invitation::InvitationService,
            },
        };

        /// Expect a pending invitation with a 32 character token
        #[tokio::test]
        async fn creates_pending_invitation() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let config = Config::for_tests();

            let invitation = InvitationService::new(&test.db, &config)
                .create(
                    admin.id,
                    CreateInvitationDto {
                        email: "New@Example.com".to_string(),
                        role: Role::Manager,
                    },
                )
                .await
                .unwrap();

            assert_eq!(invitation.email, "new@example.com");
            assert_eq!(invitation.status, InvitationStatus::Pending);
            assert_eq!(invitation.token.len(), 32);

            Ok(())
        }

        /// Expect Conflict for emails of existing users or with an open invitation
        #[tokio::test]
        async fn rejects_taken_emails() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            test.user()
                .insert_invitation(admin.id, "open@example.com", "tok-open", "pending", 24)
                .await?;
            let config = Config::for_tests();
            let service = InvitationService::new(&test.db, &config);

            for email in ["admin@example.com", "open@example.com"] {
                let result = service
                    .create(
                        admin.id,
                        CreateInvitationDto {
                            email: email.to_string(),
                            role: Role::Staff,
                        },
                    )
                    .await;

                assert!(matches!(
                    result,
                    Err(Error::DomainError(DomainError::Conflict(_)))
                ));
            }

            Ok(())
        }

        /// Expect an error instead of a panic when the TTL cannot be added to the current time
        #[tokio::test]
        async fn rejects_unrepresentable_ttl() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let config = Config {
                invitation_ttl_hours: i64::MAX,
                ..Config::for_tests()
            };

            let result = InvitationService::new(&test.db, &config)
                .create(
                    admin.id,
                    CreateInvitationDto {
                        email: "late@example.com".to_string(),
                        role: Role::Staff,
                    },
                )
                .await;

            assert!(matches!(result, Err(Error::InternalError(_))));

            Ok(())
        }
    }

    mod accept {
        use chrono::Utc;
        use roost_test_utils::prelude::*;

        use crate::{
            model::{
                invitation::{AcceptInvitationDto, InvitationStatus},
                user::Role,
            },
            server::{
                config::Config,
                data::user::invitation::InvitationRepository,
                error::{auth::AuthError, domain::DomainError, Error},
                service::invitation::InvitationService,
            },
        };

        fn accept_dto(subject: &str, email: &str) -> AcceptInvitationDto {
            AcceptInvitationDto {
                access_token: access_token(subject, email).unwrap(),
                name: "Newcomer".to_string(),
            }
        }

        /// Expect a user with the invited role and the invitation marked accepted
        #[tokio::test]
        async fn creates_user_and_accepts() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let invitation = test
                .user()
                .insert_invitation(admin.id, "new@example.com", "tok-1", "pending", 24)
                .await?;
            let config = Config::for_tests();

            let user = InvitationService::new(&test.db, &config)
                .accept("tok-1", accept_dto("auth|new", "NEW@example.com"))
                .await
                .unwrap();

            assert_eq!(user.role, Role::Staff);
            assert_eq!(user.name, "Newcomer");

            let stored = InvitationRepository::new(&test.db)
                .get_by_id(invitation.id)
                .await?
                .unwrap();
            assert_eq!(stored.status, InvitationStatus::Accepted.as_str());
            assert!(stored.accepted_at.is_some());

            Ok(())
        }

        /// Expect EmailMismatch when the token belongs to another email
        #[tokio::test]
        async fn rejects_other_email() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            test.user()
                .insert_invitation(admin.id, "new@example.com", "tok-1", "pending", 24)
                .await?;
            let config = Config::for_tests();

            let result = InvitationService::new(&test.db, &config)
                .accept("tok-1", accept_dto("auth|other", "other@example.com"))
                .await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::EmailMismatch))
            ));

            Ok(())
        }

        /// Expect Conflict for expired and revoked invitations, NotFound for unknown tokens
        #[tokio::test]
        async fn rejects_closed_invitations() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            test.user()
                .insert_invitation(admin.id, "late@example.com", "tok-late", "pending", -1)
                .await?;
            test.user()
                .insert_invitation(admin.id, "gone@example.com", "tok-gone", "revoked", 24)
                .await?;
            let config = Config::for_tests();
            let service = InvitationService::new(&test.db, &config);

            assert!(matches!(
                service
                    .accept("tok-late", accept_dto("auth|late", "late@example.com"))
                    .await,
                Err(Error::DomainError(DomainError::Conflict(_)))
            ));
            assert!(matches!(
                service
                    .accept("tok-gone", accept_dto("auth|gone", "gone@example.com"))
                    .await,
                Err(Error::DomainError(DomainError::Conflict(_)))
            ));
            assert!(matches!(
                service
                    .accept("tok-none", accept_dto("auth|none", "none@example.com"))
                    .await,
                Err(Error::DomainError(DomainError::NotFound(_)))
            ));

            Ok(())
        }

        /// Expect only pending invitations past their expiry to be expired
        #[tokio::test]
        async fn expire_marks_overdue_invitations() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let overdue = test
                .user()
                .insert_invitation(admin.id, "late@example.com", "tok-late", "pending", -1)
                .await?;
            let open = test
                .user()
                .insert_invitation(admin.id, "open@example.com", "tok-open", "pending", 24)
                .await?;
            let config = Config::for_tests();

            let expired = InvitationService::new(&test.db, &config)
                .expire(Utc::now().naive_utc())
                .await
                .unwrap();

            assert_eq!(expired, 1);

            let repo = InvitationRepository::new(&test.db);
            assert_eq!(
                repo.get_by_id(overdue.id).await?.unwrap().status,
                InvitationStatus::Expired.as_str()
            );
            assert_eq!(
                repo.get_by_id(open.id).await?.unwrap().status,
                InvitationStatus::Pending.as_str()
            );

            Ok(())
        }
    }
}
