//! Login with access tokens issued by the external authentication provider.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;

use crate::{
    model::user::{Role, UserDto},
    server::{
        config::Config,
        data::user::UserRepository,
        error::{auth::AuthError, Error},
    },
};

/// Claims of a provider access token
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: u64,
}

impl ProviderClaims {
    /// Email trimmed and lower-cased
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Display name from the token, falling back to the local part of the email
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                let email = self.normalized_email();
                email.split('@').next().unwrap_or_default().to_string()
            })
    }
}

/// Verifies the HS256 signature, expiry and, when configured, audience of a provider token
pub fn verify_token(config: &Config, token: &str) -> Result<ProviderClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    match &config.auth_jwt_audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    let data = decode::<ProviderClaims>(
        token,
        &DecodingKey::from_secret(config.auth_jwt_secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    config: &'a Config,
}

impl<'a> AuthService<'a> {
    /// Creates a new instance of [`AuthService`]
    pub fn new(db: &'a DatabaseConnection, config: &'a Config) -> Self {
        Self { db, config }
    }

    /// Resolves the local user for a provider access token.
    ///
    /// A token for an unknown subject creates an admin account only when its email is the
    /// configured bootstrap admin email and no users exist yet.
    ///
    /// # Returns
    /// - `Ok(UserDto)` - The user to store in session
    /// - `Err(AuthError::InvalidToken)` - Signature, expiry or audience check failed
    /// - `Err(AuthError::UserInactive)` - The user was deactivated
    /// - `Err(AuthError::UnknownSubject)` - No account exists for the token's subject
    pub async fn login(&self, access_token: &str) -> Result<UserDto, Error> {
        let claims = verify_token(self.config, access_token)?;

        let user_repo = UserRepository::new(self.db);

        if let Some(user) = user_repo.find_by_subject(&claims.sub).await? {
            if !user.is_active {
                return Err(AuthError::UserInactive(user.id).into());
            }

            return UserDto::try_from(user);
        }

        let email = claims.normalized_email();
        if self.config.bootstrap_admin_email.as_deref() == Some(email.as_str()) {
            let txn = self.db.begin().await?;
            let user_repo = UserRepository::new(&txn);

            if user_repo.count().await? == 0 {
                let user = user_repo
                    .create(&claims.sub, &email, &claims.display_name(), Role::Admin)
                    .await?;
                txn.commit().await?;

                tracing::info!("Created bootstrap admin user ID {} for {}", user.id, email);

                return UserDto::try_from(user);
            }
        }

        Err(AuthError::UnknownSubject(claims.sub).into())
    }
}

#[cfg(test)]
mod tests {
    mod login {
        use chrono::Duration;
        use roost_test_utils::prelude::*;

        use crate::{
            model::user::Role,
            server::{
                config::Config,
                error::{auth::AuthError, Error},
                service::auth::AuthService,
            },
        };

        /// Expect an existing active user to be resolved by subject
        #[tokio::test]
        async fn resolves_existing_user() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let user = test.user().insert_user("ana@example.com", "staff").await?;
            let token = access_token(&subject_for("ana@example.com"), "ana@example.com")?;
            let config = Config::for_tests();

            let result = AuthService::new(&test.db, &config).login(&token).await;

            assert_eq!(result.unwrap().id, user.id);

            Ok(())
        }

        /// Expect UserInactive for deactivated users
        #[tokio::test]
        async fn rejects_inactive_user() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            test.user()
                .insert_inactive_user("ana@example.com", "staff")
                .await?;
            let token = access_token(&subject_for("ana@example.com"), "ana@example.com")?;
            let config = Config::for_tests();

            let result = AuthService::new(&test.db, &config).login(&token).await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::UserInactive(_)))
            ));

            Ok(())
        }

        /// Expect the bootstrap email to create an admin when no users exist
        #[tokio::test]
        async fn bootstraps_first_admin() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let token = access_token("auth|first", "Admin@Example.com")?;
            let config = Config::for_tests();

            let user = AuthService::new(&test.db, &config)
                .login(&token)
                .await
                .unwrap();

            assert_eq!(user.role, Role::Admin);
            assert_eq!(user.email, "admin@example.com");
            assert_eq!(user.name, "admin");

            Ok(())
        }

        /// Expect UnknownSubject for the bootstrap email once a user exists
        #[tokio::test]
        async fn no_bootstrap_once_users_exist() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            test.user().insert_user("ana@example.com", "staff").await?;
            let token = access_token("auth|first", "admin@example.com")?;
            let config = Config::for_tests();

            let result = AuthService::new(&test.db, &config).login(&token).await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::UnknownSubject(_)))
            ));

            Ok(())
        }

        /// Expect InvalidToken for tokens signed with another secret or already expired
        #[tokio::test]
        async fn rejects_bad_tokens() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let config = Config::for_tests();
            let service = AuthService::new(&test.db, &config);

            let forged = signed_token("auth|x", "x@example.com", "other-secret", Duration::hours(1))?;
            let expired = signed_token("auth|x", "x@example.com", TEST_JWT_SECRET, Duration::hours(-2))?;

            assert!(matches!(
                service.login(&forged).await,
                Err(Error::AuthError(AuthError::InvalidToken(_)))
            ));
            assert!(matches!(
                service.login(&expired).await,
                Err(Error::AuthError(AuthError::InvalidToken(_)))
            ));

            Ok(())
        }
    }
}
