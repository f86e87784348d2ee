//! Access tokens signed with the test secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

use crate::{
    constant::{TEST_JWT_AUDIENCE, TEST_JWT_SECRET},
    error::TestError,
};

#[derive(Serialize)]
struct Claims<'a> {
    sub: &'a str,
    email: &'a str,
    aud: &'a str,
    exp: usize,
}

/// Create an HS256 access token for `subject` valid for one hour.
pub fn access_token(subject: &str, email: &str) -> Result<String, TestError> {
    signed_token(subject, email, TEST_JWT_SECRET, Duration::hours(1))
}

/// Create an access token with a custom secret and lifetime, a negative lifetime yields an
/// expired token.
pub fn signed_token(
    subject: &str,
    email: &str,
    secret: &str,
    lifetime: Duration,
) -> Result<String, TestError> {
    let claims = Claims {
        sub: subject,
        email,
        aud: TEST_JWT_AUDIENCE,
        exp: (Utc::now() + lifetime).timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}
