//! Placeholder credentials used by test configurations, not real secrets.

/// Secret the test authentication provider signs access tokens with.
pub static TEST_JWT_SECRET: &str = "roost-test-secret";

/// Audience claim included in test access tokens.
pub static TEST_JWT_AUDIENCE: &str = "roost";
