use rand::{distr::Alphanumeric, Rng};

/// Length of invitation acceptance tokens
pub const INVITATION_TOKEN_LEN: usize = 32;

/// Length of the random component of media storage keys
pub const STORAGE_KEY_TOKEN_LEN: usize = 24;

/// Generates a random alphanumeric string of `len` characters
pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
