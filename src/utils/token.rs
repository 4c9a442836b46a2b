use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Length of email verification and password reset tokens.
pub const ONE_TIME_TOKEN_LEN: usize = 48;

/// Random alphanumeric one-time token for verification and reset links.
pub fn generate_token(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
