use rand::distr::{Alphanumeric, SampleString};

/// Length of generated account verification tokens.
pub const VERIFICATION_TOKEN_LENGTH: usize = 64;

/// Generates a random alphanumeric account verification token.
pub fn generate_verification_token() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), VERIFICATION_TOKEN_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_shape() {
        let token = generate_verification_token();
        assert_eq!(token.len(), VERIFICATION_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_verification_token());
    }
}
