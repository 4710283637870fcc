/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing x-api-key header")]
    Missing,
    #[error("Invalid API key")]
    Invalid,
}

/// Validates the provided API key against the configured one.
///
/// Returns `Ok(())` if the key matches, or an error if it is missing or wrong.
pub fn validate_api_key(provided_key: Option<&str>, expected_key: &str) -> Result<(), AuthError> {
    match provided_key {
        None => Err(AuthError::Missing),
        Some(key) if key == expected_key => Ok(()),
        Some(_) => Err(AuthError::Invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_api_key() {
        assert_eq!(validate_api_key(Some("k"), "k"), Ok(()));
        assert_eq!(validate_api_key(Some("x"), "k"), Err(AuthError::Invalid));
        assert_eq!(validate_api_key(None, "k"), Err(AuthError::Missing));
    }
}
