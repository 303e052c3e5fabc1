use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum password length enforced on sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Request body for `auth/sign-in` and `auth/sign-up`. Built per call and
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Error, Debug, PartialEq)]
pub enum CredentialsError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

impl Credentials {
    /// Validates and builds credentials for sign-in. Surrounding whitespace
    /// is trimmed before validation.
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = email.trim();
        let password = password.trim();

        if email.is_empty() {
            return Err(CredentialsError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    /// Builds credentials for sign-up, which additionally requires a
    /// password of at least [`MIN_PASSWORD_LEN`] characters.
    pub fn registration(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let credentials = Self::new(email, password)?;
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialsError::PasswordTooShort);
        }
        Ok(credentials)
    }
}

/// Successful response of `auth/sign-in`. The access token is the only
/// durable artifact of authentication.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_credentials_are_accepted() {
        let credentials = Credentials::new("a@b.com", "secret").unwrap();
        assert_eq!(credentials.email, "a@b.com");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn whitespace_is_trimmed() {
        let credentials = Credentials::new("  a@b.com ", " secret ").unwrap();
        assert_eq!(credentials.email, "a@b.com");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn empty_email_is_rejected() {
        assert_eq!(
            Credentials::new("   ", "secret").unwrap_err(),
            CredentialsError::EmptyEmail
        );
    }

    #[test]
    fn empty_password_is_rejected() {
        assert_eq!(
            Credentials::new("a@b.com", "").unwrap_err(),
            CredentialsError::EmptyPassword
        );
    }

    #[test]
    fn short_password_is_fine_for_sign_in() {
        assert!(Credentials::new("a@b.com", "abc").is_ok());
    }

    #[test]
    fn short_password_is_rejected_for_registration() {
        assert_eq!(
            Credentials::registration("a@b.com", "abc").unwrap_err(),
            CredentialsError::PasswordTooShort
        );
    }

    #[test]
    fn six_character_password_registers() {
        assert!(Credentials::registration("a@b.com", "abcdef").is_ok());
    }

    #[test]
    fn credentials_serialize_to_email_and_password() {
        let credentials = Credentials::new("a@b.com", "abcdef").unwrap();
        let json = serde_json::to_value(&credentials).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "a@b.com", "password": "abcdef"})
        );
    }

    #[test]
    fn auth_response_decodes_access_token() {
        let response: AuthResponse =
            serde_json::from_str(r#"{"access_token": "abc123"}"#).unwrap();
        assert_eq!(response.access_token, "abc123");
    }
}
