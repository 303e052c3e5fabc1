use anyhow::Result;
use fitlog::{AuthResponse, Credentials, FitlogClient};

use crate::session_store::{Session, SessionStore};

/// Coordinates the persisted session record and the client's bearer token.
/// The two must not disagree: every transition writes the store first and
/// then mirrors the token into the client.
pub struct SessionManager {
    store: SessionStore,
}

impl SessionManager {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Restores a persisted session at startup: when a logged-in record
    /// exists, its token is attached to the client.
    pub fn attach(&self, client: &FitlogClient) -> Result<Session> {
        let session = self.store.read()?;
        if session.is_logged_in {
            client.set_token(session.auth_token.clone());
        }
        Ok(session)
    }

    /// Signs in and commits the session: persist token and email, then
    /// attach the token to the client. A failed sign-in commits nothing.
    pub async fn sign_in(
        &self,
        client: &FitlogClient,
        credentials: &Credentials,
    ) -> Result<AuthResponse> {
        let auth = client.sign_in(credentials).await?;
        self.store.save(&auth.access_token, &credentials.email)?;
        client.set_token(Some(auth.access_token.clone()));
        Ok(auth)
    }

    /// Drops the session: clear the store, then the client token.
    pub fn logout(&self, client: &FitlogClient) -> Result<()> {
        self.store.clear()?;
        client.set_token(None);
        Ok(())
    }

    /// The persisted session as currently stored.
    pub fn current(&self) -> Result<Session> {
        self.store.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_manager() -> (tempfile::TempDir, SessionManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.toml"));
        (dir, SessionManager::new(store))
    }

    #[test]
    fn attach_restores_a_stored_token() {
        let (_dir, sessions) = temp_manager();
        sessions.store.save("abc123", "a@b.com").unwrap();

        let client = FitlogClient::new("http://localhost:8080");
        let session = sessions.attach(&client).unwrap();

        assert!(session.is_logged_in);
        assert_eq!(client.bearer_token().as_deref(), Some("abc123"));
    }

    #[test]
    fn attach_leaves_anonymous_clients_tokenless() {
        let (_dir, sessions) = temp_manager();

        let client = FitlogClient::new("http://localhost:8080");
        let session = sessions.attach(&client).unwrap();

        assert!(!session.is_logged_in);
        assert_eq!(client.bearer_token(), None);
    }

    #[test]
    fn logout_clears_store_and_token() {
        let (_dir, sessions) = temp_manager();
        sessions.store.save("abc123", "a@b.com").unwrap();

        let client = FitlogClient::new("http://localhost:8080");
        sessions.attach(&client).unwrap();
        sessions.logout(&client).unwrap();

        assert_eq!(sessions.current().unwrap(), Session::anonymous());
        assert_eq!(client.bearer_token(), None);
    }

    #[test]
    fn logout_is_safe_when_already_anonymous() {
        let (_dir, sessions) = temp_manager();
        let client = FitlogClient::new("http://localhost:8080");
        sessions.logout(&client).unwrap();
        assert_eq!(sessions.current().unwrap(), Session::anonymous());
    }

    #[tokio::test]
    async fn failed_sign_in_commits_nothing() {
        let (_dir, sessions) = temp_manager();

        // nothing listens on port 1, the call fails at the transport level
        let client = FitlogClient::new("http://127.0.0.1:1");
        let credentials = Credentials::new("a@b.com", "secret").unwrap();
        let result = sessions.sign_in(&client, &credentials).await;

        assert!(result.is_err());
        assert_eq!(sessions.current().unwrap(), Session::anonymous());
        assert_eq!(client.bearer_token(), None);
    }
}
