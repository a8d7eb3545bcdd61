//! Session state
//!
//! The bearer token, its expiry, the cached user id, and the in-memory
//! credentials, held as a plain value object. The `ApiClient` owns the one
//! live instance; nothing here touches the network or the browser.

/// Safety margin subtracted from the server-reported token lifetime
pub const EXPIRY_MARGIN_MS: i64 = 60_000;

/// Token lifetime assumed when the server omits `expires_in` (12 hours)
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 43_200;

/// A username/password pair held in memory for silent re-authentication
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Mutable session state owned by the API client
#[derive(Default, Clone)]
pub struct Session {
    token: Option<String>,
    token_expiry: i64,
    user_id: Option<String>,
    credentials: Option<Credentials>,
}

impl Session {
    /// True while a token is present and its expiry instant has not passed
    pub fn is_valid(&self, now_ms: i64) -> bool {
        self.token.is_some() && now_ms < self.token_expiry
    }

    /// Install a freshly issued token. The expiry is pulled in by a fixed
    /// margin so a request started just before the real expiry still lands
    /// with a live token.
    pub fn set_token(&mut self, token: String, expires_in_secs: i64, now_ms: i64) {
        self.token = Some(token);
        self.token_expiry = now_ms + expires_in_secs * 1000 - EXPIRY_MARGIN_MS;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn token_expiry(&self) -> i64 {
        self.token_expiry
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn set_user_id(&mut self, user_id: String) {
        self.user_id = Some(user_id);
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn set_credentials(&mut self, username: &str, password: &str) {
        self.credentials = Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    /// Drop token, expiry, user id, and in-memory credentials. Persisted
    /// credentials are a separate concern and are not touched.
    pub fn clear(&mut self) {
        self.token = None;
        self.token_expiry = 0;
        self.user_id = None;
        self.credentials = None;
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_is_invalid() {
        let session = Session::default();
        assert!(!session.is_valid(0));
    }

    #[test]
    fn test_expiry_includes_safety_margin() {
        let mut session = Session::default();
        session.set_token("tok".into(), DEFAULT_TOKEN_LIFETIME_SECS, 0);
        assert_eq!(
            session.token_expiry(),
            DEFAULT_TOKEN_LIFETIME_SECS * 1000 - EXPIRY_MARGIN_MS
        );
    }

    #[test]
    fn test_token_valid_until_expiry_instant() {
        let mut session = Session::default();
        session.set_token("tok".into(), 120, 1_000);
        let expiry = session.token_expiry();

        assert!(session.is_valid(1_000));
        assert!(session.is_valid(expiry - 1));
        assert!(!session.is_valid(expiry));
        assert!(!session.is_valid(expiry + 1));
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut session = Session::default();
        session.set_token("tok".into(), 3600, 0);
        session.set_user_id("user-1".into());
        session.set_credentials("alice@example.com", "hunter2");

        session.clear();

        assert!(session.token().is_none());
        assert_eq!(session.token_expiry(), 0);
        assert!(session.user_id().is_none());
        assert!(session.credentials().is_none());
        assert!(!session.is_valid(0));
    }
}
