//! Token and profile lifecycle.

use super::storage::{StorageError, TOKEN_KEY, TokenStorage, USER_KEY};
use crate::environment::BookingEnvironment;
use chrono::NaiveDate;
use cineplex_api::{
    ApiError, CinemaApi, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserId,
    UserProfile,
};
use cineplex_core::environment::Clock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// The signed-in customer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account id
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Phone number, if on file
    pub phone: Option<String>,
    /// Day the profile was first loaded on this device
    pub member_since: NaiveDate,
}

impl User {
    fn from_profile(profile: UserProfile, today: NaiveDate) -> Self {
        Self {
            id: profile.user_id,
            name: profile.username,
            email: profile.email,
            phone: profile.phone,
            member_since: today,
        }
    }
}

/// Session failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The API rejected or failed the request
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Token storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The profile could not be encoded for storage
    #[error("failed to encode profile: {0}")]
    Encode(String),

    /// Registration form with a confirmation that differs from the password
    #[error("password confirmation does not match")]
    PasswordMismatch,
}

#[derive(Clone, Debug, Default)]
struct Credentials {
    token: Option<String>,
    user: Option<User>,
}

/// The customer's session.
///
/// Shared by `Arc` between the views that need it. Accessors never block on
/// the network; only [`Session::refresh`], [`Session::login`] and
/// [`Session::register`] talk to the API.
pub struct Session<S: TokenStorage> {
    api: Arc<dyn CinemaApi>,
    clock: Arc<dyn Clock>,
    storage: S,
    credentials: RwLock<Credentials>,
}

impl<S: TokenStorage> Session<S> {
    /// Signed-out session over `storage`.
    ///
    /// Call [`Session::restore`] to pick up a previously stored token.
    #[must_use]
    pub fn new(api: Arc<dyn CinemaApi>, clock: Arc<dyn Clock>, storage: S) -> Self {
        Self {
            api,
            clock,
            storage,
            credentials: RwLock::new(Credentials::default()),
        }
    }

    /// Session using the API and clock of `env`.
    #[must_use]
    pub fn from_env(env: &BookingEnvironment, storage: S) -> Self {
        Self::new(env.api(), env.shared_clock(), storage)
    }

    /// Bearer token, while signed in
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// Profile, while signed in
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// True iff a token is held
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// Resume a session from storage at startup.
    ///
    /// # Errors
    ///
    /// See [`Session::refresh`].
    pub async fn restore(&self) -> Result<Option<User>, SessionError> {
        self.refresh().await
    }

    /// Re-validate the stored token by fetching the profile.
    ///
    /// With no stored token the session is signed out and `Ok(None)` is
    /// returned. Any failure to fetch the profile signs the session out and
    /// clears storage.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Api`] if the profile could not be fetched and
    /// [`SessionError::Storage`] if storage could not be read or written.
    /// Unreadable storage also signs the session out.
    #[tracing::instrument(skip(self), name = "session_refresh")]
    pub async fn refresh(&self) -> Result<Option<User>, SessionError> {
        let stored = match self.storage.get(TOKEN_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Session storage unreadable, signing out");
                self.logout();
                return Err(e.into());
            },
        };
        let Some(token) = stored else {
            self.replace(Credentials::default());
            return Ok(None);
        };

        let profile = match self.api.me(&token).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, "Stored token rejected, signing out");
                self.logout();
                return Err(e.into());
            },
        };

        let user = User::from_profile(profile, self.clock.today());
        let encoded = serde_json::to_string(&user).map_err(|e| SessionError::Encode(e.to_string()))?;
        self.storage.set(USER_KEY, &encoded)?;
        self.replace(Credentials {
            token: Some(token),
            user: Some(user.clone()),
        });

        tracing::debug!(user_id = %user.id, "Session refreshed");
        Ok(Some(user))
    }

    /// Sign in with email and password.
    ///
    /// A response carrying a token is persisted and followed by a profile
    /// fetch; a response without one leaves the session untouched. The
    /// decoded response is returned either way so its message can be shown.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Api`] if the request failed outright and
    /// [`SessionError::Storage`] if the token could not be stored.
    #[tracing::instrument(skip(self, password), name = "session_login")]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, SessionError> {
        let response = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        match response.token() {
            Some(token) => {
                self.storage.set(TOKEN_KEY, token)?;
                if let Err(e) = self.refresh().await {
                    tracing::warn!(error = %e, "Signed in but the profile could not be loaded");
                }
            },
            None => {
                tracing::info!(message = ?response.message, "Login rejected");
            },
        }

        Ok(response)
    }

    /// Create an account. Does not sign in.
    ///
    /// The confirmation is checked locally; a mismatch never reaches the API.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PasswordMismatch`] if `confirm_password`
    /// differs from `password` and [`SessionError::Api`] if the request
    /// failed outright.
    #[tracing::instrument(skip(self, password, confirm_password), name = "session_register")]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<RegisterResponse, SessionError> {
        if password != confirm_password {
            tracing::debug!("Password confirmation mismatch");
            return Err(SessionError::PasswordMismatch);
        }

        let response = self
            .api
            .register(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        if response.user.is_none() {
            tracing::info!(message = ?response.message, "Registration rejected");
        }
        Ok(response)
    }

    /// Sign out and clear storage.
    ///
    /// Storage failures are logged; the in-memory session is cleared
    /// regardless.
    pub fn logout(&self) {
        self.replace(Credentials::default());
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(error = %e, key, "Failed to clear session storage");
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Credentials> {
        self.credentials.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, credentials: Credentials) {
        *self.credentials.write().unwrap_or_else(PoisonError::into_inner) = credentials;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::session::{FileStorage, MemoryStorage};
    use cineplex_testing::{ApiCall, MockCinemaApi, test_clock};

    fn profile() -> UserProfile {
        UserProfile {
            user_id: UserId::new(5),
            username: "Linh".to_string(),
            email: "linh@example.com".to_string(),
            phone: Some("0901234567".to_string()),
        }
    }

    fn session(api: &MockCinemaApi, storage: MemoryStorage) -> Session<MemoryStorage> {
        Session::new(Arc::new(api.clone()), Arc::new(test_clock()), storage)
    }

    fn stored(pairs: &[(&str, &str)]) -> MemoryStorage {
        let storage = MemoryStorage::new();
        for (key, value) in pairs {
            storage.set(key, value).unwrap();
        }
        storage
    }

    #[tokio::test]
    async fn restore_without_token_stays_signed_out() {
        let api = MockCinemaApi::new();
        let session = session(&api, MemoryStorage::new());

        assert_eq!(session.restore().await.unwrap(), None);
        assert!(!session.is_authenticated());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn restore_with_valid_token_loads_profile() {
        let api = MockCinemaApi::new().with_profile("tok-1", Ok(profile()));
        let session = session(&api, stored(&[(TOKEN_KEY, "tok-1")]));

        let user = session.restore().await.unwrap().unwrap();

        assert_eq!(user.name, "Linh");
        assert_eq!(user.member_since, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert!(session.is_authenticated());

        let cached: User = serde_json::from_str(&session.storage.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(cached, user);
    }

    #[tokio::test]
    async fn rejected_token_clears_both_keys() {
        let api = MockCinemaApi::new();
        let session = session(&api, stored(&[(TOKEN_KEY, "expired"), (USER_KEY, "{}")]));

        let error = session.refresh().await.unwrap_err();

        assert!(matches!(error, SessionError::Api(ref e) if e.is_unauthorized()));
        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
        assert_eq!(session.storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(session.storage.get(USER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn transport_failure_also_signs_out() {
        let api = MockCinemaApi::new().with_profile(
            "tok-1",
            Err(ApiError::RequestFailed {
                endpoint: "me",
                message: "connection reset".to_string(),
            }),
        );
        let session = session(&api, stored(&[(TOKEN_KEY, "tok-1")]));

        assert!(session.refresh().await.is_err());
        assert_eq!(session.storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn login_with_token_persists_and_loads_profile() {
        let api = MockCinemaApi::new()
            .with_login(Ok(LoginResponse {
                token: Some("tok-1".to_string()),
                message: None,
            }))
            .with_profile("tok-1", Ok(profile()));
        let session = session(&api, MemoryStorage::new());

        session.login("linh@example.com", "secret").await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().email, "linh@example.com");
        assert_eq!(session.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        assert_eq!(
            api.calls(),
            vec![
                ApiCall::Login("linh@example.com".to_string()),
                ApiCall::Me("tok-1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn login_without_token_persists_nothing() {
        let api = MockCinemaApi::new().with_login(Ok(LoginResponse {
            token: None,
            message: Some("Email hoặc mật khẩu không đúng".to_string()),
        }));
        let session = session(&api, MemoryStorage::new());

        let response = session.login("linh@example.com", "wrong").await.unwrap();

        assert_eq!(response.message.as_deref(), Some("Email hoặc mật khẩu không đúng"));
        assert!(!session.is_authenticated());
        assert_eq!(session.storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(api.count(|call| matches!(call, ApiCall::Me(_))), 0);
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let api = MockCinemaApi::new().with_profile("tok-1", Ok(profile()));
        let session = session(&api, stored(&[(TOKEN_KEY, "tok-1")]));
        session.restore().await.unwrap();

        session.logout();

        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
        assert_eq!(session.storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(session.storage.get(USER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn register_does_not_sign_in() {
        let api = MockCinemaApi::new();
        let session = session(&api, MemoryStorage::new());

        let response = session
            .register("An", "an@example.com", "pw", "pw")
            .await
            .unwrap();

        assert!(response.user.is_none());
        assert!(!session.is_authenticated());
        assert_eq!(api.calls(), vec![ApiCall::Register("an@example.com".to_string())]);
    }

    #[tokio::test]
    async fn mismatched_confirmation_sends_nothing() {
        let api = MockCinemaApi::new();
        let session = session(&api, MemoryStorage::new());

        let error = session
            .register("An", "an@example.com", "secret", "secert")
            .await
            .unwrap_err();

        assert_eq!(error, SessionError::PasswordMismatch);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn corrupt_session_file_can_be_signed_out_and_back_in() {
        let dir = std::env::temp_dir().join(format!("cineplex-session-{}-corrupt", std::process::id()));
        let path = dir.join("session.json");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, r#"{"cgv_token": "tok-1""#).unwrap();

        let api = MockCinemaApi::new()
            .with_login(Ok(LoginResponse {
                token: Some("tok-2".to_string()),
                message: None,
            }))
            .with_profile("tok-2", Ok(profile()));
        let session = Session::new(Arc::new(api.clone()), Arc::new(test_clock()), FileStorage::new(&path));

        let error = session.restore().await.unwrap_err();
        assert!(matches!(error, SessionError::Storage(StorageError::Corrupt { .. })));
        assert!(!session.is_authenticated());
        assert_eq!(session.storage.get(TOKEN_KEY).unwrap(), None);

        session.logout();
        session.login("linh@example.com", "secret").await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("tok-2"));
        assert_eq!(FileStorage::new(&path).get(TOKEN_KEY).unwrap().as_deref(), Some("tok-2"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
