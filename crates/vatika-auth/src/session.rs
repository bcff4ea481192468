//! Session management.

use std::sync::Arc;

use crate::credentials::CredentialVerifier;
use crate::identity::IdentityProvider;
use crate::user::User;
use crate::AuthError;
use tracing::{debug, info, warn};
use vatika_cache::Cache;

/// Cache key the signed-in user is saved under.
pub const USER_KEY: &str = "user";

/// The browsing session's sign-in state.
///
/// The current user is saved in the cache so it survives a reload. Failing
/// to save or clear it is logged but never fails the login or logout.
pub struct AuthSession {
    cache: Cache,
    verifier: Arc<dyn CredentialVerifier>,
    user: Option<User>,
}

impl AuthSession {
    /// Create a session, restoring any previously saved user.
    ///
    /// Unreadable saved data is logged and treated as signed out.
    pub fn restore(cache: Cache, verifier: Arc<dyn CredentialVerifier>) -> Self {
        let user = match cache.get::<User>(USER_KEY) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "could not read saved user, starting signed out");
                None
            }
        };
        if let Some(user) = &user {
            debug!(user_id = %user.id, "restored signed-in user");
        }

        Self {
            cache,
            verifier,
            user,
        }
    }

    /// Sign in.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = match self.verifier.authenticate(email, password).await {
            Ok(user) => user,
            Err(e) => {
                debug!(error = %e, "login failed");
                return Err(e);
            }
        };

        info!(user_id = %user.id, role = user.role.as_str(), "user logged in");
        self.set_user(user.clone());
        Ok(user)
    }

    /// Create an account and sign in as it.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let user = self.verifier.register(name, email, password).await?;
        info!(user_id = %user.id, "user registered");
        self.set_user(user.clone());
        Ok(user)
    }

    /// Sign out and forget the saved user.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "user logged out");
        }
        if let Err(e) = self.cache.delete(USER_KEY) {
            warn!(error = %e, "failed to clear saved user");
        }
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    fn set_user(&mut self, user: User) {
        if let Err(e) = self.cache.set(USER_KEY, &user) {
            warn!(user_id = %user.id, error = %e, "failed to save signed-in user");
        }
        self.user = Some(user);
    }
}

impl IdentityProvider for AuthSession {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::InMemoryCredentials;
    use crate::identity::can_access_admin;
    use vatika_cache::{KvStore, MemoryStore};
    use vatika_commerce::ids::UserId;

    fn verifier() -> Arc<dyn CredentialVerifier> {
        let admin = User::admin(UserId::new("admin-1"), "Admin User", "admin@example.com");
        Arc::new(
            InMemoryCredentials::new()
                .with_user(admin, "admin123")
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_login_logout() {
        let cache = Cache::in_memory();
        let mut session = AuthSession::restore(cache.clone(), verifier());
        assert!(!session.is_authenticated());

        session.login("admin@example.com", "admin123").await.unwrap();
        assert!(session.is_admin());
        assert!(can_access_admin(&session));
        assert!(cache.exists(USER_KEY).unwrap());

        session.logout();
        assert!(!can_access_admin(&session));
        assert!(!cache.exists(USER_KEY).unwrap());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_state() {
        let mut session = AuthSession::restore(Cache::in_memory(), verifier());
        assert!(session.login("admin@example.com", "wrong-pass1").await.is_err());
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_restore_saved_user() {
        let cache = Cache::in_memory();
        let mut first = AuthSession::restore(cache.clone(), verifier());
        let user = first.register("Asha", "asha@example.com", "password123").await.unwrap();

        let second = AuthSession::restore(cache, verifier());
        assert_eq!(second.current_user(), Some(user));
        assert!(!second.is_admin());
    }

    #[test]
    fn test_corrupt_saved_user() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, b"{not json").unwrap();

        let session = AuthSession::restore(Cache::new(store), verifier());
        assert!(session.user().is_none());
    }
}
