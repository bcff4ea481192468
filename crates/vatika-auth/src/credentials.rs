//! Credential verification.

use std::collections::HashMap;

use crate::password::PasswordHasher;
use crate::user::User;
use crate::AuthError;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use parking_lot::RwLock;
use rand::RngCore;
use vatika_commerce::ids::UserId;

/// Checks credentials and creates accounts.
///
/// The storefront ships no real backend; callers plug in whatever
/// implementation they have.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Return the user for a correct email/password pair.
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Create a customer account.
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError>;
}

struct StoredCredentials {
    user: User,
    password_hash: String,
}

/// Process-local credential store with argon2 password hashes.
pub struct InMemoryCredentials {
    hasher: PasswordHasher,
    users: RwLock<HashMap<String, StoredCredentials>>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self {
            hasher: PasswordHasher::new(),
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Add an existing user, e.g. a seeded administrator.
    pub fn add_user(&self, user: User, password: &str) -> Result<(), AuthError> {
        PasswordHasher::validate_password(password)?;
        let key = normalize_email(&user.email);
        if self.users.read().contains_key(&key) {
            return Err(AuthError::UserAlreadyExists(user.email));
        }

        let password_hash = self.hasher.hash(password)?;
        let mut users = self.users.write();
        if users.contains_key(&key) {
            return Err(AuthError::UserAlreadyExists(user.email));
        }
        users.insert(
            key,
            StoredCredentials {
                user,
                password_hash,
            },
        );
        Ok(())
    }

    /// Builder form of [`InMemoryCredentials::add_user`].
    pub fn with_user(self, user: User, password: &str) -> Result<Self, AuthError> {
        self.add_user(user, password)?;
        Ok(self)
    }

    /// Check if an account exists for `email`.
    pub fn contains(&self, email: &str) -> bool {
        self.users.read().contains_key(&normalize_email(email))
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

impl Default for InMemoryCredentials {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialVerifier for InMemoryCredentials {
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = {
            let users = self.users.read();
            let stored = users
                .get(&normalize_email(email))
                .ok_or(AuthError::InvalidCredentials)?;
            (stored.user.clone(), stored.password_hash.clone())
        };

        if self.hasher.verify(password, &password_hash)? {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(AuthError::Validation("name is required".to_string()));
        }
        if !is_plausible_email(email) {
            return Err(AuthError::Validation(format!("invalid email address: {email}")));
        }

        let user = User::customer(generate_user_id(), name, email);
        self.add_user(user.clone(), password)?;
        Ok(user)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    matches!(email.split_once('@'), Some((local, domain)) if !local.is_empty() && !domain.is_empty())
}

/// Generate a random user id such as `user-3q2-7wVf0aZx`.
fn generate_user_id() -> UserId {
    let mut bytes = [0u8; 9];
    rand::thread_rng().fill_bytes(&mut bytes);
    UserId::new(format!("user-{}", URL_SAFE_NO_PAD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::Role;

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let creds = InMemoryCredentials::new();
        let user = creds.register("Asha", "Asha@Example.com", "password123").await.unwrap();
        assert_eq!(user.role, Role::Customer);
        assert!(user.id.as_str().starts_with("user-"));

        let again = creds.authenticate("asha@example.com", "password123").await.unwrap();
        assert_eq!(again, user);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let creds = InMemoryCredentials::new();
        creds.register("Asha", "asha@example.com", "password123").await.unwrap();
        assert!(matches!(
            creds.authenticate("asha@example.com", "password124").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            creds.authenticate("nobody@example.com", "password123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let creds = InMemoryCredentials::new();
        creds.register("Asha", "asha@example.com", "password123").await.unwrap();
        assert!(matches!(
            creds.register("Asha", " ASHA@example.com", "password456").await,
            Err(AuthError::UserAlreadyExists(_))
        ));
        assert_eq!(creds.len(), 1);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let creds = InMemoryCredentials::new();
        assert!(matches!(
            creds.register("", "a@b.c", "password123").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            creds.register("A", "no-at-sign", "password123").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            creds.register("A", "a@b.c", "weak").await,
            Err(AuthError::WeakPassword(_))
        ));
        assert!(creds.is_empty());
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_user_id(), generate_user_id());
    }
}
