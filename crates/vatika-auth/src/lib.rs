//! Sign-in for the Vatika storefront.
//!
//! Provides the current-user lookup, the admin gate, and a session that
//! remembers who is signed in across reloads.

mod credentials;
mod error;
mod identity;
mod password;
mod session;
mod user;

pub use credentials::{CredentialVerifier, InMemoryCredentials};
pub use error::AuthError;
pub use identity::{can_access_admin, IdentityProvider, StaticIdentity};
pub use password::{PasswordHasher, MIN_PASSWORD_LENGTH};
pub use session::{AuthSession, USER_KEY};
pub use user::{Role, User};
