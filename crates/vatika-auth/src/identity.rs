//! Identity lookup and the admin gate.

use crate::user::{Role, User};

/// Answers "who is using the storefront right now".
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<User>;

    /// Check if someone is signed in.
    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

/// Whether the admin affordance should be shown.
pub fn can_access_admin(identity: &dyn IdentityProvider) -> bool {
    identity
        .current_user()
        .map(|u| u.role == Role::Admin)
        .unwrap_or(false)
}

/// Fixed identity, mostly for tests and previews.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<User>);

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<User> {
        self.0.clone()
    }
}
