//! User types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use vatika_commerce::ids::UserId;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer.
    #[default]
    Customer,
    /// Store administrator; may open the admin surface.
    Admin,
}

impl Role {
    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// A signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role.
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Create a customer.
    pub fn customer(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: Role::Customer,
        }
    }

    /// Create an administrator.
    pub fn admin(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            role: Role::Admin,
            ..Self::customer(id, name, email)
        }
    }

    /// Check if user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name to greet the user with; falls back to the email's local part.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if !name.is_empty() {
            return name;
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("customer".parse::<Role>(), Ok(Role::Customer));
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_user_roles() {
        let admin = User::admin(UserId::new("admin-1"), "Admin User", "admin@example.com");
        let customer = User::customer(UserId::new("u-1"), "Asha", "asha@example.com");
        assert!(admin.is_admin());
        assert!(!customer.is_admin());
    }

    #[test]
    fn test_display_name_fallback() {
        let user = User::customer(UserId::new("u-1"), " ", "asha@example.com");
        assert_eq!(user.display_name(), "asha");
    }

    #[test]
    fn test_serde_shape() {
        let user = User::admin(UserId::new("admin-1"), "Admin", "a@b.c");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["id"], "admin-1");

        let legacy: User =
            serde_json::from_str(r#"{"id":"u","name":"N","email":"n@x.y"}"#).unwrap();
        assert_eq!(legacy.role, Role::Customer);
    }
}
