/// User model
///
/// Users are created at registration and never updated or deleted. Each user
/// is linked to exactly one tenant, whose id is embedded in every token the
/// user receives.
///
/// # Example
///
/// ```
/// use revintel_shared::models::user::{normalize_email, User, UserRole};
/// use uuid::Uuid;
///
/// let user = User::new(
///     Uuid::new_v4(),
///     "  Ada@Example.com ",
///     "$argon2id$...".to_string(),
///     "Ada".to_string(),
///     "Lovelace".to_string(),
///     Uuid::new_v4(),
///     UserRole::Admin,
/// );
///
/// assert_eq!(user.email, normalize_email("ada@example.com"));
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to a user at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access to the tenant (assigned on self-registration)
    Admin,

    /// Added to an existing tenant by one of its admins
    Member,
}

impl UserRole {
    /// Converts role to its wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Member => "member",
        }
    }
}

/// Stored user account
///
/// Passwords are stored as Argon2id PHC strings, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Normalized email address, unique across the store
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Tenant the user belongs to
    pub tenant_id: Uuid,

    /// Role fixed at creation
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a new user, normalizing the email address
    pub fn new(
        id: Uuid,
        email: &str,
        password_hash: String,
        first_name: String,
        last_name: String,
        tenant_id: Uuid,
        role: UserRole,
    ) -> Self {
        Self {
            id,
            email: normalize_email(email),
            password_hash,
            first_name,
            last_name,
            tenant_id,
            role,
            created_at: Utc::now(),
        }
    }

    /// Public view of the user, safe to return to clients
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            tenant_id: self.tenant_id,
            role: self.role,
        }
    }
}

/// User fields returned alongside an issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub tenant_id: Uuid,
    pub role: UserRole,
}

/// Normalizes an email address for storage and lookup
///
/// Emails are compared case-insensitively after trimming whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("User@Example.COM"), "user@example.com");
        assert_eq!(normalize_email("  a@b.io\n"), "a@b.io");
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::new(
            Uuid::new_v4(),
            "a@b.io",
            "$argon2id$secret".to_string(),
            "A".to_string(),
            "B".to_string(),
            Uuid::new_v4(),
            UserRole::Admin,
        );

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_profile_copies_identity() {
        let tenant_id = Uuid::new_v4();
        let user = User::new(
            Uuid::new_v4(),
            "a@b.io",
            "hash".to_string(),
            "A".to_string(),
            "B".to_string(),
            tenant_id,
            UserRole::Member,
        );

        let profile = user.profile();
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.tenant_id, tenant_id);
        assert_eq!(profile.role.as_str(), "member");
    }
}
