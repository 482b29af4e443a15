/// Request authentication
///
/// Turns an `Authorization` header into an [`AuthContext`]. The HTTP layer
/// calls [`authenticate_bearer`] for every tenant-scoped route and stores the
/// result in the request extensions, where handlers pick it up with
/// `Extension<AuthContext>`.
///
/// # Example
///
/// ```
/// use revintel_shared::auth::context::{authenticate_bearer, AuthError};
/// use revintel_shared::auth::jwt::{create_token, Claims};
/// use revintel_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let claims = Claims::new(Uuid::new_v4(), "ada@example.com", UserRole::Admin, Uuid::new_v4());
/// let header = format!("Bearer {}", create_token(&claims, secret).unwrap());
///
/// let auth = authenticate_bearer(Some(&header), secret).unwrap();
/// assert_eq!(auth.tenant_id, claims.tenant_id);
///
/// assert!(matches!(authenticate_bearer(None, secret), Err(AuthError::MissingCredentials)));
/// ```

use super::jwt::{validate_token, Claims, JwtError};
use crate::models::user::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated caller identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,

    /// Tenant every read and write of this request is scoped to
    pub tenant_id: Uuid,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            tenant_id: claims.tenant_id,
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Malformed authorization header: {0}")]
    InvalidFormat(String),

    /// Token failed signature, issuer, or expiry checks
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),
}

/// Authenticates a raw `Authorization` header value
///
/// # Errors
///
/// - `MissingCredentials` if the header is absent
/// - `InvalidFormat` if it is not `Bearer <token>`
/// - `InvalidToken` if the token does not validate
pub fn authenticate_bearer(header: Option<&str>, secret: &str) -> Result<AuthContext, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, secret)?;
    Ok(claims.into())
}
