/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`api_key`]: client API key generation and hashing
/// - [`context`]: bearer header authentication and the caller identity
///
/// # Example
///
/// ```
/// use revintel_shared::auth::password::{hash_password, verify_password};
/// use revintel_shared::auth::jwt::{create_token, Claims};
/// use revintel_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "a@b.io", UserRole::Admin, Uuid::new_v4());
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod api_key;
pub mod context;
pub mod jwt;
pub mod password;
