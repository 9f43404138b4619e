//! Registered users.

use serde::Serialize;

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::UserId;

/// Upper bound on accepted password length, in bytes.
///
/// Argon2 cost grows with input; anything longer is rejected before hashing.
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// A stored user account.
///
/// Deliberately not `Serialize`: the password hash must never reach a response
/// body. Use [`UserProfile`] for that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Salted hash in PHC string format.
    pub password_hash: String,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
}

/// Data required to persist a new user; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

/// Check an email/password pair before it is hashed or looked up.
///
/// Returns the normalized (trimmed) email. Passwords are taken verbatim.
pub fn validate_credentials(email: &str, password: &str) -> DomainResult<String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(DomainError::validation("email is required"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(DomainError::validation("email must be a valid address")),
    }
    if password.is_empty() {
        return Err(DomainError::validation("password is required"));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(DomainError::validation("password is too long"));
    }
    Ok(email.to_string())
}
