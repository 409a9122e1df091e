use crate::db::DbConn;
use crate::error::AppError;
use crate::models::{NewSession, NewUser, SessionId, User, UserId};
use crate::schema::{sessions, users};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_password, hash_token, verify_password};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Who is making a request. Resolved from the bearer token once per request
/// and handed explicitly to the workflows that need it.
#[derive(Debug, Clone)]
pub enum AuthState {
    SignedOut,
    SignedIn(User),
}

impl AuthState {
    /// An unknown token or an expired session both resolve to `SignedOut`.
    pub fn resolve(
        conn: &mut DbConn,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthState, AppError> {
        let Some(token) = token else {
            return Ok(AuthState::SignedOut);
        };

        let user = sessions::table
            .inner_join(users::table)
            .filter(sessions::token_hash.eq(hash_token(token)))
            .filter(sessions::expires_at.gt(now))
            .select(User::as_select())
            .first(conn)
            .optional()?;

        Ok(match user {
            Some(user) => AuthState::SignedIn(user),
            None => AuthState::SignedOut,
        })
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::SignedIn(user) => Some(user),
            AuthState::SignedOut => None,
        }
    }
}

/// Creates an account. Usernames are unique regardless of case.
pub fn register_user(conn: &mut DbConn, username: &str, password: &str) -> Result<User, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::Invalid("Username cannot be empty"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Invalid("Password must be at least 6 characters"));
    }

    let password_hash = hash_password(password)?;
    let id = UserId::generate();
    diesel::insert_into(users::table)
        .values(NewUser {
            id: id.clone(),
            username,
            password_hash: &password_hash,
            created_at: Utc::now(),
        })
        .execute(conn)
        .map_err(AppError::on_conflict("Username already exists"))?;

    Ok(users::table.find(&id).select(User::as_select()).first(conn)?)
}

/// Checks credentials. Unknown users and wrong passwords look the same.
pub fn authenticate(conn: &mut DbConn, username: &str, password: &str) -> Result<User, AppError> {
    let user = users::table
        .filter(users::username.eq(username.trim()))
        .select(User::as_select())
        .first(conn)
        .optional()?;

    match user {
        Some(user) if verify_password(password, &user.password_hash) => Ok(user),
        _ => Err(AppError::Unauthorized("Invalid credentials")),
    }
}

/// Signs a user in: issues a fresh token and stores only its hash.
pub fn create_session(
    conn: &mut DbConn,
    user_id: &UserId,
    ttl: Duration,
) -> Result<String, AppError> {
    let token = generate_token()?;
    let token_hash = hash_token(&token);
    let now = Utc::now();

    diesel::insert_into(sessions::table)
        .values(NewSession {
            id: SessionId::generate(),
            user_id: user_id.clone(),
            token_hash: &token_hash,
            expires_at: now + ttl,
            created_at: now,
        })
        .execute(conn)?;

    Ok(token)
}

/// Signs out the session behind `token`. Returns whether a session was removed.
pub fn end_session(conn: &mut DbConn, token: &str) -> Result<bool, AppError> {
    let deleted = diesel::delete(sessions::table.filter(sessions::token_hash.eq(hash_token(token))))
        .execute(conn)?;
    Ok(deleted > 0)
}

/// Drops sessions whose expiry has passed.
pub fn purge_expired_sessions(conn: &mut DbConn, now: DateTime<Utc>) -> Result<usize, AppError> {
    Ok(diesel::delete(sessions::table.filter(sessions::expires_at.le(now))).execute(conn)?)
}
