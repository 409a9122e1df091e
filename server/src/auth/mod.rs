mod crypto;
mod db;
mod extractor;

pub use crypto::{hash_password, verify_password};
pub use db::{
    authenticate, create_session, end_session, purge_expired_sessions, register_user, AuthState,
    MIN_PASSWORD_LENGTH,
};
pub use extractor::{bearer_token, AuthError, AuthUser};
