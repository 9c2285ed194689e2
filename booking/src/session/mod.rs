//! Signed-in session.
//!
//! A [`Session`] owns the bearer token and the cached profile and persists
//! both through a [`TokenStorage`]. It is an explicit object: views that
//! need authentication are handed the session (or its token) instead of
//! reaching into ambient state.

mod auth;
pub mod storage;

pub use auth::{Session, SessionError, User};
pub use storage::{FileStorage, MemoryStorage, StorageError, TOKEN_KEY, TokenStorage, USER_KEY};
