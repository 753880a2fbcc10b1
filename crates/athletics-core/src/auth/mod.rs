//! Authentication module for managing sessions and credentials.
//!
//! This module provides:
//! - `Session`: bearer-token session persisted in the cache directory
//! - `CredentialStore`: OS-level credential storage via keyring
//!
//! Tokens are issued by the remote login endpoint and expire after 24 hours.
//! Nothing in the fetch layer reads the session directly; views receive an
//! `ApiClient` that already carries the token.

pub mod credentials;
pub mod session;

pub use credentials::CredentialStore;
pub use session::{Session, SessionData};
