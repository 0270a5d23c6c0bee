//! Authentication module for credentials and the bearer-token session.
//!
//! This module provides:
//! - `Credentials`: username/password loaded once at startup
//! - `Session`: the current access token and its (margin-adjusted) expiry
//! - `Clock`: time source, swappable in tests
//!
//! Sessions live in memory only and are replaced wholesale on every
//! re-authentication.

pub mod credentials;
pub mod session;

pub use credentials::Credentials;
pub use session::{Clock, Session, SystemClock};
