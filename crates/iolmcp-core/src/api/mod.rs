//! REST API client module for the InvertirOnline API.
//!
//! This module provides the `IolClient` for authenticated calls against
//! the brokerage API. Tokens come from the OAuth2 password grant on
//! `/token` and are renewed before expiry, or once more when a request
//! comes back 401.

pub mod client;
pub mod error;
pub mod query;

pub use client::IolClient;
pub use error::ApiError;
pub use query::QueryParams;
