//! Core library for iolmcp.
//!
//! Holds everything that talks to the InvertirOnline REST API:
//! - `config`: environment-driven configuration
//! - `auth`: credentials and the bearer-token session
//! - `api`: the authenticated `IolClient` and its error type
//! - `endpoints`: one thin wrapper per API endpoint, grouped by area

pub mod api;
pub mod auth;
pub mod config;
pub mod endpoints;

pub use api::{ApiError, IolClient, QueryParams};
pub use auth::{Clock, Credentials, Session, SystemClock};
pub use config::{Config, ConfigError};
