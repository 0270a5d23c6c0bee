use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Source of "now" for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A bearer token together with the instant it should stop being used.
///
/// The stored expiry already has the safety margin subtracted, so
/// `is_expired_at` turns true before the server would reject the token.
/// Token and expiry are only ever replaced together.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from a token grant received at `issued_at`.
    ///
    /// A margin larger than the lifetime yields an expiry in the past,
    /// which forces re-authentication on the next request. Returns `None`
    /// when the expiry falls outside the representable date range.
    pub fn issue(
        access_token: impl Into<String>,
        lifetime: Duration,
        issued_at: DateTime<Utc>,
        margin: Duration,
    ) -> Option<Self> {
        let expires_at = issued_at
            .checked_add_signed(lifetime)?
            .checked_sub_signed(margin)?;
        Some(Self {
            access_token: access_token.into(),
            expires_at,
        })
    }

    pub fn token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }

    /// Get minutes remaining until expiry (for logging)
    pub fn minutes_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        self.time_until_expiry(now).num_minutes().max(0)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
