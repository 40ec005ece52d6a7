// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-browser session state: OAuth tokens, display flags and the most
//! recent activity listing.

use chrono::{DateTime, Duration, Utc};

use crate::services::mock::MockGenerator;

/// Margin before token expiration when we proactively refresh (5 minutes).
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Tokens returned by a successful code exchange or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    /// Absolute expiry (Unix timestamp), if Strava reported one
    pub expires_at: Option<i64>,
}

/// OAuth state for one browser.
///
/// Either all three of `auth_code`, `access_token` and `refresh_token` are
/// set, or none are. The only way to populate them is
/// [`TokenSession::authenticated`], which refuses partial grants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSession {
    auth_code: String,
    access_token: String,
    refresh_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl TokenSession {
    /// Build an authenticated token session, or `None` if any part is empty.
    pub fn authenticated(auth_code: &str, grant: TokenGrant) -> Option<Self> {
        if auth_code.is_empty() || grant.access_token.is_empty() || grant.refresh_token.is_empty()
        {
            return None;
        }

        Some(Self {
            auth_code: auth_code.to_string(),
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expires_at: grant
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        !self.auth_code.is_empty()
            && !self.access_token.is_empty()
            && !self.refresh_token.is_empty()
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the access token expires within the refresh margin.
    ///
    /// Tokens without a reported expiry never need refreshing.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);
        self.expires_at
            .is_some_and(|expires_at| now + margin >= expires_at)
    }

    /// Swap in refreshed tokens. Returns `false` (and leaves the session
    /// untouched) if the grant is incomplete.
    pub fn apply_refresh(&mut self, grant: TokenGrant) -> bool {
        if !self.is_authenticated()
            || grant.access_token.is_empty()
            || grant.refresh_token.is_empty()
        {
            return false;
        }

        self.access_token = grant.access_token;
        self.refresh_token = grant.refresh_token;
        self.expires_at = grant
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0));
        true
    }

    /// Drop all tokens, returning to the unauthenticated state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// User choices for how missing upstream data is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayFlags {
    /// Render placeholders (or mock data) instead of failing the page
    pub ignore_missing: bool,
    /// Substitute mock values for missing series and metrics
    pub use_mock: bool,
}

impl DisplayFlags {
    /// Parse the `check` checkbox values submitted by the flags form.
    ///
    /// Unknown values are ignored; flags absent from the list are off.
    pub fn from_checks<S: AsRef<str>>(checks: &[S]) -> Self {
        let mut flags = Self::default();
        for check in checks {
            match check.as_ref() {
                "ignore" => flags.ignore_missing = true,
                "mock" => flags.use_mock = true,
                _ => {}
            }
        }
        flags
    }
}

/// Everything the dashboard remembers about one browser.
#[derive(Debug)]
pub struct Session {
    pub tokens: TokenSession,
    pub flags: DisplayFlags,
    /// IDs from the most recent activity listing, newest first
    pub activity_ids: Vec<String>,
    pub mock: MockGenerator,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            tokens: TokenSession::default(),
            flags: DisplayFlags::default(),
            activity_ids: Vec::new(),
            mock: MockGenerator::new(),
        }
    }
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    /// Replace the display flags and restart the mock sequence.
    pub fn update_flags(&mut self, flags: DisplayFlags) {
        self.flags = flags;
        self.mock.reset();
    }
}
