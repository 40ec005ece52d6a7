// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The OAuth client credentials are read once at startup and never
//! mutated afterwards.

use std::env;
use std::fmt;

/// OAuth client credentials for the Strava application.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID and secret
    pub credentials: Credentials,
    /// Externally visible base URL, used to build the OAuth redirect URI
    pub public_url: String,
    /// Strava REST API base URL
    pub api_base_url: String,
    /// Strava OAuth base URL (`/authorize`, `/token`)
    pub oauth_base_url: String,
    /// Server port
    pub port: u16,
    /// HMAC key for signing the OAuth `state` parameter
    pub session_key: Vec<u8>,
    /// Idle lifetime of a browser session
    pub session_ttl_minutes: i64,
}

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_API_URL: &str = "https://www.strava.com/api/v3";
const DEFAULT_OAUTH_URL: &str = "https://www.strava.com/oauth";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 12 * 60;

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local
    /// development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let session_key = match env::var("SESSION_KEY") {
            Ok(key) if !key.trim().is_empty() => key.trim().as_bytes().to_vec(),
            _ => {
                tracing::warn!("SESSION_KEY not set, generating a per-process key");
                random_key()?
            }
        };

        Ok(Self {
            credentials: Credentials {
                client_id: env::var("CLIENT_ID")
                    .map(|v| v.trim().to_string())
                    .map_err(|_| ConfigError::Missing("CLIENT_ID"))?,
                client_secret: env::var("CLIENT_SECRET")
                    .map(|v| v.trim().to_string())
                    .map_err(|_| ConfigError::Missing("CLIENT_SECRET"))?,
            },
            public_url: env::var("PUBLIC_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            api_base_url: env::var("STRAVA_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            oauth_base_url: env::var("STRAVA_OAUTH_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_OAUTH_URL.to_string()),
            port,
            session_key,
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|m: &i64| *m > 0)
                .unwrap_or(DEFAULT_SESSION_TTL_MINUTES),
        })
    }

    /// Config for tests, pointing both Strava URLs at `upstream`.
    pub fn test_default_with_upstream(upstream: &str) -> Self {
        let upstream = upstream.trim_end_matches('/');
        Self {
            credentials: Credentials {
                client_id: "test_client_id".to_string(),
                client_secret: "test_secret".to_string(),
            },
            public_url: "http://localhost:5000".to_string(),
            api_base_url: format!("{}/api/v3", upstream),
            oauth_base_url: format!("{}/oauth", upstream),
            port: DEFAULT_PORT,
            session_key: b"test_session_key_32_bytes_min!!!".to_vec(),
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
        }
    }

    /// Config for tests with an unreachable upstream.
    pub fn test_default() -> Self {
        Self::test_default_with_upstream("http://127.0.0.1:9")
    }

    /// OAuth callback URL registered with Strava.
    pub fn redirect_uri(&self) -> String {
        format!("{}/success", self.public_url)
    }
}

fn random_key() -> Result<Vec<u8>, ConfigError> {
    use ring::rand::{SecureRandom, SystemRandom};

    let mut key = vec![0u8; 32];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| ConfigError::Random)?;
    Ok(key)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("System random number generator unavailable")]
    Random,
}
