// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client.
//!
//! Handles:
//! - Authorization code exchange and token refresh
//! - Activity listing, detail and streams
//! - Athlete profile and aggregate stats
//!
//! Data calls never turn an HTTP error status into an `Err`: they return an
//! [`ApiResponse`] so the caller can apply its fallback policy per endpoint.

use crate::config::Credentials;
use crate::error::AppError;
use crate::models::TokenGrant;
use serde::Deserialize;
use serde_json::Value;

/// Outcome of a data call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Status below 400, with the decoded body (`Null` if it was not JSON).
    Success(Value),
    /// Status 400 or above.
    Failure { status: u16 },
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_base_url: String,
    oauth_base_url: String,
    credentials: Credentials,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(credentials: Credentials, api_base_url: &str, oauth_base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            oauth_base_url: oauth_base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// URL of the Strava consent page for this application.
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/authorize?\
             client_id={}&\
             response_type=code&\
             redirect_uri={}&\
             approval_prompt=force&\
             scope=read,activity:read_all&\
             state={}",
            self.oauth_base_url,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state)
        )
    }

    // ─── OAuth ───────────────────────────────────────────────────────────────

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenGrant, AppError> {
        self.token_request(&[
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    /// Refresh an expired access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AppError> {
        self.token_request(&[
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenGrant, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_base_url))
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::TokenExchange(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token request rejected");
            return Err(AppError::TokenExchange(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::TokenExchange(format!("malformed token response: {}", e)))?;

        parse_token_response(body)
    }

    // ─── Data ────────────────────────────────────────────────────────────────

    /// List the athlete's activities, newest first.
    pub async fn list_activities(&self, access_token: &str) -> Result<ApiResponse, AppError> {
        self.get("/athlete/activities", access_token, &[]).await
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: &str,
    ) -> Result<ApiResponse, AppError> {
        let path = format!("/activities/{}", activity_id);
        self.get(&path, access_token, &[("include_all_efforts", "true")])
            .await
    }

    /// Get one stream (`time`, `heartrate`, `distance`, `velocity_smooth`)
    /// of an activity, keyed by type.
    pub async fn get_stream(
        &self,
        access_token: &str,
        activity_id: &str,
        key: &str,
    ) -> Result<ApiResponse, AppError> {
        let path = format!("/activities/{}/streams", activity_id);
        self.get(&path, access_token, &[("keys", key), ("key_by_type", "true")])
            .await
    }

    /// Get authenticated athlete profile.
    pub async fn get_athlete(&self, access_token: &str) -> Result<ApiResponse, AppError> {
        self.get("/athlete", access_token, &[]).await
    }

    /// Get aggregate totals for an athlete.
    pub async fn get_athlete_stats(
        &self,
        access_token: &str,
        athlete_id: &str,
    ) -> Result<ApiResponse, AppError> {
        let path = format!("/athletes/{}/stats", athlete_id);
        self.get(&path, access_token, &[]).await
    }

    /// Generic GET with the access token passed as a query parameter.
    async fn get(
        &self,
        path: &str,
        access_token: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse, AppError> {
        let url = format!("{}{}", self.api_base_url, path);

        let response = self
            .http
            .get(&url)
            .query(&[("access_token", access_token)])
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status();
        if status.as_u16() >= 400 {
            if status.as_u16() == 429 {
                tracing::warn!(endpoint = %path, "Strava rate limit hit (429)");
            } else {
                tracing::debug!(endpoint = %path, status = %status, "Strava request failed");
            }
            return Ok(ApiResponse::Failure {
                status: status.as_u16(),
            });
        }

        let body = response.json::<Value>().await.unwrap_or_else(|e| {
            tracing::warn!(endpoint = %path, error = %e, "Strava response was not JSON");
            Value::Null
        });

        Ok(ApiResponse::Success(body))
    }
}

/// Token endpoint response. Both tokens must be present.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
}

fn parse_token_response(body: Value) -> Result<TokenGrant, AppError> {
    let parsed: TokenResponse = serde_json::from_value(body)
        .map_err(|e| AppError::TokenExchange(format!("malformed token response: {}", e)))?;

    match (parsed.access_token, parsed.refresh_token) {
        (Some(access_token), Some(refresh_token))
            if !access_token.is_empty() && !refresh_token.is_empty() =>
        {
            Ok(TokenGrant {
                access_token,
                refresh_token,
                expires_at: parsed.expires_at,
            })
        }
        _ => Err(AppError::TokenExchange(
            "token response missing access_token or refresh_token".to_string(),
        )),
    }
}
