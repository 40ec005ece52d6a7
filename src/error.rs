// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! The dashboard is a server-rendered site, so errors surface as redirects
//! to one of the two error pages rather than as JSON bodies.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

/// Route for authentication failures.
pub const ERROR_ROUTE: &str = "/error";
/// Route for upstream resource failures.
pub const RESOURCE_ERROR_ROUTE: &str = "/resource_error";

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Authorization denied: {0}")]
    OAuthDenied(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Strava API error: {0}")]
    Upstream(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this error sends the user back to the login error page.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            AppError::Unauthenticated | AppError::OAuthDenied(_) | AppError::TokenExchange(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Unauthenticated => Redirect::to(ERROR_ROUTE).into_response(),
            AppError::OAuthDenied(reason) => {
                tracing::warn!(reason = %reason, "OAuth authorization denied");
                Redirect::to(ERROR_ROUTE).into_response()
            }
            AppError::TokenExchange(msg) => {
                tracing::warn!(error = %msg, "Token exchange failed");
                Redirect::to(ERROR_ROUTE).into_response()
            }
            AppError::ResourceUnavailable(msg) => {
                tracing::warn!(resource = %msg, "Resource unavailable, redirecting");
                Redirect::to(RESOURCE_ERROR_ROUTE).into_response()
            }
            AppError::Upstream(msg) => {
                tracing::warn!(error = %msg, "Strava API error, redirecting");
                Redirect::to(RESOURCE_ERROR_ROUTE).into_response()
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Html(crate::presentation::pages::render_message_page(
                    "Bad request",
                    msg,
                )),
            )
                .into_response(),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(crate::presentation::pages::render_message_page(
                        "Something went wrong",
                        "An internal error occurred.",
                    )),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
