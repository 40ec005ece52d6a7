// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use strava_dashboard::error::AppError;

fn redirect_target(err: AppError) -> Option<String> {
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
}

#[test]
fn test_auth_errors_redirect_to_error_page() {
    for err in [
        AppError::Unauthenticated,
        AppError::OAuthDenied("access_denied".to_string()),
        AppError::TokenExchange("missing refresh_token".to_string()),
    ] {
        assert!(err.is_auth_error());
        assert_eq!(redirect_target(err).as_deref(), Some("/error"));
    }
}

#[test]
fn test_resource_errors_redirect_to_resource_error_page() {
    for err in [
        AppError::ResourceUnavailable("stream:heartrate".to_string()),
        AppError::Upstream("connection refused".to_string()),
    ] {
        assert!(!err.is_auth_error());
        assert_eq!(redirect_target(err).as_deref(), Some("/resource_error"));
    }
}

#[test]
fn test_bad_request_renders_page() {
    let response = AppError::BadRequest("Activity id must be numeric".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let err = AppError::Internal(anyhow::anyhow!("secret detail"));
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("An internal error occurred."));
    assert!(!body.contains("secret detail"));
}
