// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, Strava OAuth callback, logout and the error pages.

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{removal_cookie, session_for, with_session_cookie};
use crate::models::TokenSession;
use crate::presentation::pages::flags_form;
use crate::presentation::{render_page, Markup, Page};
use crate::services::oauth_state;
use crate::services::session::SESSION_COOKIE;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/error", get(error_page))
        .route("/resource_error", get(resource_error).post(resource_error))
        .route("/success", get(auth_callback))
        .route("/logout", get(logout))
}

/// Login page: a single button linking to the Strava consent screen.
async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>)> {
    let (jar, session_id, _) = session_for(&state, jar)?;

    let oauth_state = oauth_state::sign(&session_id, &state.config.session_key)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to sign OAuth state")))?;
    let auth_url = state
        .strava
        .authorize_url(&state.config.redirect_uri(), &oauth_state);

    let html = render_page(Page::Index, &[("AUTH_URL", &Markup::text(&auth_url))]);
    Ok((jar, Html(html)))
}

async fn error_page() -> Html<String> {
    Html(render_page(Page::Error, &[]))
}

async fn resource_error(State(state): State<Arc<AppState>>, jar: CookieJar) -> Html<String> {
    // Offer the flags form only to signed-in users; /updated requires it.
    let mut form = Markup::default();
    if let Some(session) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| state.sessions.get(c.value()))
    {
        let session = session.lock().await;
        if session.is_authenticated() {
            form = flags_form(session.flags.ignore_missing, session.flags.use_mock);
        }
    }

    Html(render_page(Page::ResourceError, &[("FLAGS_FORM", &form)]))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback: exchange the code for tokens and store them in the
/// caller's session, which then moves to a new id.
///
/// Any failure leaves the session unauthenticated and redirects to the
/// error page.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Html<String>)> {
    if let Some(error) = params.error {
        return Err(AppError::OAuthDenied(error));
    }

    let session_id = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AppError::Unauthenticated)?;
    let session = state
        .sessions
        .get(&session_id)
        .ok_or(AppError::Unauthenticated)?;

    let state_ok = params
        .state
        .as_deref()
        .is_some_and(|s| oauth_state::matches_session(s, &session_id, &state.config.session_key));
    if !state_ok {
        return Err(AppError::OAuthDenied("state mismatch".to_string()));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::TokenExchange("missing authorization code".to_string()))?;

    tracing::info!("Exchanging authorization code for tokens");
    let grant = state.strava.exchange_code(&code).await?;

    let tokens = TokenSession::authenticated(&code, grant)
        .ok_or_else(|| AppError::TokenExchange("incomplete token grant".to_string()))?;

    let mut session = session.lock().await;
    session.tokens = tokens;
    session.activity_ids.clear();

    let new_id = state.sessions.rotate(&session_id)?;
    let jar = with_session_cookie(&state, jar, new_id);
    tracing::info!("OAuth successful, session authenticated");

    let form = flags_form(session.flags.ignore_missing, session.flags.use_mock);
    Ok((
        jar,
        Html(render_page(Page::Success, &[("FLAGS_FORM", &form)])),
    ))
}

/// Forget the session and return to the login page.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if state.sessions.remove(cookie.value()) {
            tracing::info!("Session logged out");
        }
    }
    (jar.remove(removal_cookie()), Redirect::to("/"))
}
