// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie handling and the authenticated-session guard.

use crate::error::AppError;
use crate::services::session::{SessionHandle, SESSION_COOKIE};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

/// Authenticated session, inserted into request extensions by
/// [`require_session`].
#[derive(Clone)]
pub struct ActiveSession {
    pub id: String,
    pub session: SessionHandle,
}

/// Build the session cookie for `id`.
pub fn session_cookie(id: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Add the session cookie for `id` to `jar`.
pub fn with_session_cookie(state: &AppState, jar: CookieJar, id: String) -> CookieJar {
    let secure = state.config.public_url.starts_with("https://");
    jar.add(session_cookie(id, secure))
}

/// Cookie that clears the session cookie.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Find the caller's session, creating one (and its cookie) if needed.
pub fn session_for(
    state: &AppState,
    jar: CookieJar,
) -> Result<(CookieJar, String, SessionHandle), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let id = cookie.value().to_string();
        if let Some(session) = state.sessions.get(&id) {
            return Ok((jar, id, session));
        }
    }

    let (id, session) = state.sessions.create()?;
    let jar = with_session_cookie(state, jar, id.clone());
    Ok((jar, id, session))
}

/// Middleware that requires an authenticated session.
///
/// Unauthenticated callers are redirected to the error page before any
/// Strava call is made. Tokens close to expiry are refreshed here; a failed
/// refresh logs the session out.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let id = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AppError::Unauthenticated)?;

    let session = state.sessions.get(&id).ok_or(AppError::Unauthenticated)?;

    {
        let mut guard = session.lock().await;
        if !guard.is_authenticated() {
            return Err(AppError::Unauthenticated);
        }

        if guard.tokens.needs_refresh(chrono::Utc::now()) {
            tracing::info!("Access token expiring, refreshing");
            let refresh_token = guard.tokens.refresh_token().to_string();
            let refreshed = match state.strava.refresh(&refresh_token).await {
                Ok(grant) => guard.tokens.apply_refresh(grant),
                Err(e) => {
                    tracing::warn!(error = %e, "Token refresh failed");
                    false
                }
            };

            if !refreshed {
                guard.tokens.clear();
                return Err(AppError::Unauthenticated);
            }
            tracing::info!("Token refreshed");
        }
    }

    request.extensions_mut().insert(ActiveSession { id, session });
    Ok(next.run(request).await)
}
