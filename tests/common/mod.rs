// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: an in-process fake Strava and a login helper.

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Form, Path, Query, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get as route_get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use strava_dashboard::config::Config;
use strava_dashboard::routes::create_router;
use strava_dashboard::services::oauth_state;
use strava_dashboard::services::session::SESSION_COOKIE;
use strava_dashboard::AppState;
use tower::ServiceExt;

/// Authorization code the fake accepts with a long-lived grant.
pub const GOOD_CODE: &str = "good";
/// Authorization code granting a token that is about to expire.
pub const EXPIRING_CODE: &str = "expiring";
/// Authorization code whose grant lacks a refresh token.
pub const PARTIAL_CODE: &str = "partial";

#[derive(Default)]
pub struct FakeStravaState {
    failing: Mutex<HashSet<String>>,
    omitted: Mutex<HashSet<String>>,
    api_hits: AtomicUsize,
    tokens_seen: Mutex<Vec<String>>,
}

impl FakeStravaState {
    fn is_failing(&self, name: &str) -> bool {
        self.failing.lock().unwrap().contains(name)
    }

    fn record(&self, query: &HashMap<String, String>) {
        self.api_hits.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = query.get("access_token") {
            self.tokens_seen.lock().unwrap().push(token.clone());
        }
    }
}

/// A fake Strava API and OAuth server listening on a random local port.
pub struct FakeStrava {
    pub url: String,
    state: Arc<FakeStravaState>,
}

impl FakeStrava {
    pub async fn start() -> Self {
        let state = Arc::new(FakeStravaState::default());
        let router = Router::new()
            .route("/oauth/token", post(token))
            .route("/api/v3/athlete/activities", route_get(list_activities))
            .route("/api/v3/activities/{id}", route_get(get_activity))
            .route("/api/v3/activities/{id}/streams", route_get(get_streams))
            .route("/api/v3/athlete", route_get(get_athlete))
            .route("/api/v3/athletes/{id}/stats", route_get(get_stats))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind random port");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    /// Make an endpoint fail with 404. Names: `activities`, `activity`,
    /// `athlete`, `stats`, `streams`, `stream:<key>`, `refresh`.
    pub fn fail(&self, name: &str) {
        self.state.failing.lock().unwrap().insert(name.to_string());
    }

    /// Drop `field` from every record in the activity listing.
    pub fn omit(&self, field: &str) {
        self.state.omitted.lock().unwrap().insert(field.to_string());
    }

    /// Number of data API requests received (token requests excluded).
    pub fn api_hits(&self) -> usize {
        self.state.api_hits.load(Ordering::SeqCst)
    }

    /// Access token sent with the most recent data API request.
    pub fn last_token(&self) -> Option<String> {
        self.state.tokens_seen.lock().unwrap().last().cloned()
    }
}

async fn token(
    State(fake): State<Arc<FakeStravaState>>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let now = chrono::Utc::now().timestamp();
    let grant_type = params.get("grant_type").map(String::as_str);

    match grant_type {
        Some("authorization_code") => match params.get("code").map(String::as_str) {
            Some(GOOD_CODE) => Json(json!({
                "token_type": "Bearer",
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_at": now + 6 * 3600,
            }))
            .into_response(),
            Some(EXPIRING_CODE) => Json(json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_at": now + 60,
            }))
            .into_response(),
            Some(PARTIAL_CODE) => Json(json!({ "access_token": "access-1" })).into_response(),
            _ => (StatusCode::BAD_REQUEST, "invalid code").into_response(),
        },
        Some("refresh_token") if !fake.is_failing("refresh") => Json(json!({
            "access_token": "access-2",
            "refresh_token": "refresh-2",
            "expires_at": now + 6 * 3600,
        }))
        .into_response(),
        _ => (StatusCode::BAD_REQUEST, "invalid grant").into_response(),
    }
}

fn respond(
    fake: &FakeStravaState,
    query: &HashMap<String, String>,
    name: &str,
    body: Option<Value>,
) -> Response {
    fake.record(query);
    match body {
        Some(body) if !fake.is_failing(name) => Json(body).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Record Not Found" })))
            .into_response(),
    }
}

async fn list_activities(
    State(fake): State<Arc<FakeStravaState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut listing = activities_json();
    if let Value::Array(records) = &mut listing {
        let omitted = fake.omitted.lock().unwrap();
        for record in records.iter_mut().filter_map(Value::as_object_mut) {
            record.retain(|key, _| !omitted.contains(key));
        }
    }
    respond(&fake, &query, "activities", Some(listing))
}

async fn get_activity(
    State(fake): State<Arc<FakeStravaState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    respond(&fake, &query, "activity", activity_json(&id))
}

async fn get_streams(
    State(fake): State<Arc<FakeStravaState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let key = query.get("keys").cloned().unwrap_or_default();
    if fake.is_failing(&format!("stream:{}", key)) {
        return respond(&fake, &query, "streams", None);
    }
    let body = stream_data(&id, &key).map(|data| {
        let mut by_type = serde_json::Map::new();
        by_type.insert(key.clone(), json!({ "data": data }));
        Value::Object(by_type)
    });
    respond(&fake, &query, "streams", body)
}

async fn get_athlete(
    State(fake): State<Arc<FakeStravaState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    respond(
        &fake,
        &query,
        "athlete",
        Some(json!({ "id": 7, "firstname": "Test", "lastname": "Athlete" })),
    )
}

async fn get_stats(
    State(fake): State<Arc<FakeStravaState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let body = (id == "7").then(stats_json);
    respond(&fake, &query, "stats", body)
}

pub fn activities_json() -> Value {
    json!([
        {
            "id": 101,
            "name": "Morning Run",
            "type": "Run",
            "average_heartrate": 140.0,
            "max_speed": 5.0,
            "average_speed": 3.0,
            "average_cadence": 80.0,
            "average_temp": 20.0,
            "average_watts": 200.0,
            "total_elevation_gain": 50.0
        },
        {
            "id": 102,
            "name": "Evening <Ride>",
            "type": "Ride",
            "average_heartrate": 120.0,
            "max_speed": 10.0,
            "average_speed": 7.0,
            "average_cadence": 90.0,
            "average_temp": 22.0,
            "average_watts": 180.0,
            "total_elevation_gain": 150.0
        }
    ])
}

/// Activity 101 is complete; 102 has no `calories` field.
fn activity_json(id: &str) -> Option<Value> {
    match id {
        "101" => Some(json!({
            "id": 101,
            "name": "Morning Run",
            "type": "Run",
            "calories": 500,
            "description": null,
            "distance": 5000.0,
            "moving_time": 1500,
            "elapsed_time": 1600,
            "average_speed": 3.3,
            "max_speed": 5.0,
            "has_heartrate": true
        })),
        "102" => Some(json!({
            "id": 102,
            "name": "Evening <Ride>",
            "type": "Ride",
            "description": "Windy",
            "distance": 20000.0,
            "moving_time": 3000,
            "elapsed_time": 3300,
            "average_speed": 6.6,
            "max_speed": 10.0,
            "has_heartrate": true
        })),
        _ => None,
    }
}

fn stream_data(id: &str, key: &str) -> Option<Vec<f64>> {
    if id != "101" && id != "102" {
        return None;
    }
    match key {
        "time" => Some(vec![0.0, 1.0, 2.0, 3.0]),
        "heartrate" => Some(vec![100.0, 110.0, 120.0, 130.0]),
        "distance" => Some(vec![0.0, 10.0, 20.0, 30.0]),
        "velocity_smooth" => Some(vec![0.0, 2.0, 3.0, 4.0]),
        _ => None,
    }
}

fn stats_json() -> Value {
    json!({
        "all_run_totals": { "count": 10, "distance": 100000.0 },
        "all_ride_totals": { "count": 5, "distance": 250000.0 },
        "recent_run_totals": { "count": 2, "distance": 20000.0 },
        "recent_ride_totals": { "count": 1, "distance": 40000.0 },
        "biggest_ride_distance": 80000.0,
        "biggest_climb_elevation_gain": 900.0
    })
}

/// Create a test app talking to `upstream`.
/// Returns the router and the shared state.
pub fn create_test_app(upstream: &str) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default_with_upstream(upstream)));
    (create_router(state.clone()), state)
}

/// Issue a request, optionally carrying the session cookie.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    form: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match form {
        Some(form) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    send(app, "GET", uri, cookie, None).await
}

pub async fn post_form(app: &Router, uri: &str, cookie: &str, form: &str) -> Response {
    send(app, "POST", uri, Some(cookie), Some(form)).await
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 4 * 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
}

pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// The `name=value` session cookie set by `response`, if any.
pub fn issued_session_cookie(response: &Response) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE);
    set_cookie_headers(response)
        .into_iter()
        .find(|value| value.starts_with(&prefix))
        .map(|header| header.split(';').next().unwrap().to_string())
}

/// Visit the login page and return the `name=value` session cookie.
pub async fn new_session(app: &Router) -> String {
    let response = get(app, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    issued_session_cookie(&response).expect("session cookie set")
}

pub fn session_id(cookie: &str) -> &str {
    cookie.split_once('=').unwrap().1
}

/// Run the OAuth callback for a fresh session with `code`.
/// Returns the session cookie in effect afterwards (rotated on success)
/// and the callback response.
pub async fn login_with(app: &Router, state: &AppState, code: &str) -> (String, Response) {
    let cookie = new_session(app).await;
    let signed = oauth_state::sign(session_id(&cookie), &state.config.session_key).unwrap();
    let uri = format!(
        "/success?code={}&state={}&scope=read,activity:read_all",
        code,
        urlencoding::encode(&signed)
    );
    let response = get(app, &uri, Some(&cookie)).await;
    let cookie = issued_session_cookie(&response).unwrap_or(cookie);
    (cookie, response)
}

/// Log in successfully and return the session cookie.
pub async fn login(app: &Router, state: &AppState) -> String {
    let (cookie, response) = login_with(app, state, GOOD_CODE).await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie
}
