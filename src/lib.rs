// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava Dashboard: a server-rendered view of a Strava athlete's data.
//!
//! This crate provides the OAuth login flow, the Strava API client with its
//! missing-data fallback policy, and the HTML pages built from the results.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod presentation;
pub mod routes;
pub mod services;

use config::Config;
use services::{ChartRenderer, SessionStore, StravaClient, SvgChartRenderer};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub strava: StravaClient,
    pub sessions: SessionStore,
    pub charts: Arc<dyn ChartRenderer>,
}

impl AppState {
    /// State with the default SVG chart renderer.
    pub fn new(config: Config) -> Self {
        let strava = StravaClient::new(
            config.credentials.clone(),
            &config.api_base_url,
            &config.oauth_base_url,
        );
        let sessions = SessionStore::new(chrono::Duration::minutes(config.session_ttl_minutes));

        Self {
            config,
            strava,
            sessions,
            charts: Arc::new(SvgChartRenderer::default()),
        }
    }
}
