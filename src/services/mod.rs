// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - Strava access, sessions and rendering support.

pub mod charts;
pub mod fetcher;
pub mod mock;
pub mod oauth_state;
pub mod session;
pub mod strava;

pub use charts::{ChartImage, ChartRenderer, LineChart, SvgChartRenderer};
pub use fetcher::{FallbackPolicy, Fetched, ResourceFetcher};
pub use mock::MockGenerator;
pub use session::{SessionHandle, SessionStore};
pub use strava::{ApiResponse, StravaClient};
