// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard pages: menu, display flags and the data views.

use axum::{
    extract::{Query, State},
    response::Html,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::Form;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::ActiveSession;
use crate::models::activity::format_number;
use crate::models::{DisplayFlags, MetricSeries, Record};
use crate::presentation::{
    activity_card, card, graph_plot, img_card, list_metrics, null_component, processed,
    render_fragments, render_page, section, stats_card, Fragment, Markup, Page,
};
use crate::services::charts::LineChart;
use crate::services::fetcher::{Fetched, ResourceFetcher};
use crate::services::mock::{MockGenerator, MOCK_SERIES_LEN};
use crate::AppState;

/// Most activities plotted on the health page.
const HEALTH_CHART_LIMIT: usize = 4;

const MENU: [(&str, &str, &str); 3] = [
    (
        "Recents",
        "Click to see your recent activities here.",
        "/stats/recents",
    ),
    ("Activities", "Manage your activities.", "/stats/activities"),
    (
        "Health",
        "Track your health statistics here.",
        "/stats/health",
    ),
];

/// Fields shown on the activity detail page, in order.
const DETAIL_FIELDS: [&str; 10] = [
    "name",
    "type",
    "calories",
    "description",
    "distance",
    "moving_time",
    "elapsed_time",
    "average_speed",
    "max_speed",
    "has_heartrate",
];

/// Streams plotted against time on the activity detail page.
const PERFORMANCE_STREAMS: [&str; 2] = ["distance", "velocity_smooth"];

/// Where a recents card takes its value from.
#[derive(Clone, Copy)]
enum CardSource {
    /// `distance` of a totals object in the athlete stats.
    StatsTotal,
    /// Mean of a field over the activity listing.
    ListingAverage,
}

const RECENT_CARDS: [(&str, CardSource); 4] = [
    ("all_run_totals", CardSource::StatsTotal),
    ("all_ride_totals", CardSource::StatsTotal),
    ("average_heartrate", CardSource::ListingAverage),
    ("max_speed", CardSource::ListingAverage),
];

const RECENT_METRICS: [&str; 5] = [
    "average_speed",
    "average_cadence",
    "average_temp",
    "average_watts",
    "total_elevation_gain",
];

const RECENT_TOTALS: [&str; 4] = [
    "recent_run_totals",
    "recent_ride_totals",
    "biggest_ride_distance",
    "biggest_climb_elevation_gain",
];

/// The public menu page.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(menu))
}

/// Pages that need an authenticated session.
/// The session middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/updated", post(update_flags))
        .route("/stats/activities", get(activities))
        .route("/stats/health", get(health))
        .route("/stats/recents", get(recents))
        .route("/stats/activities/each_activity", get(each_activity))
}

async fn menu() -> Html<String> {
    let cards: Vec<Fragment> = MENU
        .iter()
        .map(|(title, subtitle, href)| card(title, subtitle, href))
        .collect();

    Html(render_page(
        Page::Stats,
        &[("CODE", &render_fragments(&cards))],
    ))
}

// ─── Display flags ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct FlagsForm {
    #[serde(default)]
    check: Vec<String>,
}

/// Store the display flags posted from the checkbox form.
async fn update_flags(
    Extension(active): Extension<ActiveSession>,
    Form(form): Form<FlagsForm>,
) -> Html<String> {
    let flags = DisplayFlags::from_checks(form.check.as_slice());
    active.session.lock().await.update_flags(flags);
    tracing::info!(
        ignore_missing = flags.ignore_missing,
        use_mock = flags.use_mock,
        "Display flags updated"
    );

    let yes_no = |on: bool| Markup::text(if on { "yes" } else { "no" });
    Html(render_page(
        Page::Updated,
        &[
            ("IGNORE", &yes_no(flags.ignore_missing)),
            ("MOCK", &yes_no(flags.use_mock)),
        ],
    ))
}

// ─── Activities ──────────────────────────────────────────────

fn activity_ids(records: &[Record]) -> Vec<String> {
    records.iter().filter_map(Record::id).collect()
}

/// One card per activity, each linking to its detail page.
async fn activities(
    State(state): State<Arc<AppState>>,
    Extension(active): Extension<ActiveSession>,
) -> Result<Html<String>> {
    let mut guard = active.session.lock().await;
    let session = &mut *guard;
    let fetcher = ResourceFetcher::new(
        &state.strava,
        session.tokens.access_token(),
        session.flags,
    );

    let policy = *fetcher.policy();

    let mut fragments = Vec::new();
    match fetcher.activities().await? {
        Fetched::Live(records) => {
            session.activity_ids = activity_ids(&records);
            for record in &records {
                // A card links to the detail page, so it cannot be mocked.
                let card = match (record.id(), record.name(), record.kind()) {
                    (Some(id), Some(name), Some(kind)) => stats_card(&name, &kind, &id),
                    _ => {
                        policy.on_failure_unmockable::<()>("activity summary")?;
                        null_component()
                    }
                };
                fragments.push(card);
            }
            tracing::debug!(count = session.activity_ids.len(), "Listed activities");
        }
        _ => fragments.push(null_component()),
    }

    Ok(Html(render_page(
        Page::Activities,
        &[("CODE", &render_fragments(&fragments))],
    )))
}

// ─── Health ──────────────────────────────────────────────────

/// Heart rate against time for the most recent activities.
async fn health(
    State(state): State<Arc<AppState>>,
    Extension(active): Extension<ActiveSession>,
) -> Result<Html<String>> {
    let mut guard = active.session.lock().await;
    let session = &mut *guard;
    let fetcher = ResourceFetcher::new(
        &state.strava,
        session.tokens.access_token(),
        session.flags,
    );

    // Without a fresh listing, fall back to the ids from the last one.
    let ids = match fetcher.activities().await? {
        Fetched::Live(records) => {
            session.activity_ids = activity_ids(&records);
            session.activity_ids.clone()
        }
        _ => session.activity_ids.clone(),
    };

    let mut charts = Vec::new();
    for id in ids.iter().take(HEALTH_CHART_LIMIT) {
        let time = fetcher
            .series(id, "time", || MockGenerator::time_axis(MOCK_SERIES_LEN))
            .await?;
        let Some((time, time_mock)) = time.into_parts() else {
            charts.push(null_component());
            break;
        };

        let heartrate = fetcher
            .series(id, "heartrate", || {
                session.mock.series(70..120, MOCK_SERIES_LEN)
            })
            .await?;
        let Some((heartrate, heartrate_mock)) = heartrate.into_parts() else {
            charts.push(null_component());
            break;
        };

        let image = state.charts.render(&LineChart {
            title: format!("Activity ID {}", id),
            x_label: "Time".to_string(),
            y_label: "Heart Rate".to_string(),
            x: time,
            y: heartrate,
        })?;
        charts.push(graph_plot("heart", time_mock || heartrate_mock, image));
    }
    if charts.is_empty() {
        charts.push(null_component());
    }

    let fragments = [section("Health data analysis", charts)];
    Ok(Html(render_page(
        Page::Health,
        &[("CODE", &render_fragments(&fragments))],
    )))
}

// ─── Recents ─────────────────────────────────────────────────

/// Headline cards, averages over the listing and recent totals.
async fn recents(
    State(state): State<Arc<AppState>>,
    Extension(active): Extension<ActiveSession>,
) -> Result<Html<String>> {
    let mut guard = active.session.lock().await;
    let session = &mut *guard;
    let fetcher = ResourceFetcher::new(
        &state.strava,
        session.tokens.access_token(),
        session.flags,
    );
    let policy = *fetcher.policy();

    let listing = fetcher.activities().await?.live();
    if let Some(records) = &listing {
        session.activity_ids = activity_ids(records);
    }
    let listing = listing.unwrap_or_default();

    let athlete_id = fetcher.athlete().await?.live().and_then(|a| a.id());
    let stats = match athlete_id {
        Some(athlete_id) => fetcher.athlete_stats(&athlete_id).await?,
        None => policy.on_failure_unmockable("athlete_stats")?,
    }
    .live();
    let stat_total = |field: &str| stats.as_ref().and_then(|s| s.total(field));

    let mut cards = Vec::new();
    for (field, source) in RECENT_CARDS {
        let live = match source {
            CardSource::StatsTotal => stat_total(field).map(|v| MetricSeries(vec![v])),
            CardSource::ListingAverage => MetricSeries::from_records(&listing, field),
        }
        .filter(|s| !s.is_empty());

        let fetched = policy.field(field, live, || {
            session.mock.series(5..10, MOCK_SERIES_LEN)
        })?;
        let Some((series, mock)) = fetched.into_parts() else {
            cards.push(null_component());
            continue;
        };

        let value = series.average().unwrap_or_default();
        let image = (series.values().len() > 1)
            .then(|| {
                state.charts.render(&LineChart {
                    title: processed(field),
                    x_label: String::new(),
                    y_label: String::new(),
                    x: MockGenerator::time_axis(series.values().len()),
                    y: series.clone(),
                })
            })
            .transpose()?;
        cards.push(img_card(field, &processed(field), value, mock, image));
    }

    let mut metrics = Vec::new();
    for field in RECENT_METRICS {
        let live = MetricSeries::from_records(&listing, field).and_then(|s| s.average());
        let fetched = policy.field(field, live, || session.mock.value(10))?;
        metrics.push(match fetched.into_parts() {
            Some((value, mock)) => list_metrics(field, value, mock),
            None => null_component(),
        });
    }

    let mut totals = Vec::new();
    for field in RECENT_TOTALS {
        let fetched = policy.field(field, stat_total(field), || session.mock.value(10))?;
        totals.push(match fetched.into_parts() {
            Some((value, mock)) => list_metrics(field, value, mock),
            None => null_component(),
        });
    }

    Ok(Html(render_page(
        Page::Recents,
        &[
            ("CARDS", &render_fragments(&cards)),
            ("METRICS", &render_fragments(&metrics)),
            ("RECENTS", &render_fragments(&totals)),
        ],
    )))
}

// ─── Activity detail ─────────────────────────────────────────

/// Query parameters of the activity detail page.
#[derive(Debug, Deserialize, Validate)]
pub struct EachActivityQuery {
    #[serde(default)]
    #[validate(length(min = 1, max = 20))]
    pub id: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub activity_name: Option<String>,
}

impl EachActivityQuery {
    fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::BadRequest(format!("Invalid query: {}", e)))?;
        if !self.id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::BadRequest(
                "Activity id must be numeric".to_string(),
            ));
        }
        Ok(())
    }
}

/// Field cards and performance charts for one activity.
async fn each_activity(
    State(state): State<Arc<AppState>>,
    Extension(active): Extension<ActiveSession>,
    Query(query): Query<EachActivityQuery>,
) -> Result<Html<String>> {
    query.check()?;
    let id = query.id.as_str();

    let mut guard = active.session.lock().await;
    let session = &mut *guard;
    let fetcher = ResourceFetcher::new(
        &state.strava,
        session.tokens.access_token(),
        session.flags,
    );
    let policy = *fetcher.policy();

    let mut fragments = Vec::new();
    let mut title = query.activity_name.clone();
    match fetcher.activity(id).await? {
        Fetched::Live(record) => {
            if title.is_none() {
                title = record.name();
            }
            for field in DETAIL_FIELDS {
                let fetched = policy.field(field, record.text(field), || {
                    format_number(session.mock.value(10))
                })?;
                fragments.push(match fetched.into_parts() {
                    Some((value, mock)) => activity_card(field, &value, mock),
                    None => null_component(),
                });
            }
        }
        _ => fragments.push(null_component()),
    }

    let mut analysis = Vec::new();
    let time = fetcher
        .series(id, "time", || MockGenerator::time_axis(MOCK_SERIES_LEN))
        .await?;
    match time.into_parts() {
        Some((time, time_mock)) => {
            for key in PERFORMANCE_STREAMS {
                let series = fetcher
                    .series(id, key, || session.mock.series(5..10, MOCK_SERIES_LEN))
                    .await?;
                let Some((series, mock)) = series.into_parts() else {
                    analysis.push(null_component());
                    break;
                };
                if time.is_empty() || series.is_empty() {
                    continue;
                }

                let image = state.charts.render(&LineChart {
                    title: processed(key),
                    x_label: "Time".to_string(),
                    y_label: processed(key),
                    x: time.clone(),
                    y: series,
                })?;
                analysis.push(graph_plot(key, time_mock || mock, image));
            }
        }
        None => analysis.push(null_component()),
    }
    fragments.push(section("Performance Analysis", analysis));

    let title = Markup::text(title.as_deref().unwrap_or("Activity"));
    Ok(Html(render_page(
        Page::EachActivity,
        &[
            ("ACTIVITY_NAME", &title),
            ("CODE", &render_fragments(&fragments)),
        ],
    )))
}
