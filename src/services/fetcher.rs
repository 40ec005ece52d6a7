// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resource fetching with the missing-data fallback policy.
//!
//! Each call site decides independently what to do when Strava fails:
//!
//! | `ignore_missing` | `use_mock` | outcome                          |
//! |------------------|------------|----------------------------------|
//! | false            | any        | `Err(ResourceUnavailable)`       |
//! | true             | false      | [`Fetched::Missing`] placeholder |
//! | true             | true       | [`Fetched::Mock`] substitution   |
//!
//! Resources that cannot be meaningfully mocked (a listing, an athlete
//! profile) fall back to `Missing` even in mock mode.

use serde_json::Value;

use crate::error::AppError;
use crate::models::{DisplayFlags, MetricSeries, Record};
use crate::services::strava::{ApiResponse, StravaClient};

/// Result of fetching one resource or field under the fallback policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// Live data from Strava.
    Live(T),
    /// Unavailable; render a placeholder.
    Missing,
    /// Unavailable; substituted with mock data.
    Mock(T),
}

impl<T> Fetched<T> {
    /// The value and whether it is mock data, or `None` if missing.
    pub fn into_parts(self) -> Option<(T, bool)> {
        match self {
            Fetched::Live(v) => Some((v, false)),
            Fetched::Mock(v) => Some((v, true)),
            Fetched::Missing => None,
        }
    }

    pub fn live(self) -> Option<T> {
        match self {
            Fetched::Live(v) => Some(v),
            _ => None,
        }
    }
}

/// The three-way fallback decision, driven by the session's display flags.
#[derive(Debug, Clone, Copy)]
pub struct FallbackPolicy {
    flags: DisplayFlags,
}

impl FallbackPolicy {
    pub fn new(flags: DisplayFlags) -> Self {
        Self { flags }
    }

    /// Handle a failure for something that can be mocked.
    pub fn on_failure<T>(
        &self,
        resource: &str,
        mock: impl FnOnce() -> T,
    ) -> Result<Fetched<T>, AppError> {
        if !self.flags.ignore_missing {
            return Err(AppError::ResourceUnavailable(resource.to_string()));
        }
        if self.flags.use_mock {
            tracing::debug!(resource, "Substituting mock data");
            Ok(Fetched::Mock(mock()))
        } else {
            tracing::debug!(resource, "Rendering missing-data placeholder");
            Ok(Fetched::Missing)
        }
    }

    /// Handle a failure for something that cannot be mocked.
    pub fn on_failure_unmockable<T>(&self, resource: &str) -> Result<Fetched<T>, AppError> {
        if !self.flags.ignore_missing {
            return Err(AppError::ResourceUnavailable(resource.to_string()));
        }
        tracing::debug!(resource, "Rendering missing-data placeholder");
        Ok(Fetched::Missing)
    }

    /// Apply the policy to an optional field value.
    pub fn field<T>(
        &self,
        resource: &str,
        value: Option<T>,
        mock: impl FnOnce() -> T,
    ) -> Result<Fetched<T>, AppError> {
        match value {
            Some(v) => Ok(Fetched::Live(v)),
            None => self.on_failure(resource, mock),
        }
    }
}

/// Fetches resources for one authenticated session.
pub struct ResourceFetcher<'a> {
    client: &'a StravaClient,
    access_token: &'a str,
    policy: FallbackPolicy,
}

impl<'a> ResourceFetcher<'a> {
    pub fn new(client: &'a StravaClient, access_token: &'a str, flags: DisplayFlags) -> Self {
        Self {
            client,
            access_token,
            policy: FallbackPolicy::new(flags),
        }
    }

    pub fn policy(&self) -> &FallbackPolicy {
        &self.policy
    }

    /// Decode a successful response or apply the unmockable policy.
    fn decode<T>(
        &self,
        resource: &str,
        response: ApiResponse,
        decode: impl FnOnce(Value) -> Option<T>,
    ) -> Result<Fetched<T>, AppError> {
        match response {
            ApiResponse::Success(body) => match decode(body) {
                Some(v) => Ok(Fetched::Live(v)),
                None => {
                    tracing::warn!(resource, "Unexpected payload shape");
                    self.policy.on_failure_unmockable(resource)
                }
            },
            ApiResponse::Failure { status } => {
                tracing::debug!(resource, status, "Resource fetch failed");
                self.policy.on_failure_unmockable(resource)
            }
        }
    }

    /// The athlete's activity listing.
    pub async fn activities(&self) -> Result<Fetched<Vec<Record>>, AppError> {
        let response = self.client.list_activities(self.access_token).await?;
        self.decode("activities", response, Record::list_from_value)
    }

    /// One activity's detail record.
    pub async fn activity(&self, activity_id: &str) -> Result<Fetched<Record>, AppError> {
        let response = self
            .client
            .get_activity(self.access_token, activity_id)
            .await?;
        self.decode("activity", response, Record::from_value)
    }

    /// The athlete profile.
    pub async fn athlete(&self) -> Result<Fetched<Record>, AppError> {
        let response = self.client.get_athlete(self.access_token).await?;
        self.decode("athlete", response, Record::from_value)
    }

    /// Aggregate totals for an athlete.
    pub async fn athlete_stats(&self, athlete_id: &str) -> Result<Fetched<Record>, AppError> {
        let response = self
            .client
            .get_athlete_stats(self.access_token, athlete_id)
            .await?;
        self.decode("athlete_stats", response, Record::from_value)
    }

    /// One activity stream. `mock` supplies the substitute series when the
    /// stream is unavailable and mock mode is on.
    pub async fn series(
        &self,
        activity_id: &str,
        key: &str,
        mock: impl FnOnce() -> MetricSeries,
    ) -> Result<Fetched<MetricSeries>, AppError> {
        let response = self
            .client
            .get_stream(self.access_token, activity_id, key)
            .await?;

        let live = match response {
            ApiResponse::Success(body) => MetricSeries::from_stream(&body, key),
            ApiResponse::Failure { status } => {
                tracing::debug!(key, status, activity_id, "Stream fetch failed");
                None
            }
        };

        self.policy.field(&format!("stream:{}", key), live, mock)
    }
}
