// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava payloads as the dashboard sees them.
//!
//! Strava responses are kept as loosely-typed JSON records: the dashboard
//! only reads a handful of named fields and treats absent ones as missing
//! data rather than decode errors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An opaque JSON object returned by Strava (activity, athlete, stats).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Interpret a decoded payload as a record. Non-objects yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Interpret a decoded payload as a list of records, skipping non-objects.
    pub fn list_from_value(value: Value) -> Option<Vec<Self>> {
        match value {
            Value::Array(items) => Some(items.into_iter().filter_map(Self::from_value).collect()),
            _ => None,
        }
    }

    /// Raw field. A field present with a `null` value counts as present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Numeric field, accepting JSON numbers and booleans (as 0/1).
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Field rendered as display text.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).map(display_value)
    }

    /// Activity or athlete ID as a string (Strava IDs are integers).
    pub fn id(&self) -> Option<String> {
        match self.get("id")? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<String> {
        self.text("name")
    }

    /// Activity type (`Run`, `Ride`, ...).
    pub fn kind(&self) -> Option<String> {
        self.text("type").or_else(|| self.text("sport_type"))
    }

    /// A totals field from athlete stats: objects such as
    /// `recent_run_totals` contribute their `distance`, scalars are used as-is.
    pub fn total(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            Value::Object(inner) => inner.get("distance").and_then(Value::as_f64),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

/// Render a JSON value the way a user would expect to read it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Null => "Not set".to_string(),
        Value::Number(n) => n
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

/// Format a number without trailing noise: integers bare, others to 2 places.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// A numeric sample sequence (heart rate, time, distance, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries(pub Vec<f64>);

impl MetricSeries {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean, or `None` for an empty series.
    pub fn average(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.iter().sum::<f64>() / self.0.len() as f64)
    }

    /// Collect `field` from every record. Fails if any record lacks it.
    pub fn from_records(records: &[Record], field: &str) -> Option<Self> {
        records
            .iter()
            .map(|r| r.number(field))
            .collect::<Option<Vec<f64>>>()
            .map(Self)
    }

    /// Extract one stream from a `key_by_type=true` streams payload:
    /// `{"time": {"data": [..]}, "heartrate": {"data": [..]}}`.
    ///
    /// The list form (`[{"type": "time", "data": [..]}]`) is accepted too.
    pub fn from_stream(payload: &Value, key: &str) -> Option<Self> {
        let stream = match payload {
            Value::Object(map) => map.get(key)?,
            Value::Array(items) => items
                .iter()
                .find(|s| s.get("type").and_then(Value::as_str) == Some(key))?,
            _ => return None,
        };

        let data = stream.get("data")?.as_array()?;
        data.iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<f64>>>()
            .map(Self)
    }
}

impl From<Vec<f64>> for MetricSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_fields() {
        let record = Record::from_value(json!({
            "id": 12345678901u64,
            "name": "Morning Run",
            "type": "Run",
            "distance": 5012.5,
            "has_heartrate": true,
            "description": null
        }))
        .unwrap();

        assert_eq!(record.id().as_deref(), Some("12345678901"));
        assert_eq!(record.name().as_deref(), Some("Morning Run"));
        assert_eq!(record.kind().as_deref(), Some("Run"));
        assert_eq!(record.number("distance"), Some(5012.5));
        assert_eq!(record.text("has_heartrate").as_deref(), Some("Yes"));
        assert_eq!(record.text("description").as_deref(), Some("Not set"));
        assert_eq!(record.number("description"), None);
        assert!(record.get("calories").is_none());
    }

    #[test]
    fn test_non_object_is_not_a_record() {
        assert!(Record::from_value(json!([1, 2])).is_none());
        assert!(Record::list_from_value(json!({"message": "nope"})).is_none());
    }

    #[test]
    fn test_totals() {
        let stats = Record::from_value(json!({
            "recent_run_totals": {"count": 3, "distance": 15000.0},
            "biggest_ride_distance": 80467.2,
            "all_ride_totals": {"count": 0}
        }))
        .unwrap();

        assert_eq!(stats.total("recent_run_totals"), Some(15000.0));
        assert_eq!(stats.total("biggest_ride_distance"), Some(80467.2));
        assert_eq!(stats.total("all_ride_totals"), None);
        assert_eq!(stats.total("missing"), None);
    }

    #[test]
    fn test_series_from_records_requires_every_record() {
        let records = Record::list_from_value(json!([
            {"average_heartrate": 140.0},
            {"average_heartrate": 150.0}
        ]))
        .unwrap();
        let series = MetricSeries::from_records(&records, "average_heartrate").unwrap();
        assert_eq!(series.average(), Some(145.0));

        let sparse = Record::list_from_value(json!([
            {"average_heartrate": 140.0},
            {"name": "no hr"}
        ]))
        .unwrap();
        assert!(MetricSeries::from_records(&sparse, "average_heartrate").is_none());
    }

    #[test]
    fn test_series_from_stream_payloads() {
        let by_type = json!({"time": {"data": [0, 1, 2], "series_type": "distance"}});
        assert_eq!(
            MetricSeries::from_stream(&by_type, "time").unwrap().values(),
            &[0.0, 1.0, 2.0]
        );
        assert!(MetricSeries::from_stream(&by_type, "heartrate").is_none());

        let listed = json!([{"type": "heartrate", "data": [90, 95]}]);
        assert_eq!(
            MetricSeries::from_stream(&listed, "heartrate")
                .unwrap()
                .average(),
            Some(92.5)
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(7.4), "7.4");
        assert_eq!(format_number(2.346), "2.35");
        assert_eq!(format_number(-3.0), "-3");
        assert!(MetricSeries::default().average().is_none());
    }
}
