// ── Environmental data points ──
//
// Rows of the "latest" view: one value per (environment, variable),
// including the recipe start/end markers the device writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, IntoStaticStr};
use tracing::warn;

/// What a data point measures.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Variable {
    AirTemperature,
    WaterTemperature,
    RecipeStart,
    RecipeEnd,
    /// Any variable the dashboard does not display, or none at all.
    #[default]
    #[serde(other)]
    Other,
}

/// A single reading or marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub variable: Variable,

    #[serde(default)]
    pub value: Value,

    /// Seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,

    /// `true` for set points, `false` for measurements.
    #[serde(default)]
    pub is_desired: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl DataPoint {
    pub fn new(variable: Variable, value: impl Into<Value>) -> Self {
        Self {
            id: None,
            variable,
            value: value.into(),
            timestamp: None,
            is_desired: false,
            environment: None,
        }
    }

    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn desired(mut self) -> Self {
        self.is_desired = true;
        self
    }

    /// Numeric value; numeric strings (as some firmware emits) are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match &self.value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// String value, e.g. the recipe id carried by a `recipe_start` marker.
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        let ts = self.timestamp?;
        if !ts.is_finite() {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let millis = (ts * 1000.0).round() as i64;
        DateTime::from_timestamp_millis(millis)
    }

    /// `true` if `self` is strictly more recent than `other`. Points without a
    /// timestamp are older than any point with one.
    fn is_newer_than(&self, other: &Self) -> bool {
        match (self.timestamp, other.timestamp) {
            (Some(a), Some(b)) => a > b,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// Decoded `{"rows": [{"value": ...}]}` view result, in upstream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub rows: Vec<DataPoint>,
}

impl RecordSet {
    pub fn new(rows: Vec<DataPoint>) -> Self {
        Self { rows }
    }
}

/// Rows that do not decode as data points are skipped, so one malformed
/// document cannot hide every other reading.
impl From<grove_api::ViewResponse<Value>> for RecordSet {
    fn from(view: grove_api::ViewResponse<Value>) -> Self {
        let rows = view
            .rows
            .into_iter()
            .filter_map(|row| {
                serde_json::from_value(row.value)
                    .inspect_err(|error| warn!(id = ?row.id, %error, "skipping unreadable view row"))
                    .ok()
            })
            .collect();
        Self { rows }
    }
}

/// Most recent point for `variable` among measurements (`is_desired ==
/// false`) or set points (`is_desired == true`).
///
/// Compares timestamps; on a tie, or when no point carries a timestamp,
/// the first matching row wins.
pub fn read_most_recent(
    rows: &[DataPoint],
    variable: Variable,
    is_desired: bool,
) -> Option<&DataPoint> {
    rows.iter()
        .filter(|p| p.variable == variable && p.is_desired == is_desired)
        .fold(None, |best, p| match best {
            Some(b) if !p.is_newer_than(b) => Some(b),
            _ => Some(p),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_variable_deserializes_as_other() {
        let p: DataPoint =
            serde_json::from_value(json!({ "variable": "light_illuminance", "value": 300 }))
                .unwrap();
        assert_eq!(p.variable, Variable::Other);
    }

    #[test]
    fn missing_variable_deserializes_as_other() {
        let p: DataPoint = serde_json::from_value(json!({ "value": 300 })).unwrap();
        assert_eq!(p.variable, Variable::Other);
    }

    #[test]
    fn view_conversion_skips_malformed_rows() {
        let view: grove_api::ViewResponse<Value> = serde_json::from_value(json!({
            "rows": [
                { "id": "p1", "value": { "variable": "air_temperature", "value": 22.5 } },
                { "id": "p2", "value": { "variable": "air_temperature", "timestamp": "soon" } },
                { "id": "p3", "value": "not an object" },
                { "id": "p4", "value": { "variable": "water_temperature", "value": 18.0 } }
            ]
        }))
        .unwrap();
        let set = RecordSet::from(view);
        let vars: Vec<_> = set.rows.iter().map(|p| p.variable).collect();
        assert_eq!(vars, [Variable::AirTemperature, Variable::WaterTemperature]);
    }

    #[test]
    fn variable_display_is_snake_case() {
        assert_eq!(Variable::AirTemperature.to_string(), "air_temperature");
    }

    #[test]
    fn numeric_strings_are_parsed() {
        assert_eq!(DataPoint::new(Variable::AirTemperature, "21.5").as_f64(), Some(21.5));
        assert_eq!(DataPoint::new(Variable::AirTemperature, json!(null)).as_f64(), None);
    }

    #[test]
    fn most_recent_prefers_latest_timestamp() {
        let rows = vec![
            DataPoint::new(Variable::AirTemperature, 20.0).at(100.0),
            DataPoint::new(Variable::AirTemperature, 23.0).at(300.0),
            DataPoint::new(Variable::AirTemperature, 21.0).at(200.0),
        ];
        let p = read_most_recent(&rows, Variable::AirTemperature, false).unwrap();
        assert_eq!(p.as_f64(), Some(23.0));
    }

    #[test]
    fn most_recent_falls_back_to_first_row_without_timestamps() {
        let rows = vec![
            DataPoint::new(Variable::WaterTemperature, 18.0),
            DataPoint::new(Variable::WaterTemperature, 19.0),
        ];
        let p = read_most_recent(&rows, Variable::WaterTemperature, false).unwrap();
        assert_eq!(p.as_f64(), Some(18.0));
    }

    #[test]
    fn timestamped_rows_beat_untimed_rows() {
        let rows = vec![
            DataPoint::new(Variable::AirTemperature, 18.0),
            DataPoint::new(Variable::AirTemperature, 19.0).at(1.0),
        ];
        let p = read_most_recent(&rows, Variable::AirTemperature, false).unwrap();
        assert_eq!(p.as_f64(), Some(19.0));
    }

    #[test]
    fn most_recent_separates_set_points() {
        let rows = vec![
            DataPoint::new(Variable::AirTemperature, 24.0).at(500.0).desired(),
            DataPoint::new(Variable::AirTemperature, 22.0).at(400.0),
        ];
        let measured = read_most_recent(&rows, Variable::AirTemperature, false).unwrap();
        let desired = read_most_recent(&rows, Variable::AirTemperature, true).unwrap();
        assert_eq!(measured.as_f64(), Some(22.0));
        assert_eq!(desired.as_f64(), Some(24.0));
        assert!(read_most_recent(&rows, Variable::RecipeStart, false).is_none());
    }

    #[test]
    fn observed_at_ignores_missing_or_non_finite_timestamps() {
        assert!(DataPoint::new(Variable::AirTemperature, 1).observed_at().is_none());
        let p = DataPoint::new(Variable::AirTemperature, 1).at(f64::NAN);
        assert!(p.observed_at().is_none());
    }

    #[test]
    fn observed_at_converts_epoch_seconds() {
        let p = DataPoint::new(Variable::AirTemperature, 1).at(1_465_000_000.5);
        assert_eq!(p.observed_at().unwrap().timestamp_millis(), 1_465_000_000_500);
    }
}
