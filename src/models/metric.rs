use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use super::JsonValue;

/// An immutable usage event
///
/// Metrics are append-only: the aggregator derives every dashboard figure
/// from these rows at read time, so they are never updated or deleted.
/// `user_id` is null for anonymous events (page loads and errors recorded
/// before login must never be dropped for lack of a session).
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize)]
#[diesel(table_name = crate::schema::metrics)]
#[diesel(primary_key(metric_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Metric {
    pub metric_id: i32,

    pub user_id: Option<i32>,

    /// Free-form type tag: "page_load", "error", "latency", "satisfaction",
    /// "user_activity", ...
    #[serde(rename = "type")]
    pub metric_type: String,

    /// Opaque key-value data whose shape depends on the type
    #[serde(rename = "data")]
    pub payload: JsonValue,

    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::metrics)]
pub struct NewMetric {
    pub user_id: Option<i32>,
    pub metric_type: String,
    pub payload: JsonValue,
    pub created_at: NaiveDateTime,
}

impl NewMetric {
    pub fn new(user_id: Option<i32>, metric_type: String, payload: serde_json::Value) -> Self {
        Self {
            user_id,
            metric_type,
            payload: JsonValue(payload),
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_serializes_with_wire_names() {
        let metric = Metric {
            metric_id: 7,
            user_id: None,
            metric_type: "page_load".to_string(),
            payload: JsonValue(json!({"duration": 120})),
            created_at: Utc::now().naive_utc(),
        };
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["type"], "page_load");
        assert_eq!(json["data"]["duration"], 120);
        assert!(json["user_id"].is_null());
    }
}
