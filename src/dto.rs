use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{JsonValue, Metric};

/// Data transfer object for registering a new account
#[derive(Deserialize, Debug)]
pub struct RegisterDto {
    pub email: String,
    pub password: String,
}

/// Data transfer object for logging in
#[derive(Deserialize, Debug)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

/// The identity slice of an auth response
#[derive(Serialize, Debug)]
pub struct UserSummary {
    pub id: i32,
    pub email: String,
    pub name: String,
}

/// Response for successful register/login: the identity plus a bearer token
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserSummary,
    pub token: String,
}

/// Data transfer object for creating a new flashcard set
#[derive(Deserialize, Debug)]
pub struct CreateSetDto {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A set as returned by the list endpoint, annotated with a live card count
///
/// The count is computed at read time, never persisted.
#[derive(Serialize, Debug)]
pub struct SetWithCardCount {
    pub set_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub card_count: i64,
}

/// Data transfer object for creating a new card
#[derive(Deserialize, Debug)]
pub struct CreateCardDto {
    pub front_text: String,
    pub back_text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub order_number: Option<i32>,
    #[serde(default)]
    pub position_x: Option<f64>,
    #[serde(default)]
    pub position_y: Option<f64>,
}

/// Partial update for a card
///
/// Only fields present in the request are overwritten; absent fields are
/// left untouched. Doubles as a Diesel changeset, which skips `None`.
#[derive(Deserialize, AsChangeset, Debug, Default)]
#[diesel(table_name = crate::schema::flashcards)]
#[serde(default)]
pub struct UpdateCardDto {
    pub front_text: Option<String>,
    pub back_text: Option<String>,
    pub category: Option<String>,
    pub order_number: Option<i32>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
}

impl UpdateCardDto {
    /// True when the request carries no fields at all; Diesel rejects an
    /// empty changeset, so callers short-circuit instead.
    pub fn is_empty(&self) -> bool {
        self.front_text.is_none()
            && self.back_text.is_none()
            && self.category.is_none()
            && self.order_number.is_none()
            && self.position_x.is_none()
            && self.position_y.is_none()
    }
}

/// Data transfer object for creating a link between two cards
///
/// `to_card_id` is optional at the serde layer so that its absence maps to
/// a Validation error rather than a deserialization failure.
#[derive(Deserialize, Debug)]
pub struct CreateLinkDto {
    #[serde(default)]
    pub to_card_id: Option<i32>,
    #[serde(default)]
    pub link_type: Option<String>,
}

/// Data transfer object for recording a study event
#[derive(Deserialize, Debug)]
pub struct ProgressUpdateDto {
    pub is_mastered: bool,
}

/// Mastery summary for one set, from the calling user's perspective
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ProgressSummary {
    pub mastered: i64,
    pub total: i64,
    /// floor(mastered / total * 100); 0 when the set has no cards
    pub percentage: i32,
}

/// Generic success acknowledgement for mutations with no body to return
#[derive(Serialize, Debug)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Data transfer object for ingesting a metric event
#[derive(Deserialize, Debug)]
pub struct RecordMetricDto {
    #[serde(rename = "type")]
    pub metric_type: String,
    pub data: serde_json::Value,
}

/// Acknowledgement for a stored metric
#[derive(Serialize, Debug)]
pub struct RecordMetricResponse {
    pub success: bool,
    pub metric_id: i32,
}

/// The fixed windows behind each dashboard aggregate, echoed for clients
#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPeriods {
    pub page_load: &'static str,
    pub errors: &'static str,
    pub users: &'static str,
    pub satisfaction: &'static str,
    pub latency: &'static str,
}

impl Default for DashboardPeriods {
    fn default() -> Self {
        Self {
            page_load: "7 days",
            errors: "1 hour",
            users: "7 days",
            satisfaction: "30 days",
            latency: "24 hours",
        }
    }
}

/// The aggregate dashboard snapshot
///
/// Each figure degrades to a defined default (zero, or an empty map) when
/// no events match its window.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Mean `duration` of page_load events over the last 7 days
    pub avg_page_load: f64,
    /// Raw count of error events in the last hour (a count, not a ratio)
    pub error_rate: i64,
    /// Distinct authenticated actors among user_activity events, last 7 days
    pub weekly_active_users: i64,
    /// Mean `rating` of satisfaction events over the last 30 days
    pub avg_satisfaction: f64,
    /// Mean `duration` of latency events over the last 24 hours, per action;
    /// events without an action group under the empty key
    pub avg_latency: BTreeMap<String, f64>,
    pub period: DashboardPeriods,
}

/// One event in a type-filtered history response
#[derive(Serialize, Debug)]
pub struct MetricEvent {
    pub metric_id: i32,
    pub data: JsonValue,
    pub created_at: NaiveDateTime,
}

impl From<Metric> for MetricEvent {
    fn from(metric: Metric) -> Self {
        Self {
            metric_id: metric.metric_id,
            data: metric.payload,
            created_at: metric.created_at,
        }
    }
}

/// Type-filtered event history
///
/// `count` is the true number of matching events in the window, queried
/// separately from the row fetch, so a caller can detect that `metrics`
/// was truncated at the row cap.
#[derive(Serialize, Debug)]
pub struct MetricHistory {
    #[serde(rename = "type")]
    pub metric_type: String,
    pub count: i64,
    pub period_days: i64,
    pub metrics: Vec<MetricEvent>,
}

/// Query parameters for the type-filtered history endpoint
#[derive(Deserialize, Debug)]
pub struct MetricHistoryQuery {
    #[serde(default = "default_history_days")]
    pub days: i64,
}

fn default_history_days() -> i64 {
    7
}

/// Derived uptime over the last 24 hours
#[derive(Serialize, Debug)]
pub struct UptimeStatus {
    pub uptime_percentage: f64,
    pub total_requests: i64,
    pub failed_requests: i64,
    pub period: &'static str,
}

/// The calling user's event activity over the last 7 days
#[derive(Serialize, Debug)]
pub struct UserActivity {
    pub user_id: i32,
    pub email: String,
    pub period: &'static str,
    pub total_actions: i64,
    pub actions_by_type: BTreeMap<String, i64>,
}

#[cfg(test)]
mod tests;
