use std::collections::{BTreeMap, HashSet};

use crate::db::DbPool;
use crate::dto::{
    DashboardPeriods, DashboardStats, MetricHistory, UptimeStatus, UserActivity,
};
use crate::models::{Metric, NewMetric};
use crate::schema::metrics;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Upper bound on rows returned by a type-filtered history query. The cap
/// bounds response size; the true match count is reported separately so
/// truncation stays detectable.
const HISTORY_ROW_CAP: i64 = 1000;

/// Persists a metric event
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The acting user, or None for anonymous events (page loads
///   and errors before login must never be dropped for lack of a session)
/// * `metric_type` - Free-form type tag
/// * `payload` - Opaque JSON data; its shape depends on the type and is not
///   validated at ingestion
///
/// ### Returns
///
/// A Result containing the stored Metric (with its assigned id and
/// server-side timestamp) if successful
#[instrument(skip(pool, payload), fields(metric_type = %metric_type, anonymous = user_id.is_none()))]
pub fn record_metric(
    pool: &DbPool,
    user_id: Option<i32>,
    metric_type: &str,
    payload: serde_json::Value,
) -> Result<Metric> {
    debug!("Recording metric event");

    let conn = &mut pool.get()?;

    let new_metric = NewMetric::new(user_id, metric_type.to_string(), payload);

    let metric = diesel::insert_into(metrics::table)
        .values(&new_metric)
        .returning(Metric::as_returning())
        .get_result(conn)?;

    info!("Stored metric with id: {}", metric.metric_id);

    Ok(metric)
}

/// Computes the aggregate dashboard snapshot
///
/// Five independent aggregates, each over its own trailing window relative
/// to `now` and each tolerant of zero matching events:
///
/// - average page load duration (7 days; 0 if none)
/// - error count (1 hour; a raw count, not a ratio)
/// - weekly active users (distinct non-null actors of user_activity, 7 days)
/// - average satisfaction rating (30 days; 0 if none)
/// - average latency per action (24 hours; events without an action group
///   under the empty key rather than being dropped)
///
/// Everything is derived from the raw event log at call time; nothing is
/// maintained incrementally, so the figures cannot drift from the log.
#[instrument(skip(pool))]
pub fn dashboard_stats(pool: &DbPool, now: DateTime<Utc>) -> Result<DashboardStats> {
    debug!("Computing dashboard snapshot");

    let conn = &mut pool.get()?;

    let seven_days_ago = (now - Duration::days(7)).naive_utc();
    let one_hour_ago = (now - Duration::hours(1)).naive_utc();
    let thirty_days_ago = (now - Duration::days(30)).naive_utc();
    let one_day_ago = (now - Duration::hours(24)).naive_utc();

    // Average page load time (last 7 days)
    let page_loads = metrics::table
        .filter(metrics::metric_type.eq("page_load"))
        .filter(metrics::created_at.gt(seven_days_ago))
        .select(Metric::as_select())
        .load(conn)?;
    let durations: Vec<f64> = page_loads
        .iter()
        .map(|m| num_field(&m.payload.0, "duration"))
        .collect();
    let avg_page_load = round2(mean(&durations));

    // Error count (last hour)
    let error_rate: i64 = metrics::table
        .filter(metrics::metric_type.eq("error"))
        .filter(metrics::created_at.gt(one_hour_ago))
        .count()
        .get_result(conn)?;

    // Weekly active users: distinct non-null actors of user_activity events
    let actors: Vec<Option<i32>> = metrics::table
        .filter(metrics::metric_type.eq("user_activity"))
        .filter(metrics::created_at.gt(seven_days_ago))
        .filter(metrics::user_id.is_not_null())
        .select(metrics::user_id)
        .load(conn)?;
    let weekly_active_users = actors.into_iter().flatten().collect::<HashSet<_>>().len() as i64;

    // Average satisfaction (last 30 days)
    let satisfaction = metrics::table
        .filter(metrics::metric_type.eq("satisfaction"))
        .filter(metrics::created_at.gt(thirty_days_ago))
        .select(Metric::as_select())
        .load(conn)?;
    let ratings: Vec<f64> = satisfaction
        .iter()
        .map(|m| num_field(&m.payload.0, "rating"))
        .collect();
    let avg_satisfaction = round2(mean(&ratings));

    // Average latency by action (last 24 hours), grouped in Rust: the
    // group key is a payload field, not a column
    let latency_events = metrics::table
        .filter(metrics::metric_type.eq("latency"))
        .filter(metrics::created_at.gt(one_day_ago))
        .select(Metric::as_select())
        .load(conn)?;

    let mut latency_by_action: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for metric in &latency_events {
        let action = action_key(&metric.payload.0);
        let duration = num_field(&metric.payload.0, "duration");
        latency_by_action.entry(action).or_default().push(duration);
    }

    let avg_latency = latency_by_action
        .into_iter()
        .map(|(action, durations)| (action, round2(mean(&durations))))
        .collect();

    info!(
        "Dashboard snapshot: {} page loads, {} errors, {} active users",
        durations.len(),
        error_rate,
        weekly_active_users
    );

    Ok(DashboardStats {
        avg_page_load,
        error_rate,
        weekly_active_users,
        avg_satisfaction,
        avg_latency,
        period: DashboardPeriods::default(),
    })
}

/// Returns the newest events of one type within a trailing day window
///
/// At most 1000 rows come back, newest first. `count` carries the true
/// number of matches from a separate COUNT query, so a caller comparing it
/// against the returned length can detect truncation. A zero or negative
/// `days` yields an empty window rather than an error.
#[instrument(skip(pool), fields(metric_type = %metric_type, days = %days))]
pub fn metrics_by_type(
    pool: &DbPool,
    metric_type: &str,
    days: i64,
    now: DateTime<Utc>,
) -> Result<MetricHistory> {
    debug!("Fetching metric history");

    let conn = &mut pool.get()?;

    let cutoff = (now - Duration::days(days)).naive_utc();

    let count: i64 = metrics::table
        .filter(metrics::metric_type.eq(metric_type))
        .filter(metrics::created_at.gt(cutoff))
        .count()
        .get_result(conn)?;

    let rows = metrics::table
        .filter(metrics::metric_type.eq(metric_type))
        .filter(metrics::created_at.gt(cutoff))
        .order(metrics::created_at.desc())
        .limit(HISTORY_ROW_CAP)
        .select(Metric::as_select())
        .load(conn)?;

    info!("Matched {} events, returning {}", count, rows.len());

    Ok(MetricHistory {
        metric_type: metric_type.to_string(),
        count,
        period_days: days,
        metrics: rows.into_iter().map(Into::into).collect(),
    })
}

/// Derives the uptime percentage from the event log, over the last 24 hours
///
/// total = page_load + latency events; failed = error events;
/// 100 × (total − failed) / total. A window with no requests at all reports
/// 100.0, never a division error.
#[instrument(skip(pool))]
pub fn uptime_status(pool: &DbPool, now: DateTime<Utc>) -> Result<UptimeStatus> {
    let conn = &mut pool.get()?;

    let one_day_ago = (now - Duration::hours(24)).naive_utc();

    let total_requests: i64 = metrics::table
        .filter(metrics::metric_type.eq_any(["page_load", "latency"]))
        .filter(metrics::created_at.gt(one_day_ago))
        .count()
        .get_result(conn)?;

    let failed_requests: i64 = metrics::table
        .filter(metrics::metric_type.eq("error"))
        .filter(metrics::created_at.gt(one_day_ago))
        .count()
        .get_result(conn)?;

    let uptime_percentage = if total_requests > 0 {
        round2((total_requests - failed_requests) as f64 / total_requests as f64 * 100.0)
    } else {
        100.0
    };

    debug!(
        "Uptime: {}% ({} total, {} failed)",
        uptime_percentage, total_requests, failed_requests
    );

    Ok(UptimeStatus {
        uptime_percentage,
        total_requests,
        failed_requests,
        period: "24 hours",
    })
}

/// Summarizes one user's event activity over the last 7 days
#[instrument(skip(pool, email), fields(user_id = %user_id))]
pub fn user_activity(
    pool: &DbPool,
    user_id: i32,
    email: &str,
    now: DateTime<Utc>,
) -> Result<UserActivity> {
    let conn = &mut pool.get()?;

    let seven_days_ago = (now - Duration::days(7)).naive_utc();

    let types: Vec<String> = metrics::table
        .filter(metrics::user_id.eq(user_id))
        .filter(metrics::created_at.gt(seven_days_ago))
        .select(metrics::metric_type)
        .load(conn)?;

    let total_actions = types.len() as i64;

    let mut actions_by_type: BTreeMap<String, i64> = BTreeMap::new();
    for metric_type in types {
        *actions_by_type.entry(metric_type).or_insert(0) += 1;
    }

    Ok(UserActivity {
        user_id,
        email: email.to_string(),
        period: "7 days",
        total_actions,
        actions_by_type,
    })
}

/// Rounds to 2 decimal places, half away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean; an empty slice averages to 0 by definition here, which
/// is what lets every dashboard aggregate degrade instead of failing
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Reads a numeric payload field tolerantly: JSON numbers and numeric
/// strings count, anything else (including absence) counts as 0
fn num_field(payload: &serde_json::Value, key: &str) -> f64 {
    match payload.get(key) {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Grouping key for latency events: the `action` payload field, or the
/// empty key when it is missing or not a string. Events without an action
/// form their own group; they are never dropped.
fn action_key(payload: &serde_json::Value) -> String {
    payload
        .get("action")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}
