use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::dto::{
    DashboardStats, MetricHistory, MetricHistoryQuery, RecordMetricDto, RecordMetricResponse,
    UptimeStatus, UserActivity,
};
use crate::errors::ApiError;
use crate::repo;
use crate::AppState;

/// Handler for recording a metric as an authenticated user
///
/// This function handles POST requests to `/api/metrics`. The event is
/// attributed to the caller; the timestamp is assigned server-side.
#[instrument(skip(state, payload), fields(user_id = %user.user_id, metric_type = %payload.metric_type))]
pub async fn record_metric_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<RecordMetricDto>,
) -> Result<Json<RecordMetricResponse>, ApiError> {
    debug!("Recording authenticated metric");

    let metric = repo::record_metric(
        &state.pool,
        Some(user.user_id),
        &payload.metric_type,
        payload.data,
    )
    .map_err(ApiError::Database)?;

    Ok(Json(RecordMetricResponse {
        success: true,
        metric_id: metric.metric_id,
    }))
}

/// Handler for recording a metric without authentication
///
/// This function handles POST requests to `/api/metrics/public`. Page
/// loads and errors that happen before login go through here; the actor is
/// recorded as absent.
#[instrument(skip(state, payload), fields(metric_type = %payload.metric_type))]
pub async fn record_metric_public_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RecordMetricDto>,
) -> Result<Json<RecordMetricResponse>, ApiError> {
    debug!("Recording anonymous metric");

    let metric = repo::record_metric(&state.pool, None, &payload.metric_type, payload.data)
        .map_err(ApiError::Database)?;

    Ok(Json(RecordMetricResponse {
        success: true,
        metric_id: metric.metric_id,
    }))
}

/// Handler for the aggregate dashboard snapshot
///
/// This function handles GET requests to `/api/metrics/dashboard`.
#[instrument(skip(state))]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, ApiError> {
    debug!("Serving dashboard snapshot");

    let stats = repo::dashboard_stats(&state.pool, Utc::now()).map_err(ApiError::Database)?;

    Ok(Json(stats))
}

/// Handler for type-filtered metric history
///
/// This function handles GET requests to `/api/metrics/{metric_type}`,
/// with an optional `days` query parameter (default 7). At most 1000 rows
/// are returned, newest first, alongside the true match count.
#[instrument(skip(state), fields(metric_type = %metric_type, days = %query.days))]
pub async fn metrics_by_type_handler(
    State(state): State<Arc<AppState>>,
    Path(metric_type): Path<String>,
    Query(query): Query<MetricHistoryQuery>,
) -> Result<Json<MetricHistory>, ApiError> {
    debug!("Serving metric history");

    let history = repo::metrics_by_type(&state.pool, &metric_type, query.days, Utc::now())
        .map_err(ApiError::Database)?;

    info!(
        "History for '{}': {} matches, {} returned",
        metric_type,
        history.count,
        history.metrics.len()
    );

    Ok(Json(history))
}

/// Handler for the derived uptime figure
///
/// This function handles GET requests to `/api/metrics/uptime/status`.
#[instrument(skip(state))]
pub async fn uptime_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UptimeStatus>, ApiError> {
    debug!("Serving uptime status");

    let status = repo::uptime_status(&state.pool, Utc::now()).map_err(ApiError::Database)?;

    Ok(Json(status))
}

/// Handler for the caller's own activity summary
///
/// This function handles GET requests to `/api/metrics/user/activity`.
#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn user_activity_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<UserActivity>, ApiError> {
    debug!("Serving user activity summary");

    let activity = repo::user_activity(&state.pool, user.user_id, &user.email, Utc::now())
        .map_err(ApiError::Database)?;

    Ok(Json(activity))
}
