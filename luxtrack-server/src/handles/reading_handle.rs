use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use luxtrack_api::*;

use crate::errors::{ApiError, ReadingError};
use crate::services::{CollectionWorker, QueryService, StatisticsService};

#[derive(Clone)]
pub struct ReadingState {
    pub query_service: Arc<QueryService>,
    pub statistics_service: Arc<StatisticsService>,
    pub collection_worker: Arc<CollectionWorker>,
}

pub fn reading_router(reading_state: ReadingState) -> Router {
    Router::new()
        .route("/api/light-sensor/latest", get(get_latest_reading))
        .route("/api/light-sensor/query", post(query_readings))
        .route("/api/light-sensor/recent", get(get_recent_readings))
        .route("/api/light-sensor/statistics", get(get_statistics))
        .route("/api/light-sensor/collect", post(collect_reading))
        .with_state(reading_state)
}

fn invalid_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ReadingError> {
    query
        .map(|Query(query)| query)
        .map_err(|e| ReadingError::InvalidRequest(e.body_text()))
}

#[utoipa::path(
    get,
    path = "/api/light-sensor/latest",
    tag = "light-sensor",
    params(
        ("deviceId" = Option<i32>, Query, description = "Device ID"),
        ("deviceCode" = Option<String>, Query, description = "Device code, used when no ID is given"),
        ("tenantId" = Option<i32>, Query, description = "Tenant ID, 0 when absent")
    ),
    responses(
        (status = 200, description = "Most recent reading", body = ReadingResponse),
        (status = 400, description = "Neither deviceId nor deviceCode given"),
        (status = 404, description = "Device or reading not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_latest_reading(
    State(state): State<ReadingState>,
    query: Result<Query<LatestQuery>, QueryRejection>,
) -> Result<Json<ReadingResponse>, ApiError> {
    let query = invalid_query(query)?;

    let reading = state
        .query_service
        .latest_for(
            query.device_id,
            query.device_code.as_deref(),
            query.tenant_id.unwrap_or(DEFAULT_TENANT_ID),
        )
        .await?;

    Ok(Json(reading))
}

#[utoipa::path(
    post,
    path = "/api/light-sensor/query",
    tag = "light-sensor",
    request_body = ReadingQueryRequest,
    responses(
        (status = 200, description = "One page of readings, newest first", body = Page<ReadingResponse>),
        (status = 400, description = "Invalid paging or window"),
        (status = 404, description = "Device code not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn query_readings(
    State(state): State<ReadingState>,
    body: Result<Json<ReadingQueryRequest>, JsonRejection>,
) -> Result<Json<Page<ReadingResponse>>, ApiError> {
    let Json(body) = body.map_err(|e| ReadingError::InvalidRequest(e.body_text()))?;

    let page = state.query_service.query(&body).await?;

    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/light-sensor/recent",
    tag = "light-sensor",
    params(
        ("deviceId" = i32, Query, description = "Device ID"),
        ("limit" = Option<u32>, Query, description = "Number of readings, 20 when absent")
    ),
    responses(
        (status = 200, description = "Most recent readings, newest first", body = Vec<ReadingResponse>),
        (status = 400, description = "Invalid limit"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_recent_readings(
    State(state): State<ReadingState>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<Vec<ReadingResponse>>, ApiError> {
    let query = invalid_query(query)?;

    let readings = state
        .query_service
        .recent(query.device_id, query.limit)
        .await?;

    Ok(Json(readings))
}

#[utoipa::path(
    get,
    path = "/api/light-sensor/statistics",
    tag = "light-sensor",
    params(
        ("deviceId" = i32, Query, description = "Device ID"),
        ("tenantId" = Option<i32>, Query, description = "Tenant ID, 0 when absent"),
        ("startTime" = Option<String>, Query, description = "RFC 3339 window start, 7 days ago when absent"),
        ("endTime" = Option<String>, Query, description = "RFC 3339 window end, now when absent")
    ),
    responses(
        (status = 200, description = "Window aggregates and latest reading", body = StatisticsResponse),
        (status = 400, description = "Invalid window"),
        (status = 404, description = "Device not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_statistics(
    State(state): State<ReadingState>,
    query: Result<Query<StatisticsQuery>, QueryRejection>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let query = invalid_query(query)?;

    let statistics = state.statistics_service.statistics(&query).await?;

    Ok(Json(statistics))
}

#[utoipa::path(
    post,
    path = "/api/light-sensor/collect",
    tag = "light-sensor",
    params(
        ("deviceCode" = String, Query, description = "Device code"),
        ("tenantId" = Option<i32>, Query, description = "Tenant ID, 0 when absent")
    ),
    responses(
        (status = 200, description = "Collected reading", body = ReadingResponse),
        (status = 404, description = "Device not found"),
        (status = 502, description = "Device API failed"),
        (status = 504, description = "Device API timed out"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn collect_reading(
    State(state): State<ReadingState>,
    query: Result<Query<CollectQuery>, QueryRejection>,
) -> Result<Json<ReadingResponse>, ApiError> {
    let query = invalid_query(query)?;

    let reading = state
        .collection_worker
        .manual_collect(
            &query.device_code,
            query.tenant_id.unwrap_or(DEFAULT_TENANT_ID),
        )
        .await?;

    Ok(Json(reading))
}
