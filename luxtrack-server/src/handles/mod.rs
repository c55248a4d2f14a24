mod reading_handle;

pub use reading_handle::*;

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        reading_handle::get_latest_reading,
        reading_handle::query_readings,
        reading_handle::get_recent_readings,
        reading_handle::get_statistics,
        reading_handle::collect_reading,
    ),
    tags(
        (name = "light-sensor", description = "Light sensor readings")
    )
)]
pub struct ApiDoc;

pub fn docs_router() -> Router {
    Router::new().route(
        "/api/docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
