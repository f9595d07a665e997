//! APIs for getting information about the application.

use crate::infra::{extract::Json, state::AppState};
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The info API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/info", get(info))
}

/// A liveness response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ping {
    /// Whether the service is up.
    pub ok: bool,
}

/// Reports that the service is up.
#[utoipa::path(
    get,
    path = "/ping",
    responses(
        (status = 200, description = "Success", body = Ping),
    )
)]
pub async fn ping() -> Json<Ping> {
    Json(Ping { ok: true })
}

/// Application information.
#[derive(Clone, Copy, Debug, Serialize, ToSchema)]
pub struct AppInfo {
    // The application name.
    name: &'static str,
    // The application version.
    version: &'static str,
}

/// Returns application information.
#[utoipa::path(
    get,
    path = "/info",
    responses(
        (status = 200, description = "Success", body = AppInfo),
    )
)]
pub async fn info() -> Json<AppInfo> {
    Json(AppInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
