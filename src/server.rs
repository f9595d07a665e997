//! Router assembly and server lifecycle.

use crate::feature::{info::info_api, item::item_api};
use crate::infra::database::DbPool;
use crate::infra::error::{InternalError, PanicHandler};
use crate::infra::extract::Json;
use crate::infra::middleware::MakeRequestIdSpan;
use crate::infra::openapi::ApiDoc;
use crate::infra::state::AppState;
use axum::error_handling::HandleErrorLayer;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use http::header::AUTHORIZATION;
use std::iter::once;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;

/// Serves the OpenAPI document.
async fn serve_api() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Constructs the full axum application including middleware.
pub fn app(state: AppState) -> Router {
    // Fallible middleware from tower, mapped to infallible responses with [`HandleErrorLayer`].
    let tower_middleware = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|e| async move {
            InternalError::Other(format!("Tower middleware failed: {e}")).into_response()
        }))
        .concurrency_limit(100);

    Router::new()
        .route("/api.json", get(serve_api))
        .merge(info_api::routes())
        .merge(item_api::routes())
        .with_state(state)
        // Layers
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(MakeRequestIdSpan)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(()),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(SetSensitiveRequestHeadersLayer::new(once(AUTHORIZATION)))
        .layer(tower_middleware)
        .layer(CatchPanicLayer::custom(PanicHandler))
}

/// Runs migrations and serves the application until ctrl-c.
pub async fn run_app(listener: TcpListener, db: DbPool) -> anyhow::Result<()> {
    sqlx::migrate!().run(&db).await?;
    let state = AppState::new(db);
    let app = app(state);
    tracing::info!("Starting axum on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await?;
    Ok(())
}

/// Completes when ctrl-c is pressed.
async fn shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to fetch ctrl_c: {}", e);
    }
    tracing::info!("Shutting down");
}

/// Spawn a server on a random port with a custom database.
pub async fn spawn_app_with_db(db: DbPool) -> String {
    let address = "127.0.0.1";
    let listener = TcpListener::bind(format!("{address}:0")).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(run_app(listener, db));
    format!("http://{address}:{port}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{info::info_api::Ping, item::item_repository::Item};
    use crate::infra::error::{ErrorBody, ValidationError, ValidationErrorBody};
    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    fn test_app(db: DbPool) -> Router {
        app(AppState::new(db))
    }

    fn client() -> reqwest::Client {
        reqwest::ClientBuilder::default().build().unwrap()
    }

    #[sqlx::test]
    async fn ping_gives_ok(db: DbPool) {
        let url = spawn_app_with_db(db).await;
        let response = reqwest::get(format!("{url}/ping")).await.unwrap();
        assert_eq!(200, response.status());
        assert_eq!(Ping { ok: true }, response.json::<Ping>().await.unwrap());
    }

    #[sqlx::test]
    async fn create_item_returns_created_item(db: DbPool) {
        let url = spawn_app_with_db(db).await;
        let response = client()
            .post(format!("{url}/items"))
            .json(&json!({"name": "Widget", "price": 10}))
            .send()
            .await
            .unwrap();
        assert_eq!(201, response.status());
        let item: Item = response.json().await.unwrap();
        let expected = Item {
            id: 1,
            name: "Widget".to_string(),
            price: 10.0,
        };
        assert_eq!(expected, item);
    }

    #[sqlx::test]
    async fn created_item_can_be_fetched(db: DbPool) {
        let url = spawn_app_with_db(db).await;
        let created: Item = client()
            .post(format!("{url}/items"))
            .json(&json!({"name": "Widget", "price": 10}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let response = reqwest::get(format!("{url}/items/{}", created.id))
            .await
            .unwrap();
        assert_eq!(200, response.status());
        assert_eq!(created, response.json::<Item>().await.unwrap());
    }

    #[sqlx::test]
    async fn missing_price_gives_400(db: DbPool) {
        let url = spawn_app_with_db(db).await;
        let response = client()
            .post(format!("{url}/items"))
            .json(&json!({"name": "Bad"}))
            .send()
            .await
            .unwrap();
        assert_eq!(400, response.status());
        let body: ValidationErrorBody = response.json().await.unwrap();
        assert_eq!(
            ValidationErrorBody {
                errors: vec![ValidationError::required("price")],
            },
            body
        );
    }

    #[sqlx::test]
    async fn negative_price_gives_400(db: DbPool) {
        let url = spawn_app_with_db(db).await;
        let response = client()
            .post(format!("{url}/items"))
            .json(&json!({"name": "X", "price": -5}))
            .send()
            .await
            .unwrap();
        assert_eq!(400, response.status());
        let body: ValidationErrorBody = response.json().await.unwrap();
        assert_eq!(
            "Field \"price\" cannot be negative",
            body.errors[0].message
        );
    }

    #[sqlx::test]
    async fn update_of_missing_item_gives_404_with_empty_body(db: DbPool) {
        let url = spawn_app_with_db(db).await;
        let response = client()
            .put(format!("{url}/items/999"))
            .json(&json!({"name": "Widget", "price": 10}))
            .send()
            .await
            .unwrap();
        assert_eq!(404, response.status());
        assert_eq!("", response.text().await.unwrap());
    }

    #[sqlx::test]
    async fn update_changes_the_stored_item(db: DbPool) {
        let url = spawn_app_with_db(db).await;
        let created: Item = client()
            .post(format!("{url}/items"))
            .json(&json!({"name": "Widget", "price": 10}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let response = client()
            .put(format!("{url}/items/{}", created.id))
            .json(&json!({"name": "Gadget", "price": 0}))
            .send()
            .await
            .unwrap();
        assert_eq!(200, response.status());
        let updated: Item = response.json().await.unwrap();
        let expected = Item {
            id: created.id,
            name: "Gadget".to_string(),
            price: 0.0,
        };
        assert_eq!(expected, updated);
        let fetched: Item = reqwest::get(format!("{url}/items/{}", created.id))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(expected, fetched);
    }

    #[sqlx::test]
    async fn update_with_invalid_payload_gives_400(db: DbPool) {
        let url = spawn_app_with_db(db).await;
        let response = client()
            .put(format!("{url}/items/1"))
            .json(&json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(400, response.status());
        let body: ValidationErrorBody = response.json().await.unwrap();
        assert_eq!(
            ValidationErrorBody {
                errors: vec![
                    ValidationError::required("name"),
                    ValidationError::required("price"),
                ],
            },
            body
        );
    }

    #[sqlx::test]
    async fn delete_then_get_gives_404(db: DbPool) {
        let url = spawn_app_with_db(db).await;
        let created: Item = client()
            .post(format!("{url}/items"))
            .json(&json!({"name": "Widget", "price": 10}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let response = client()
            .delete(format!("{url}/items/{}", created.id))
            .send()
            .await
            .unwrap();
        assert_eq!(204, response.status());
        assert_eq!("", response.text().await.unwrap());

        let response = reqwest::get(format!("{url}/items/{}", created.id))
            .await
            .unwrap();
        assert_eq!(404, response.status());
        assert_eq!("", response.text().await.unwrap());

        // Deleting again reports the miss instead of silently succeeding.
        let response = client()
            .delete(format!("{url}/items/{}", created.id))
            .send()
            .await
            .unwrap();
        assert_eq!(404, response.status());
    }

    #[sqlx::test]
    async fn get_missing_item_gives_404_with_empty_body(db: DbPool) {
        let url = spawn_app_with_db(db).await;
        let response = reqwest::get(format!("{url}/items/999")).await.unwrap();
        assert_eq!(404, response.status());
        assert_eq!("", response.text().await.unwrap());
    }

    #[sqlx::test]
    async fn non_numeric_id_gives_400(db: DbPool) {
        let url = spawn_app_with_db(db).await;
        let response = reqwest::get(format!("{url}/items/abc")).await.unwrap();
        assert_eq!(400, response.status());
    }

    #[sqlx::test]
    async fn list_items_oneshot(db: DbPool) {
        let app = test_app(db);
        let req = Request::get("/items").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(StatusCode::OK, res.status());
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let items: Vec<Item> = serde_json::from_slice(&body).unwrap();
        assert!(items.is_empty());
    }

    #[sqlx::test]
    async fn store_failure_gives_500(db: DbPool) {
        let app = test_app(db.clone());
        db.close().await;
        let req = Request::get("/items").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!("Internal Server Error", body.error());
    }

    #[sqlx::test]
    async fn openapi_document_is_served(db: DbPool) {
        let app = test_app(db);
        let req = Request::get("/api.json").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(StatusCode::OK, res.status());
    }
}
