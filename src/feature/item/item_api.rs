//! The item API implementation.
//!
//! Maps routes onto validation and the item service, and outcomes onto
//! (status, body) pairs.

use crate::{
    feature::item::{item_repository::Item, item_service, item_validation::ItemPayload},
    infra::{
        database::DbPool,
        error::{ApiResult, ClientError, ErrorBody, ValidationErrorBody},
        extract::Json,
        state::AppState,
    },
};
use axum::{extract::State, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use http::StatusCode;
use serde::Deserialize;
use tracing::instrument;

/// The item API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .typed_get(list_items)
        .typed_post(create_item)
        .typed_get(get_item)
        .typed_put(update_item)
        .typed_delete(delete_item)
}

#[derive(Deserialize, TypedPath)]
#[typed_path("/items", rejection(ClientError))]
pub struct Items;

#[derive(Deserialize, TypedPath)]
#[typed_path("/items/:id", rejection(ClientError))]
pub struct ItemsId(pub i32);

/// Lists all items.
#[utoipa::path(
    get,
    path = "/items",
    responses(
        (status = 200, description = "Success", body = [Item]),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all)]
pub async fn list_items(_: Items, State(db): State<DbPool>) -> ApiResult<Json<Vec<Item>>> {
    let mut tx = db.begin().await?;
    let items = item_service::list_items(&mut tx).await?;
    tx.commit().await?;
    Ok(Json(items))
}

/// Gets an item.
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(("id" = i32, Path, description = "The item id")),
    responses(
        (status = 200, description = "Ok", body = Item),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip(db))]
pub async fn get_item(ItemsId(id): ItemsId, State(db): State<DbPool>) -> ApiResult<Json<Item>> {
    let mut tx = db.begin().await?;
    let item = item_service::read_item(&mut tx, id)
        .await?
        .ok_or(ClientError::NotFound)?;
    tx.commit().await?;
    Ok(Json(item))
}

/// Creates a new item.
#[utoipa::path(
    post,
    path = "/items",
    request_body = ItemPayload,
    responses(
        (status = 201, description = "Created", body = Item),
        (status = 400, description = "Bad Request", body = ValidationErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all)]
pub async fn create_item(
    _: Items,
    State(db): State<DbPool>,
    Json(payload): Json<ItemPayload>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let input = payload.validate().map_err(ClientError::Validation)?;
    let mut tx = db.begin().await?;
    let item = item_service::create_item(&mut tx, input).await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Updates an item.
#[utoipa::path(
    put,
    path = "/items/{id}",
    params(("id" = i32, Path, description = "The item id")),
    request_body = ItemPayload,
    responses(
        (status = 200, description = "Ok", body = Item),
        (status = 400, description = "Bad Request", body = ValidationErrorBody),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip(db, payload))]
pub async fn update_item(
    ItemsId(id): ItemsId,
    State(db): State<DbPool>,
    Json(payload): Json<ItemPayload>,
) -> ApiResult<Json<Item>> {
    let input = payload.validate().map_err(ClientError::Validation)?;
    let mut tx = db.begin().await?;
    let item = item_service::update_item(&mut tx, id, input)
        .await?
        .ok_or(ClientError::NotFound)?;
    tx.commit().await?;
    Ok(Json(item))
}

/// Deletes an item.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(("id" = i32, Path, description = "The item id")),
    responses(
        (status = 204, description = "No Content"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip(db))]
pub async fn delete_item(ItemsId(id): ItemsId, State(db): State<DbPool>) -> ApiResult<StatusCode> {
    let mut tx = db.begin().await?;
    // Check-then-delete; per-row atomicity of the delete itself is enough.
    item_service::read_item(&mut tx, id)
        .await?
        .ok_or(ClientError::NotFound)?;
    item_service::delete_item(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
