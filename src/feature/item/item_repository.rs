//! Types and functions for storing and loading items from the database.

use crate::{
    feature::item::item_validation::ItemInput,
    infra::{database::Tx, error::ApiResult},
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::instrument;
use utoipa::ToSchema;

/// An existing item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    /// The item's id, assigned by the store.
    pub id: i32,
    /// The item's name.
    #[schema(example = "Widget")]
    pub name: String,
    /// The item's price.
    #[schema(example = 10.0)]
    pub price: f64,
}

/// Inserts a new item and returns it with its assigned id.
#[instrument(skip(tx))]
pub async fn create_item(tx: &mut Tx, input: &ItemInput) -> ApiResult<Item> {
    let item = sqlx::query_as::<_, Item>(
        r#"
        INSERT INTO items (name, price)
        VALUES ($1, $2)
        RETURNING id, name, price
        "#,
    )
    .bind(&input.name)
    .bind(input.price)
    .fetch_one(&mut **tx)
    .await?;
    tracing::info!("Created item {:?}", item);
    Ok(item)
}

/// Fetches an item by id.
#[instrument(skip(tx))]
pub async fn fetch_item(tx: &mut Tx, id: i32) -> ApiResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(
        r#"
        SELECT id, name, price FROM items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    tracing::debug!("Found item: {:?}", item);
    Ok(item)
}

/// Lists all items.
#[instrument(skip(tx))]
pub async fn list_items(tx: &mut Tx) -> ApiResult<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(
        r#"
        SELECT id, name, price FROM items
        ORDER BY id
        "#,
    )
    .fetch_all(&mut **tx)
    .await?;
    tracing::debug!("Listed {} items", items.len());
    Ok(items)
}

/// Updates an item in place and returns the refreshed row,
/// or [`None`] if no row has the given id.
#[instrument(skip(tx))]
pub async fn update_item(tx: &mut Tx, id: i32, input: &ItemInput) -> ApiResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(
        r#"
        UPDATE items
        SET name = $2, price = $3
        WHERE id = $1
        RETURNING id, name, price
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(input.price)
    .fetch_optional(&mut **tx)
    .await?;
    tracing::info!("Updated item: {:?}", item);
    Ok(item)
}

/// Deletes an item by id.
#[instrument(skip(tx))]
pub async fn delete_item(tx: &mut Tx, id: i32) -> ApiResult<()> {
    sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    tracing::info!("Deleted item {}", id);
    Ok(())
}
