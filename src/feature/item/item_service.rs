//! A service for interacting with items.
//!
//! Performs no validation of its own; inputs are [`ItemInput`]s that already
//! passed validation. A miss is an explicit [`None`], never an error, while
//! store failures propagate to the caller untouched.

use crate::{
    feature::item::{
        item_repository::{self, Item},
        item_validation::ItemInput,
    },
    infra::{database::Tx, error::ApiResult},
};
use tracing::instrument;

/// Lists all items.
#[instrument(skip(tx))]
pub async fn list_items(tx: &mut Tx) -> ApiResult<Vec<Item>> {
    item_repository::list_items(tx).await
}

/// Reads an item, or [`None`] if it does not exist.
#[instrument(skip(tx))]
pub async fn read_item(tx: &mut Tx, id: i32) -> ApiResult<Option<Item>> {
    item_repository::fetch_item(tx, id).await
}

/// Creates a new item. The store assigns the id.
#[instrument(skip(tx))]
pub async fn create_item(tx: &mut Tx, input: ItemInput) -> ApiResult<Item> {
    item_repository::create_item(tx, &input).await
}

/// Updates an item and returns the refreshed row.
///
/// Confirms existence first: an absent id comes back as [`None`] without
/// attempting the mutation, so a mere miss never surfaces as a store error.
#[instrument(skip(tx))]
pub async fn update_item(tx: &mut Tx, id: i32, input: ItemInput) -> ApiResult<Option<Item>> {
    if item_repository::fetch_item(tx, id).await?.is_none() {
        return Ok(None);
    }
    item_repository::update_item(tx, id, &input).await
}

/// Deletes an item. The caller is responsible for confirming existence
/// beforehand if it wants to report a miss.
#[instrument(skip(tx))]
pub async fn delete_item(tx: &mut Tx, id: i32) -> ApiResult<()> {
    item_repository::delete_item(tx, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    fn input(name: &str, price: f64) -> ItemInput {
        ItemInput {
            name: name.to_string(),
            price,
        }
    }

    #[sqlx::test]
    async fn created_item_can_be_read_back(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let created = create_item(&mut tx, input("Widget", 10.0)).await.unwrap();
        let read = read_item(&mut tx, created.id).await.unwrap();
        assert_eq!(Some(created), read);
    }

    #[sqlx::test]
    async fn reading_a_missing_item_gives_none(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let read = read_item(&mut tx, 999).await.unwrap();
        assert_eq!(None, read);
    }

    #[sqlx::test]
    async fn updating_a_missing_item_gives_none(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let updated = update_item(&mut tx, 999, input("Widget", 10.0))
            .await
            .unwrap();
        assert_eq!(None, updated);
    }

    #[sqlx::test]
    async fn updating_an_existing_item_returns_the_refreshed_row(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let created = create_item(&mut tx, input("Widget", 10.0)).await.unwrap();
        let updated = update_item(&mut tx, created.id, input("Gadget", 5.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.id, updated.id);
        assert_eq!("Gadget", updated.name);
        assert_eq!(5.0, updated.price);
    }

    #[sqlx::test]
    async fn deleted_item_reads_as_absent(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        let created = create_item(&mut tx, input("Widget", 10.0)).await.unwrap();
        delete_item(&mut tx, created.id).await.unwrap();
        assert_eq!(None, read_item(&mut tx, created.id).await.unwrap());
        // A second read still reports absence.
        assert_eq!(None, read_item(&mut tx, created.id).await.unwrap());
    }

    #[sqlx::test]
    async fn listing_returns_all_items_in_id_order(db: PgPool) {
        let mut tx = db.begin().await.unwrap();
        assert!(list_items(&mut tx).await.unwrap().is_empty());
        let a = create_item(&mut tx, input("A", 1.0)).await.unwrap();
        let b = create_item(&mut tx, input("B", 2.0)).await.unwrap();
        assert_eq!(vec![a, b], list_items(&mut tx).await.unwrap());
    }
}
