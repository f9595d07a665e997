//! A CRUD web service for items, built with axum and sqlx.
//!
//! # Examples
//!
//! Ping the service.
//!
//! ```no_run
//! # tokio_test::block_on(async {
//! # let config = item_api::infra::config::load_config().unwrap();
//! # let db = item_api::infra::database::init_db(&config.database);
//! let url = item_api::server::spawn_app_with_db(db).await;
//! let response = reqwest::get(format!("{url}/ping")).await.unwrap();
//! assert_eq!(200, response.status());
//! # });
//! ```

pub mod feature;
pub mod infra;
pub mod server;
