//! An item CRUD web service with axum.

use item_api::{
    infra::{config, database, logging},
    server,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = logging::init_logging();
    let config = config::load_config()?;
    let db = database::init_db(&config.database);

    let listener = TcpListener::bind(format!(
        "{}:{}",
        config.server.http_address, config.server.http_port
    ))
    .await?;
    server::run_app(listener, db).await
}
