use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use gamecatalog_core::db::Database;
use gamecatalog_server::{AppState, Settings, logging, routes};
use tracing::info;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::new().map_err(io::Error::other)?;
    logging::init(&settings);

    let db = Database::new(&settings.database.path).map_err(io::Error::other)?;
    db.migrate().map_err(io::Error::other)?;
    info!(path = %settings.database.path, "database ready");

    let state = web::Data::new(AppState::new(Arc::new(db)));

    let bind_address = format!("{}:{}", settings.server.bind_address, settings.server.port);
    info!("Starting HTTP server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}
