use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::address_book::repo::seaorm::SeaOrmAddressBookRepository;
use service::geocoder::AmapGeocoder;
use service::AddressBookService;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &configs::ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address {}:{}: {e}", cfg.host, cfg.port)))
}

/// Build the app from an already loaded config and run the HTTP server.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = bind_addr(&cfg.server)?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::ping(&db).await?;
    if std::env::var("RUN_MIGRATIONS").is_ok_and(|v| v == "1" || v == "true") {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    if cfg.geocoder.key.is_empty() {
        tracing::warn!("geocoder.key is empty; AMap will reject lookups");
    }
    let geocoder = AmapGeocoder::from_config(&cfg.geocoder).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let repo = SeaOrmAddressBookRepository::new(db);
    let state = AppState {
        address_book: AddressBookService::new(Arc::new(repo), Arc::new(geocoder)),
    };

    let app: Router = routes::build_router(state, build_cors());

    info!(%addr, "starting address book server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
