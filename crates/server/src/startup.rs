use std::net::SocketAddr;

use axum::Router;
use common::env::ensure_media_root;
use configs::{AppConfig, ServerConfig};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c; shutdown only on process exit");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, draining connections");
}

/// Connect storage, build the router and serve `cfg` until Ctrl+C.
pub async fn serve(cfg: AppConfig) -> anyhow::Result<()> {
    ensure_media_root(&cfg.media.root).await?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        models::db::run_migrations(&db).await?;
    }

    let state = ServerState::from_db(db, &cfg.cache);
    let app: Router = routes::build_router(state, build_cors(), &cfg.media.root);

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, media_root = %cfg.media.root, "starting recipe server");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
