use std::sync::Arc;

use anyhow::Context;

use dreammap_api::app::{AppServices, build_app};
use dreammap_auth::Hs256TokenService;
use dreammap_infra::{AppConfig, GoogleGeocoder, InMemoryStore, PostgresStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dreammap_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let store: Arc<dyn Store> = match &config.database {
        Some(db) => {
            let pool = dreammap_infra::db::connect(db)
                .await
                .context("failed to connect to database")?;
            Arc::new(PostgresStore::new(pool))
        }
        None => Arc::new(InMemoryStore::new()),
    };
    let geocoder =
        GoogleGeocoder::new(&config.geocoding).context("failed to build geocoding client")?;
    let tokens = Hs256TokenService::new(&config.jwt_secret);

    let services = AppServices::new(store.clone(), Arc::new(geocoder), Arc::new(tokens));
    let app = build_app(services);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
