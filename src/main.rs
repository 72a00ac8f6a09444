use mimalloc::MiMalloc;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use trackani::config::Config;
use trackani::identity::SessionVerifier;
use trackani::server::router::{TrackaniState, trackani_router};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        cors_origins = ?cfg.basic.cors_origins,
        "Basic config loaded"
    );
    info!(
        verify_url = %cfg.identity.verify_url,
        proxy = %cfg.identity.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        timeout_secs = cfg.identity.timeout_secs,
        retry_max_times = cfg.identity.retry_max_times,
        cache_ttl_secs = cfg.identity.cache_ttl_secs,
        "Identity config loaded"
    );

    let db = trackani::db::spawn(&cfg.basic.database_url).await?;
    let identity = SessionVerifier::new(&cfg.identity)?;

    let state = TrackaniState::new(db, Arc::new(identity));
    let app = trackani_router(state, &cfg.basic.cors_origins);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
