//! Farm2Hand seller dashboard.
//!
//! Serves the dashboard on port 3002 by default. Data is held in memory and
//! seeded at startup from `FARM2HAND_SEED_FILE` or the built-in sample farm.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for server-side rendering
//! - In-memory repositories behind `tokio::sync::RwLock`
//! - Sentry and `tracing` for errors and request logs

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use farm2hand_dashboard::config::{AppConfig, TlsConfig};
use farm2hand_dashboard::state::AppState;
use farm2hand_dashboard::store::SeedData;
use secrecy::ExposeSecret;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start Sentry when a DSN is configured. The guard flushes on drop.
fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            // Orders carry customer names and phone numbers.
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Warnings and errors become Sentry events; info and debug become
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn load_seed(config: &AppConfig) -> SeedData {
    config.seed_file.as_ref().map_or_else(SeedData::builtin, |path| {
        let seed = SeedData::load(path).unwrap_or_else(|e| panic!("Seed file rejected: {e}"));
        tracing::info!(path = %path.display(), products = seed.products.len(), "Seed file loaded");
        seed
    })
}

fn init_tracing(config: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "farm2hand_dashboard=info,tower_http=debug".into());

    let json = config
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text = (!config.log_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json)
        .with(text)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

async fn serve_tls(addr: SocketAddr, tls: &TlsConfig, app: Router) {
    let rustls_config = RustlsConfig::from_pem(
        tls.cert_pem.as_bytes().to_vec(),
        tls.key_pem.expose_secret().as_bytes().to_vec(),
    )
    .await
    .expect("TLS certificate or key is not valid PEM");

    let handle = Handle::new();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown_signal().await;
            handle.graceful_shutdown(Some(Duration::from_secs(30)));
        }
    });

    tracing::info!(%addr, "Dashboard listening (https)");
    axum_server::bind_rustls(addr, rustls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .expect("HTTPS server failed");
}

async fn serve_plain(addr: SocketAddr, app: Router) {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Could not bind listen address");

    tracing::info!(%addr, "Dashboard listening (http)");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

#[tokio::main]
async fn main() {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("rustls crypto provider already installed");

    let config = AppConfig::from_env().expect("Invalid dashboard configuration");

    // Before tracing, so the Sentry layer has a client to report to.
    let _sentry = init_sentry(&config);
    init_tracing(&config);

    let state = AppState::new(config.clone(), load_seed(&config))
        .expect("Seed data repeats an identifier");

    let app = farm2hand_dashboard::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    match &config.tls {
        Some(tls) => serve_tls(addr, tls, app).await,
        None => serve_plain(addr, app).await,
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Ctrl+C handler could not be installed");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler could not be installed")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down");
}
