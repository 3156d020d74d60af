//! Jobtrack application composition root
//!
//! Composes the request pipeline and all domain routers into a single
//! application, and owns process startup.

pub mod docs;
pub mod fallback;
pub mod middleware;
mod telemetry;

use std::net::SocketAddr;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    response::Html,
    routing::get,
    Router,
};
use jobtrack_auth::{require_auth, AuthBackend, AuthConfig, PasswordHasher};
use jobtrack_common::{Config, DatabaseOptions, MIGRATOR};
use jobtrack_jobs::{JobsRepositories, JobsState};
use jobtrack_users::{UsersRepositories, UsersState};
use sqlx::PgPool;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::middleware::{
    client_ip, cors_layer, rate_limit, sanitize_input, security_headers, BodyLimit,
    RateLimiter, TrustProxy,
};

pub use telemetry::init_tracing;

/// Landing page served at `/`
pub const HOME_PAGE: &str = r#"<h1>Jobs API</h1><a href="./api-docs">API Docs</a>"#;

/// Reasons the server can fail to come up
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database connection failed: {0}")]
    Database(#[source] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("application setup failed: {0}")]
    Setup(#[source] anyhow::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Create the main application router with all routes and middleware.
///
/// Stages run in this order for every request: panic recovery, tracing,
/// client address resolution, rate limiting, security headers, CORS, input
/// sanitization with the body size limit, then routing.
pub async fn create_app(config: &Config, pool: PgPool) -> anyhow::Result<Router> {
    let auth = AuthBackend::new(AuthConfig::from(config));

    let users_state = UsersState {
        repos: UsersRepositories::new(pool.clone()),
        auth: auth.clone(),
        hasher: PasswordHasher::new(),
    };
    let jobs_state = JobsState {
        repos: JobsRepositories::new(pool),
    };

    let limiter = RateLimiter::new(config.rate_limit.clone());
    limiter.spawn_cleanup();

    let openapi = docs::load_openapi()?;

    // Everything under the jobs prefix, unknown paths included, sits
    // behind authentication.
    let jobs_routes = jobtrack_jobs::routes()
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::not_found)
        .layer(from_fn_with_state(auth, require_auth))
        .with_state(jobs_state);

    let auth_routes = jobtrack_users::routes()
        .method_not_allowed_fallback(fallback::not_found)
        .with_state(users_state);

    let app = Router::new()
        .route("/", get(home))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/jobs", jobs_routes)
        .merge(docs::router(openapi))
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(fallback::handle_panic))
                .layer(TraceLayer::new_for_http())
                .layer(from_fn_with_state(
                    TrustProxy::new(config.trust_proxy_hops),
                    client_ip,
                ))
                .layer(from_fn_with_state(limiter, rate_limit))
                .layer(from_fn(security_headers))
                .layer(cors_layer(config.cors_allowed_origins.as_deref()))
                .layer(from_fn_with_state(
                    BodyLimit(config.body_limit_bytes),
                    sanitize_input,
                )),
        );

    Ok(app)
}

/// Connect, migrate, compose and serve until a shutdown signal arrives.
///
/// The listener is bound only after the database is reachable.
pub async fn start(config: Config) -> Result<(), StartupError> {
    let options = DatabaseOptions {
        max_connections: config.db_max_connections,
        acquire_timeout: config.db_connect_timeout,
    };

    let pool = jobtrack_common::connect(&config.database_url, &options)
        .await
        .map_err(StartupError::Database)?;
    info!("Database connection established");

    MIGRATOR.run(&pool).await?;
    info!("Database migrations applied");

    let app = create_app(&config, pool)
        .await
        .map_err(StartupError::Setup)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    info!("Server is listening on port {}", config.port);
    info!("API documentation available at http://{}/api-docs", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(StartupError::Serve)?;

    info!("Server shutdown complete");
    Ok(())
}

async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
