//! ScholarFlow API Gateway
//!
//! The entry point for all external API requests. Handles:
//! - Actor resolution and authorization
//! - Rate limiting
//! - Request routing into the workflow core
//! - Observability (logging, metrics, tracing)

mod handlers;
mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use scholarflow_common::{
    config::AppConfig,
    db::DbPool,
    metrics,
    notify::Notifier,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub notifier: Notifier,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.observability.log_level.clone().into()),
        )
        .with_target(true);
    if config.observability.json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("Starting ScholarFlow API Gateway v{}", scholarflow_common::VERSION);

    let config = Arc::new(config);

    // Initialize metrics
    metrics::register_metrics();
    if config.observability.metrics_port != 0 {
        let metrics_addr =
            SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()?;
        info!("Prometheus exporter listening on {}", metrics_addr);
    }

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;

    // Mail sink (best-effort; disabled when no webhook is configured)
    let notifier = Notifier::from_config(&config.mail)?;

    // Create app state
    let state = AppState {
        config: config.clone(),
        db,
        notifier,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Global rate limiter
    let limiter = middleware::rate_limit::create_rate_limiter(
        state.config.rate_limit.requests_per_second,
        state.config.rate_limit.burst,
    );

    // API routes
    let mut api_routes = Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        // Manuscript endpoints
        .route("/manuscripts", post(handlers::manuscripts::submit_manuscript))
        .route("/manuscripts", get(handlers::manuscripts::list_manuscripts))
        .route("/manuscripts/{id}", get(handlers::manuscripts::get_manuscript))
        .route("/manuscripts/{id}/decision", post(handlers::manuscripts::make_decision))
        .route("/manuscripts/{id}/payment", post(handlers::manuscripts::mark_as_paid))
        // Review endpoints
        .route("/manuscripts/{id}/reviewers", post(handlers::reviews::assign_reviewer))
        .route("/manuscripts/{id}/review", post(handlers::reviews::submit_review))
        .route("/manuscripts/{id}/reviews", get(handlers::reviews::list_reviews))
        // Publication endpoints
        .route("/volumes", post(handlers::publication::create_volume))
        .route("/issues", post(handlers::publication::create_issue))
        .route("/issues", get(handlers::publication::list_issues))
        .route("/issues/{id}", get(handlers::publication::get_issue))
        .route("/manuscripts/{id}/publish", post(handlers::publication::publish_article))
        .route("/articles/{id}", get(handlers::publication::get_article))
        // Notification endpoints
        .route("/notifications", get(handlers::notifications::list_notifications))
        .route("/notifications/{id}/read", post(handlers::notifications::mark_read));

    if state.config.rate_limit.enabled {
        api_routes = api_routes.layer(axum::middleware::from_fn(move |req, next| {
            let limiter = limiter.clone();
            async move { middleware::rate_limit::rate_limit_middleware(req, next, limiter).await }
        }));
    }

    // Compose the app
    Router::new()
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
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
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
