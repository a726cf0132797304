//! Vitrine service entry point.
//!
//! Wires the PostgreSQL and Redis adapters into the application handlers,
//! mounts the provider and admin routers, and spawns the expiration
//! sweeper alongside the HTTP server.

use std::sync::Arc;

use axum::Router;
use http::header::HeaderName;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, EnvFilter};

use vitrine::adapters::cache::RedisCacheStore;
use vitrine::adapters::http::{
    admin_router, subscription_router, AdminAppState, SubscriptionAppState,
};
use vitrine::adapters::postgres::{
    PostgresAuditLog, PostgresDecisionStore, PostgresPaymentRepository, PostgresPlanRepository,
    PostgresProviderRepository, PostgresSubscriptionReader, PostgresSubscriptionRepository,
};
use vitrine::adapters::scheduler::{ExpirySweeper, ExpirySweeperConfig};
use vitrine::application::handlers::subscription::ExpireSubscriptionsHandler;
use vitrine::config::AppConfig;
use vitrine::ports::{
    AuditLog, CacheStore, DecisionStore, PaymentRepository, PlanRepository, ProviderRepository,
    SubscriptionReader, SubscriptionRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_tokio_connection().await?;

    let subscription_repository: Arc<dyn SubscriptionRepository> =
        Arc::new(PostgresSubscriptionRepository::new(pool.clone()));
    let provider_repository: Arc<dyn ProviderRepository> =
        Arc::new(PostgresProviderRepository::new(pool.clone()));
    let payment_repository: Arc<dyn PaymentRepository> =
        Arc::new(PostgresPaymentRepository::new(pool.clone()));
    let plan_repository: Arc<dyn PlanRepository> = Arc::new(PostgresPlanRepository::new(pool.clone()));
    let subscription_reader: Arc<dyn SubscriptionReader> =
        Arc::new(PostgresSubscriptionReader::new(pool.clone()));
    let decision_store: Arc<dyn DecisionStore> = Arc::new(PostgresDecisionStore::new(pool.clone()));
    let audit_log: Arc<dyn AuditLog> = Arc::new(PostgresAuditLog::new(pool.clone()));
    let cache_store: Arc<dyn CacheStore> = Arc::new(RedisCacheStore::new(redis_conn));

    let subscription_state = SubscriptionAppState {
        subscription_repository: subscription_repository.clone(),
        provider_repository: provider_repository.clone(),
        plan_repository,
        payment_repository: payment_repository.clone(),
        subscription_reader,
        cache_store: cache_store.clone(),
        visibility_cache_ttl_secs: config.cache.visibility_ttl_secs,
    };

    let admin_state = AdminAppState {
        subscription_repository: subscription_repository.clone(),
        provider_repository: provider_repository.clone(),
        payment_repository,
        decision_store: decision_store.clone(),
        cache_store: cache_store.clone(),
        audit_log,
        pending_ttl_days: config.scheduler.pending_ttl_days,
    };

    // Expiration sweeper: shares the same ports as the HTTP side, runs
    // until the shutdown signal fires.
    let sweeper = ExpirySweeper::with_config(
        ExpireSubscriptionsHandler::new(
            subscription_repository,
            provider_repository,
            decision_store,
            cache_store,
            config.scheduler.pending_ttl_days,
        ),
        ExpirySweeperConfig::default().with_sweep_interval(config.scheduler.sweep_interval()),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper_handle = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    let request_id_header = HeaderName::from_static("x-request-id");
    let app = Router::new()
        .nest("/api", subscription_router().with_state(subscription_state))
        .nest("/api/admin", admin_router().with_state(admin_state))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    request_id_header.clone(),
                    MakeRequestUuid,
                ))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id_header))
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(std::time::Duration::from_secs(
                    config.server.request_timeout_secs,
                ))),
        );

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "Listening for incoming connections");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Server stopped, bring the sweeper down too.
    let _ = shutdown_tx.send(true);
    let _ = sweeper_handle.await;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::new(&config.server.log_level);
    if config.server.is_production() {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
    }
}
