mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(signaldesk_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = signaldesk_db::PoolConfig {
        max_connections: config.db_max_connections,
        min_connections: config.db_min_connections,
        acquire_timeout_secs: config.db_acquire_timeout_secs,
    };
    let pool = signaldesk_db::connect_pool(&config.database_url, pool_config).await?;
    signaldesk_db::run_migrations(&pool).await?;

    let chat_client = signaldesk_ai::ChatClient::with_base_url(
        &config.ai_api_key,
        &config.ai_model,
        config.ai_timeout_secs,
        &config.ai_base_url,
    )?;
    let scanner = Arc::new(signaldesk_scan::Scanner::new(
        pool.clone(),
        chat_client,
        config.ai_temperature,
    ));

    let _scheduler =
        scheduler::build_scheduler(pool.clone(), Arc::clone(&scanner), &config.scan_cron).await?;

    let app = build_app(AppState {
        pool,
        scanner: Arc::clone(&scanner),
    });

    tracing::info!(addr = %config.bind_addr, env = %config.env, "signaldesk server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
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

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
