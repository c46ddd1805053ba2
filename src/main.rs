use tokio::signal;

use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use user_service::app::create_app;
use user_service::config::Config;
use user_service::db::pool::create_pool;
use user_service::state::SharedAppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv().ok();

  init_tracing();

  let config = Config::from_env()?;

  let pool = create_pool(&config).await?;

  if config.run_migrations {
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied successfully");
  }

  let app_state = SharedAppState::new(pool, config.password_cost);
  let app = create_app(app_state);

  let addr = config.addr();
  let listener = tokio::net::TcpListener::bind(&addr).await?;

  tracing::info!("Server running on http://{}", addr);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("user_service=debug,tower_http=info"));
  let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

  let registry = tracing_subscriber::registry().with(filter);
  if json {
    registry.with(tracing_subscriber::fmt::layer().json()).init();
  } else {
    registry.with(tracing_subscriber::fmt::layer()).init();
  }
}

async fn shutdown_signal() {
  let ctrl_c = async {
    signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
  };

  #[cfg(unix)]
  let terminate = async {
    signal::unix::signal(signal::unix::SignalKind::terminate())
      .expect("Failed to install signal handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("Received termination signal, shutting down gracefully...");
}
