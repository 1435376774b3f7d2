use clap::Parser;
use memora::config::{get_config, CliArgs};
use memora::{create_app, db, run_migrations, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables before anything reads them
    if std::fs::metadata(".env").is_ok() {
        dotenv::dotenv().ok();
    }

    // Human-readable logs on stdout, JSON logs in a daily-rotated file
    std::fs::create_dir_all("logs").ok();
    let file_appender = tracing_appender::rolling::daily("logs", "memora.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(file_writer),
        )
        .init();

    let args = CliArgs::parse();
    let config = get_config(args);
    let port = config.port;

    // Initialize the database pool and bring the schema up to date
    let pool = db::init_pool(&config.database_url);
    {
        let mut conn = pool.get().expect("Failed to get database connection");
        run_migrations(&mut conn);
    }

    let state = Arc::new(AppState::new(pool, config));

    // CORS policy is deployment configuration; the permissive layer keeps
    // local frontends working out of the box
    let app = create_app(state).layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app)
        .await
        .expect("Server exited with an error");
}
