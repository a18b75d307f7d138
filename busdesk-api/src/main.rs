use std::net::SocketAddr;
use busdesk_api::{app, AppState};
use busdesk_core::ViewState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "busdesk_api=debug,busdesk_core=info,busdesk_store=info,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = busdesk_store::app_config::Config::load()?;
    tracing::info!("Starting busdesk API on port {}", config.server.port);

    let feed = busdesk_store::feed_from_config(&config.seed)?;
    let bookings = feed.fetch_bookings().await?;
    let view = ViewState::with_page_size(bookings, config.dashboard.page_size);

    let app = app(AppState::new(view, feed));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
