use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use kudos::config::AppConfig;
use kudos::error::AppError;
use kudos::leaderboard::LeaderboardService;
use kudos::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{
    seed_sample_data, AppState, InMemoryAchievementStore, InMemoryUserDirectory,
    LoggingAnnouncementPublisher,
};
use crate::routes::with_leaderboard_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryAchievementStore::default());
    let directory = Arc::new(InMemoryUserDirectory::default());
    let publisher = Arc::new(LoggingAnnouncementPublisher::default());
    if !args.no_seed {
        seed_sample_data(&store, &directory, Utc::now());
    }
    let service = Arc::new(LeaderboardService::new(
        store,
        directory,
        publisher,
        config.scoring.clone(),
    ));

    let app = with_leaderboard_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "recognition leaderboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}
