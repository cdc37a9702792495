use crate::bot::BotState;
use crate::config::Config;
use crate::impls::YtDlpFetcher;
use crate::services::{AccessGate, SftpClient, TaskDispatcher};
use actix_rt::signal::unix;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use futures_lite::FutureExt;
use media_providers::YtDlpClient;
use request_processors::{Fetcher, Publisher, SearchService, TrackPipeline};
use std::sync::Arc;
use tracing::{error, info};

mod bot;
mod config;
mod http;
mod impls;
mod services;
mod types;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let mut terminate = unix::signal(unix::SignalKind::terminate())?;
    let mut interrupt = unix::signal(unix::SignalKind::interrupt())?;

    dotenv::dotenv().ok();
    env_logger::init();

    let config = Arc::from(Config::from_env());

    info!(version = VERSION, "Starting application...");

    let fetcher: Arc<dyn Fetcher> = Arc::new(YtDlpFetcher(YtDlpClient::create(
        config.yt_dlp_path.clone(),
        config.proxy_url.clone(),
    )));
    let publisher: Arc<dyn Publisher> =
        Arc::new(SftpClient::create(&config.sftp, config.ftp_port));

    let track_pipeline = TrackPipeline::new(
        Arc::clone(&fetcher),
        publisher,
        config.download_directory.clone(),
    );
    let search_service = SearchService::new(fetcher);
    let task_dispatcher = Arc::new(TaskDispatcher::new(
        Arc::new(track_pipeline),
        Arc::new(search_service),
    ));

    let bot_state = Arc::new(BotState {
        access_gate: AccessGate::new(config.allowed_user_id.clone()),
        dispatcher: Arc::clone(&task_dispatcher),
    });

    let telegram_bot = bot::create_bot(&config.bot_token).map_err(std::io::Error::other)?;
    bot::register_commands(&telegram_bot).await;

    let mut bot_dispatcher = bot::build_dispatcher(telegram_bot, bot_state);
    let bot_shutdown_token = bot_dispatcher.shutdown_token();

    actix_rt::spawn(async move {
        bot_dispatcher.dispatch().await;
    });

    let shutdown_timeout = config.shutdown_timeout;
    let bind_address = config.bind_address.clone();

    let server = HttpServer::new({
        move || {
            App::new()
                .app_data(Data::new(Arc::clone(&task_dispatcher)))
                .service(web::resource("/health").route(web::get().to(http::readiness_check)))
        }
    })
    .shutdown_timeout(shutdown_timeout)
    .bind(bind_address)?
    .run();

    let server_handle = server.handle();

    actix_rt::spawn({
        async move {
            if let Err(error) = server.await {
                error!(?error, "Error on http server");
            }
        }
    });

    info!("Application started");

    interrupt.recv().or(terminate.recv()).await;

    info!("Received shutdown signal. Shutting down gracefully...");

    match bot_shutdown_token.shutdown() {
        Ok(stopped) => stopped.await,
        Err(error) => error!(?error, "Bot dispatcher was not running"),
    }

    server_handle.stop(true).await;

    Ok(())
}
