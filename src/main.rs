use actix_web::{web, App, HttpServer};

mod check;
mod config;
mod error;
mod logging;
mod playlist;
mod routes;
mod youtube;

use config::Config;
use youtube::YoutubeClient;

pub struct AppState {
    pub config: Config,
    pub youtube: YoutubeClient,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    logging::init_logger();

    let config_path = Config::path_from_env();
    check::perform_startup_checks(&config_path);

    let mut config = match Config::from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load {}: {}", config_path, e);
            std::process::exit(1);
        }
    };
    config.apply_env_overrides();
    check::check_api_key(&config);

    let youtube = YoutubeClient::new(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let host = config.server.host.clone();
    let port = config.server.port;
    log::info!("Starting YouTube playlist export on {}:{}...", host, port);

    let app_state = web::Data::new(AppState { config, youtube });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(logging::SelectiveLogger)
            .configure(routes::configure)
            .default_service(web::route().to(routes::frontend::not_found))
    })
    .bind((host.as_str(), port))?
    .run();

    log::info!("Server running at http://{}:{}/", host, port);

    server.await
}
