#![warn(clippy::all, clippy::pedantic)]

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use sitewatch::{Config, Registry};
use tracing::info;

mod cli;
mod error;
mod routes;

use cli::Cli;
use error::AppError;
use logger::init_tracing_with;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_config(cli.config.as_deref())?;
    config.apply_env_overrides()?;
    cli.apply(&mut config);

    if cli.print_config {
        print!("{config}");
        return Ok(());
    }

    init_tracing_with(&config.logging.level, config.logging.format.parse().ok());

    let ip: IpAddr = config.server.bind.parse()?;
    let addr = SocketAddr::new(ip, config.server.port);
    // built on the system runtime so check tasks outlive any single worker
    let registry = Arc::new(Registry::from_config(&config.monitoring)?);

    let served = run_server(addr, registry.clone()).await;
    registry.shutdown().await;
    served
}

async fn run_server(addr: SocketAddr, registry: Arc<Registry>) -> Result<(), AppError> {
    let registry = web::Data::from(registry);

    info!(%addr, "listening");
    HttpServer::new(move || App::new().app_data(registry.clone()).configure(routes::routes))
        .bind(addr)?
        .run()
        .await?;

    Ok(())
}
