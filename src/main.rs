use log::{LevelFilter, error, info};
use std::error::Error;

mod app;
mod assets;
mod config;
mod core;
mod game;
mod highway;
mod settings;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .filter_module("highway64::highway", LevelFilter::Debug)
        .init();

    info!("application starting");

    let settings = settings::load();
    if let Err(e) = app::run(settings) {
        error!("application exited with error: {}", e);
        return Err(e);
    }

    info!("application exited gracefully");
    Ok(())
}
