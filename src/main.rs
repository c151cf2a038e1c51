mod app;
mod behavior;
mod config;
mod hit_region;
mod movement;
mod pet;
mod platform;
mod render;

use clap::Parser;

fn main() {
    env_logger::init();
    log::info!("Catnap starting up");

    let config = match config::Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            eprintln!("catnap: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = app::run(config) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
