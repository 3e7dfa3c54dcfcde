//! Application entry point resolving the startup configuration.
use std::error::Error as _;

use dotenvy::dotenv;

use request_baskets::services::ConfigError;
use request_baskets::services::assembler::ConfigAssembler;
use request_baskets::{SERVICE_API_PATH, SERVICE_UI_PATH};

fn main() {
    // Load environment variables from `.env` in local development.
    dotenv().ok();
    // Initialize logger with default level INFO if not provided.
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ConfigAssembler::from_process().and_then(ConfigAssembler::assemble) {
        Ok(server_config) => server_config,
        // Help, version and flag syntax errors are rendered by clap itself.
        Err(ConfigError::Cli(err)) => err.exit(),
        Err(err) => {
            log::error!("Error loading server config: {}", err);
            let mut source = err.source();
            while let Some(cause) = source {
                log::error!("  caused by: {}", cause);
                source = cause.source();
            }
            std::process::exit(1);
        }
    };

    log::info!("HTTP listener: {}", server_config.listen_addr());
    log::info!("Storage: {}", server_config.storage());
    log::info!(
        "Basket capacity: initial {}, max {}; page size {}",
        server_config.init_capacity(),
        server_config.max_capacity(),
        server_config.page_size()
    );
    log::info!(
        "Mode: {}, theme: {}, API at {}, UI at {}",
        server_config.mode(),
        server_config.theme(),
        server_config.path_prefix().join(SERVICE_API_PATH),
        server_config.path_prefix().join(SERVICE_UI_PATH)
    );
    for basket in server_config.baskets() {
        log::info!("Basket to create at startup: {}", basket);
    }
}
