use tracing::info;

use cubby::file::BlobStore;
use cubby::{Config, Database, WebServer};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Could not read config.toml ({e}), continuing with defaults");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        return std::process::ExitCode::FAILURE;
    }

    if let Err(e) = cubby::logging::init(&config.logging) {
        eprintln!("Log file unavailable ({e}), logging to console only");
        cubby::logging::init_console_only(&config.logging.level);
    }

    info!("Cubby - personal file storage service");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database at {}: {}", config.database.path, e);
            return std::process::ExitCode::FAILURE;
        }
    };

    let blobs = match BlobStore::new(&config.storage.path) {
        Ok(blobs) => blobs,
        Err(e) => {
            tracing::error!(
                "Failed to initialize blob storage at {}: {}",
                config.storage.path,
                e
            );
            return std::process::ExitCode::FAILURE;
        }
    };
    info!("Blob storage initialized at: {}", config.storage.path);

    let server = match WebServer::new(&config, db, blobs) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to configure web server: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        "Serving on {}:{}",
        config.server.host, config.server.port
    );

    if let Err(e) = server.run().await {
        tracing::error!("HTTP server error: {}", e);
        return std::process::ExitCode::FAILURE;
    }

    std::process::ExitCode::SUCCESS
}
