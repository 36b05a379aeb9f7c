use tracing::{error, info};

use noticeboard::{AttachmentStore, BoardService, Config, Database};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = noticeboard::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        noticeboard::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Noticeboard starting");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.path, e);
            std::process::exit(1);
        }
    };
    info!(
        "Database {} ready (schema version {})",
        config.database.path,
        db.schema_version().await.unwrap_or(0)
    );

    let store = AttachmentStore::new();
    match store.ensure_directory_exists(&config.files.upload_path) {
        Ok(path) => info!("Attachments stored in {:?}", path),
        Err(e) => error!(
            "Upload directory {} is not usable: {}",
            config.files.upload_path, e
        ),
    }

    let board =
        BoardService::new(&db, &store, &config.files).with_page_size(config.board.page_size);
    info!("Board ready ({} posts per page)", board.page_size());
}
