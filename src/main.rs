use cupcake_store::config::AppConfig;
use env_logger::Builder;
use log::LevelFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let config = AppConfig::load()?;
    init_logging(&config.log_level);

    if !dotenv_loaded {
        log::info!(".env file not found, using system environment variables");
    }
    log::info!(
        "Configuration loaded: port={} dialect={}",
        config.port,
        config.db_dialect
    );

    if let Err(e) = cupcake_store::run_server(config).await {
        log::error!("{:#}", e);
        return Err(e);
    }

    Ok(())
}

fn init_logging(log_level: &str) {
    let level = log_level.parse().unwrap_or(LevelFilter::Info);

    // sqlx logs every statement at debug; keep it quiet unless asked for
    let sqlx_level = if level >= LevelFilter::Debug {
        level
    } else {
        LevelFilter::Warn
    };

    Builder::new()
        .filter_level(level)
        .filter_module("sqlx", sqlx_level)
        .init();
}
