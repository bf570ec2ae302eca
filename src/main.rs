use bedrock_edit::{logger, server, Config, EditHandler};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();
    logger::init_with_config(logger::LoggerConfig::from_env(config.json_logs))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &config.host,
        config.port,
    );
    logger::log_config_info(&config);

    let handler = match EditHandler::from_config(&config).await {
        Ok(handler) => handler,
        Err(e) => {
            log::error!("❌ Failed to initialize handler: {}", e);
            return Err(e.into());
        }
    };

    server::run(config, handler).await?;
    Ok(())
}
