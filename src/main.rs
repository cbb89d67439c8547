use riftradar::{Config, logging, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), riftradar::AppError> {
    dotenvy::dotenv().ok();
    logging::init()?;

    info!("🛰️ Starting...");

    let config = Config::from_env()?;
    server::serve(config).await
}
