use dotenv::dotenv;
use tracing::{info, warn};

use wasit_backend::app::app::App;
use wasit_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    let _logger = Logger::new().expect("Failed to set up logging");

    info!("Starting Wasit marketplace backend");

    match dotenv() {
        Ok(_) => info!("Loaded .env file"),
        Err(e) => warn!("No .env file loaded: {} (using system env vars)", e),
    }

    let app = App::new().await;
    app.start().await;
}
