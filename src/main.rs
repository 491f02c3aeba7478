use anyhow::Result;
use dotenvy::dotenv;
use marquee::app::{App, Command};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    match dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    let args: Vec<String> = env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    let app = App::from_env()?;
    println!("{}", app.run(command).await?);
    Ok(())
}
