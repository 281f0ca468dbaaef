use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use toshi_relay::daemon::build_fetcher;
use toshi_relay::error::Result;
use toshi_relay::services::receiver::LoggingReceiver;
use toshi_relay::Config;

#[derive(Parser, Debug)]
#[command(name = "toshi-relay")]
#[command(about = "Drain undelivered messages from the chat relay once")]
struct Cli {
    #[arg(long, default_value = "./toshi-relay.json")]
    config: String,

    #[arg(long, env = "TOSHI_RELAY_PASSWORD")]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,toshi_relay=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    let config = Config::from_file(&cli.config)?.with_password(cli.password);
    let fetcher = build_fetcher(&config, Arc::new(LoggingReceiver))?;
    let drained = fetcher
        .spawn(Some(Box::new(|| info!("relay reports no pending messages"))))
        .await;
    fetcher.flush_acknowledgements().await;
    drained
}
