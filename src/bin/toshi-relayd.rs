use toshi_relay::daemon;
use toshi_relay::error::Result;
use toshi_relay::Config;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "toshi-relayd")]
#[command(about = "Polls the chat relay for undelivered messages")]
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
    daemon::run(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
