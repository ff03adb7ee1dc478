use clap::Parser;
use tinytalk::{config, server};

/// tinyland - a reactive tabletop surface driven by TinyTalk rules
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Websocket listener host address
    #[arg(long, default_value = "127.0.0.1")]
    ws_host: String,

    /// Websocket listener port
    #[arg(long, default_value_t = 8765)]
    ws_port: u16,

    /// UDP host address for the TUIO marker adapter
    #[arg(long, default_value = "127.0.0.1")]
    udp_host: String,

    /// UDP port for the TUIO marker adapter
    #[arg(long, default_value_t = 8766)]
    udp_port: u16,

    /// TinyTalk rule file, hot-reloaded on change
    #[arg(long, default_value = "app.txt")]
    rules: String,

    /// Soft cap on reactive drains per ingestion message
    #[arg(long, default_value_t = 64)]
    max_drains: u32,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            ws_host: cli.ws_host,
            ws_port: cli.ws_port,
            udp_host: cli.udp_host,
            udp_port: cli.udp_port,
            rules_file: cli.rules,
            max_drains_per_tick: cli.max_drains,
        }
    }
}

#[tokio::main]
async fn main() {
    // Defaults to INFO level, override with RUST_LOG
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    println!("\ntinyland v{}\n", env!("CARGO_PKG_VERSION"));

    let cli_config: config::CliConfig = cli.into();
    let config = match config::ServerConfig::from_cli(cli_config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    server::run_with_config(config).await;
}
