use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use certverify::core::constants::{DEFAULT_CONTRACT_ADDRESS, DEFAULT_RPC_URL};
use certverify::insight::InsightConfig;
use certverify::{App, AppConfig, ClientConfig, Command, Role};

#[derive(Parser)]
#[command(author, version, about = "Issue and verify academic credentials on a local chain")]
struct Cli {
    /// JSON-RPC endpoint of the node
    #[arg(long, env = "CERTVERIFY_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Address of the deployed certificate contract
    #[arg(long, env = "CERTVERIFY_CONTRACT", default_value = DEFAULT_CONTRACT_ADDRESS)]
    contract: String,

    /// Role to start in
    #[arg(long, default_value = "verifier", value_parser = ["admin", "verifier"])]
    role: String,

    /// Do not poll the node for the block height
    #[arg(long, default_value_t = false)]
    no_poll: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let role: Role = cli.role.parse()?;

    let config = ClientConfig {
        app: AppConfig::new(cli.contract, cli.rpc_url),
        role,
        polling_enabled: !cli.no_poll,
        insight: InsightConfig::from_env(),
        ..ClientConfig::default()
    };
    if !config.insight.has_credentials() {
        info!("no API key set, insights will use the fallback text");
    }

    let app = Arc::new(App::connect(config).context("failed to start client")?);
    app.start_polling().await;

    println!("{}\n", app.render().await);
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        match command.run(&app).await {
            Ok(reply) => {
                if let Some(message) = reply.message {
                    println!("{message}");
                }
                if let Some(pending) = reply.pending {
                    redraw_after(app.clone(), pending);
                }
            }
            Err(err) => eprintln!("{err}"),
        }
        println!("{}\n", app.render().await);
    }

    app.stop_polling().await;
    Ok(())
}

/// Print the screen again once `pending` finishes.
fn redraw_after(app: Arc<App>, pending: JoinHandle<()>) {
    tokio::spawn(async move {
        match pending.await {
            Ok(()) => println!("{}\n", app.render().await),
            Err(err) => warn!(error = %err, "insight task failed"),
        }
    });
}
