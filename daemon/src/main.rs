//! Remit daemon: entry point for running the payment gateway.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use remit_gateway::{GatewayConfig, GatewayServer};
use remit_types::NetworkId;
use remit_utils::LogFormat;
use remit_wallet_core::{LocationMap, RateTable};

#[derive(Parser)]
#[command(name = "remitd", about = "Remit payment gateway daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "REMIT_CONFIG")]
    config: Option<PathBuf>,

    /// Network: "mainnet", "testnet" or "standalone".
    #[arg(long, global = true, env = "REMIT_NETWORK")]
    network: Option<NetworkId>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "REMIT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "REMIT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the payment gateway.
    Run {
        /// HTTP port.
        #[arg(long, env = "REMIT_PORT")]
        port: Option<u16>,

        /// Interface to bind.
        #[arg(long, env = "REMIT_BIND_ADDRESS")]
        bind_address: Option<String>,

        /// Aurora REST endpoint (defaults to the network's).
        #[arg(long, env = "REMIT_AURORA_URL")]
        aurora_url: Option<String>,

        /// Do not mount `/make-payment`.
        #[arg(long, env = "REMIT_DISABLE_TEST_SIGNING")]
        disable_test_signing: bool,
    },

    /// Convert a fiat amount to tokens with the built-in rate table.
    Convert {
        amount: String,

        /// Currency code, e.g. USD, EUR, INR.
        #[arg(long, default_value = "USD", conflicts_with = "location")]
        currency: String,

        /// Sender location, e.g. USA, India, EU. Picks the currency.
        #[arg(long)]
        location: Option<String>,
    },

    /// Generate a key pair for manual use on a test network.
    Keygen,
}

/// Merge CLI flags over the config file over defaults.
fn load_config(cli: &Cli) -> anyhow::Result<GatewayConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            GatewayConfig::from_toml_file(&path)
                .with_context(|| format!("failed to load config from {path}"))?
        }
        None => GatewayConfig::default(),
    };

    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    if let Command::Run {
        port,
        bind_address,
        aurora_url,
        disable_test_signing,
    } = &cli.command
    {
        if let Some(port) = port {
            config.port = *port;
        }
        if let Some(addr) = bind_address {
            config.bind_address = addr.clone();
        }
        if let Some(url) = aurora_url {
            config.aurora_url = Some(url.clone());
        }
        if *disable_test_signing {
            config.enable_test_signing = false;
        }
    }

    config.validate()?;
    Ok(config)
}

async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    tracing::info!(
        network = config.network.as_str(),
        aurora = %config.effective_aurora_url(),
        port = config.port,
        test_signing = config.enable_test_signing,
        "starting payment gateway"
    );
    if config.enable_test_signing {
        tracing::warn!("/make-payment is enabled; it accepts secret keys over HTTP");
    }

    let bound = GatewayServer::from_config(config)?.bind().await?;
    bound.serve(termination()).await?;

    tracing::info!("remit daemon exited cleanly");
    Ok(())
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
async fn termination() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => tracing::info!("interrupted, draining requests"),
        _ = terminate => tracing::info!("terminated, draining requests"),
    }
}

fn convert(amount: &str, currency: &str, location: Option<&str>) -> anyhow::Result<String> {
    let currency = match location {
        Some(location) => LocationMap::default()
            .currency_for(location)
            .with_context(|| format!("no currency is mapped to location {location}"))?
            .to_string(),
        None => currency.to_uppercase(),
    };
    let tokens = RateTable::default().convert_to_token(amount, &currency)?;
    Ok(format!("{amount} {currency} = {tokens} DIAM"))
}

fn keygen(network: NetworkId) -> String {
    let keypair = remit_crypto::generate_keypair();
    let public = remit_crypto::encode_account_id(&keypair.public);
    let secret = remit_crypto::encode_secret_seed(&keypair.private);
    format!(
        "network: {}\npublic:  {public}\nsecret:  {}\n\nFund the public key before using it; keep the secret offline.",
        network.as_str(),
        secret.expose()
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    remit_utils::init_logging(config.log_format, &config.log_level);

    match &cli.command {
        Command::Run { .. } => run(config).await?,
        Command::Convert {
            amount,
            currency,
            location,
        } => println!("{}", convert(amount, currency, location.as_deref())?),
        Command::Keygen => println!("{}", keygen(config.network)),
    }

    Ok(())
}
