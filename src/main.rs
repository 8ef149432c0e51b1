use clap::{Parser, Subcommand};
use base_identity::{
    config::Settings,
    models::{IdentityRecord, IdentitySource},
    service::IdentityService,
    utils::ShareLinks,
    web::{create_router, AppState},
};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod tui_main;

#[derive(Parser)]
#[clap(name = "base-identity")]
#[clap(about = "Reveal the on-chain identity of Base wallets", long_about = None)]
struct Cli {
    /// Keep the identity cache in memory instead of SQLite
    #[clap(long, global = true)]
    ephemeral: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a wallet and reveal its identity
    Score {
        /// Wallet address (0x + 40 hex)
        address: String,

        /// Regenerate even if a cached identity matches
        #[clap(long)]
        refresh: bool,

        /// Print JSON instead of text
        #[clap(long)]
        json: bool,
    },

    /// Show the cached identity without touching the chain
    Show {
        address: String,

        #[clap(long)]
        json: bool,
    },

    /// Record the transaction that officialized an identity
    Mint {
        address: String,

        /// Payment transaction hash (0x + 64 hex)
        tx_hash: String,
    },

    /// Start the web dashboard and API
    Serve {
        /// Port to listen on (overrides api.port)
        #[clap(short, long)]
        port: Option<u16>,
    },

    /// Launch interactive TUI
    Tui,
}

fn load_settings() -> anyhow::Result<Settings> {
    let settings = Settings::new().unwrap_or_else(|e| {
        eprintln!("Using default settings: {}", e);
        Settings::default()
    });

    settings.validate().map_err(|e| anyhow::anyhow!("Invalid settings: {}", e))?;
    Ok(settings)
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_identity(
    settings: &Settings,
    record: &IdentityRecord,
    source: Option<IdentitySource>,
    as_json: bool,
) -> anyhow::Result<()> {
    let share = ShareLinks::for_record(&settings.share, &settings.mint, record)?;

    if as_json {
        let body = json!({
            "source": source,
            "identity": record,
            "share": share,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("\n=== {} ===", record.name);
    println!("Address: {}", record.checksum_address);
    println!("Tier: {} ({:.1}/100)", record.tier, record.scores.final_score);
    println!("Verdict: {}", record.verdict);
    println!("\nScores:");
    println!("  Wealth: {:.0}", record.scores.wealth_score);
    println!("  Vitality: {:.0}", record.scores.vitality_score);
    println!("  Community: {:.0}", record.scores.community_score);
    println!("\nStats:");
    println!("  Balance: {:.4} ETH", record.stats.balance_eth);
    println!("  Transactions: {}", record.stats.tx_count);
    let held = record.stats.held_symbols();
    println!(
        "  Tokens: {}",
        if held.is_empty() { "none".to_string() } else { held.join(", ") }
    );

    match source {
        Some(IdentitySource::Cached) => println!("\n⚡ Loaded from cache"),
        Some(IdentitySource::Generated) => println!("\n✨ Freshly generated"),
        None => {}
    }

    if record.minted {
        println!("✅ Minted in {}", record.mint_tx_hash.as_deref().unwrap_or("-"));
    } else {
        println!("\nOfficialize for {} ETH: {}", settings.mint.price_eth, share.mint_uri);
    }
    println!("Share: {}", share.share_url);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = load_settings()?;

    if let Commands::Tui = cli.command {
        return tui_main::run_tui(settings, cli.ephemeral).await;
    }

    init_logging(&settings);

    match cli.command {
        Commands::Score { address, refresh, json } => {
            let service = IdentityService::from_settings(&settings, cli.ephemeral).await?;
            let outcome = service.resolve(&address, refresh).await?;
            print_identity(&settings, &outcome.record, Some(outcome.source), json)?;
        }

        Commands::Show { address, json } => {
            let service = IdentityService::from_settings(&settings, cli.ephemeral).await?;
            match service.lookup(&address).await? {
                Some(record) => print_identity(&settings, &record, Some(IdentitySource::Cached), json)?,
                None => {
                    warn!("No cached identity for {}", address);
                    println!("No identity found for {}. Run `score` first.", address);
                }
            }
        }

        Commands::Mint { address, tx_hash } => {
            let service = IdentityService::from_settings(&settings, cli.ephemeral).await?;
            let record = service.mint(&address, &tx_hash).await?;
            print_identity(&settings, &record, None, false)?;
        }

        Commands::Serve { port } => {
            if let Some(port) = port {
                settings.api.port = port;
            }

            let service = IdentityService::from_settings(&settings, cli.ephemeral).await?;
            let bind_address = settings.bind_address();
            let router = create_router(AppState::new(service, settings));

            let listener = tokio::net::TcpListener::bind(&bind_address).await?;
            info!("Dashboard listening on http://{}", bind_address);
            axum::serve(listener, router).await?;
        }

        Commands::Tui => {}
    }

    Ok(())
}
