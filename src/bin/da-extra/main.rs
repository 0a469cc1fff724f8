//! da-extra CLI entry point.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use da_extra_cache::cache::MetadataChain;
use da_extra_cache::{decode_commitment_hex, get_extra, ExtraKey, ProxyConfig};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Config file first so its log level applies when no flag is given
    let config = cli.load_config()?;

    // Initialize tracing; stdout is reserved for command output
    let filter = EnvFilter::new(&config.log_level);

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    info!("da-extra v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Key(args) => {
            let cert = decode_commitment_hex(&args.commitment, args.mode.into())?;
            println!("{}", ExtraKey::for_certificate(&cert));
        }
        Command::Inspect(args) => {
            let cert = decode_commitment_hex(&args.commitment, args.mode.into())?;
            let (x, y) = cert.blob_commitment_fields()?;
            println!("batch_header_hash:      0x{}", hex::encode(&cert.batch_header_hash));
            println!("blob_index:             {}", cert.blob_index);
            println!("reference_block_number: {}", cert.reference_block_number);
            println!("quorum_ids:             {:?}", cert.quorum_ids);
            println!("commitment.x:           {x:#x}");
            println!("commitment.y:           {y:#x}");
            println!("key:                    {}", ExtraKey::for_certificate(&cert));
        }
        Command::Resolve { commitment, .. } => {
            resolve(&config, &commitment.commitment, commitment.mode.into()).await?;
        }
        Command::InitConfig { path } => {
            ProxyConfig::default().to_file(path)?;
            info!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

async fn resolve(
    config: &ProxyConfig,
    commitment: &str,
    mode: da_extra_cache::CommitmentMode,
) -> color_eyre::Result<()> {
    let chain = MetadataChain::from_config(&config.cache)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling lookup");
            on_signal.cancel();
        }
    });

    let record = get_extra(&chain, commitment, mode, &cancel).await?;
    println!("{}", String::from_utf8_lossy(&record));

    let stats = chain.stats();
    info!(
        "Lookup done (hits={}, misses={}, backend_failures={})",
        stats.hits, stats.misses, stats.backend_failures
    );
    Ok(())
}
