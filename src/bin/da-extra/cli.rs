//! Command-line interface definition.

use clap::{Args, Parser, Subcommand, ValueEnum};
use da_extra_cache::config::ProxyConfig;
use da_extra_cache::CommitmentMode;
use std::path::PathBuf;

/// Inspect commitments and query the extra-info cache.
#[derive(Parser, Debug)]
#[command(name = "da-extra")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level; falls back to the config file's `log_level`.
    #[arg(long, env = "RUST_LOG", global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, env = "DA_EXTRA_JSON_LOGS", global = true)]
    pub json_logs: bool,

    /// Path to configuration file.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the correlation key a commitment maps to.
    Key(CommitmentArgs),

    /// Print the decoded certificate fields.
    Inspect(CommitmentArgs),

    /// Look up the cached extra info for a commitment.
    Resolve {
        /// Commitment to resolve.
        #[command(flatten)]
        commitment: CommitmentArgs,

        /// Per-backend call timeout in milliseconds.
        #[arg(long, env = "DA_EXTRA_BACKEND_TIMEOUT_MS")]
        backend_timeout_ms: Option<u64>,
    },

    /// Write the default configuration to a file.
    InitConfig {
        /// Destination path.
        path: PathBuf,
    },
}

/// A hex commitment and how it is framed.
#[derive(Args, Debug)]
pub struct CommitmentArgs {
    /// Hex-encoded commitment, optionally `0x`-prefixed.
    pub commitment: String,

    /// Commitment framing.
    #[arg(long, value_enum, default_value = "simple")]
    pub mode: CliCommitmentMode,
}

/// Commitment mode CLI enum.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliCommitmentMode {
    /// Version byte followed by the certificate.
    Simple,
    /// Optimism generic commitment.
    OpGeneric,
    /// Optimism keccak commitment (unsupported).
    OpKeccak,
}

impl Cli {
    /// Load the configuration file if one was given, then apply overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is specified but cannot be loaded.
    pub fn load_config(&self) -> color_eyre::Result<ProxyConfig> {
        let mut config = if let Some(ref path) = self.config {
            ProxyConfig::from_file(path)?
        } else {
            ProxyConfig::default()
        };

        if let Some(ref level) = self.log_level {
            config.log_level.clone_from(level);
        }
        if let Command::Resolve {
            backend_timeout_ms: Some(timeout),
            ..
        } = self.command
        {
            config.cache.backend_timeout_ms = timeout;
        }

        Ok(config)
    }
}

impl From<CliCommitmentMode> for CommitmentMode {
    fn from(m: CliCommitmentMode) -> Self {
        match m {
            CliCommitmentMode::Simple => CommitmentMode::Simple,
            CliCommitmentMode::OpGeneric => CommitmentMode::OptimismGeneric,
            CliCommitmentMode::OpKeccak => CommitmentMode::OptimismKeccak,
        }
    }
}
