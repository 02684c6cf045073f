use anyhow::bail;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::core::config::AppConfig;
use crate::core::key_deriver::Wallet;
use crate::core::session::WalletSession;
use crate::security::mask_private_key;
use crate::storage::{FileSessionStorage, SessionStorage};

/// Solana wallet generator CLI (library-facing definitions)
#[derive(Debug, Parser)]
#[command(name = "sol-wallet", about = "Deterministic Solana wallet generator", version)]
pub struct Cli {
    /// Directory holding the stored mnemonic and wallets
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Derive new wallets, creating the seed phrase on first use
    Generate {
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Show all wallets
    List,
    /// Show or hide the private key of one wallet
    Toggle {
        #[arg(long)]
        position: usize,
    },
    /// Remove one wallet; the others keep their paths and keys
    Delete {
        #[arg(long)]
        position: usize,
    },
    /// Print the session seed phrase
    Mnemonic,
    /// Use an existing seed phrase for this session
    Import {
        #[arg(long)]
        phrase: String,
        /// Discard the current seed phrase and wallets first
        #[arg(long)]
        force: bool,
    },
    /// Forget the seed phrase and all wallets
    Reset,
}

/// Config file (if any), then SOL_WALLET_* env vars, then `--data-dir`.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let base = match cli.config.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let mut config = base.apply_env_overrides()?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    Ok(config)
}

/// Run `cli.command` against the file store in `config.data_dir`.
/// `config` is the result of [`resolve_config`] for the same `cli`.
pub async fn run<W: Write>(cli: Cli, config: &AppConfig, out: &mut W) -> anyhow::Result<()> {
    let storage = FileSessionStorage::new(config.data_dir.clone());
    execute(cli.command, config, &storage, out).await
}

/// Load the session from `storage`, apply `command`, save on mutation.
pub async fn execute<S, W>(
    command: Commands,
    config: &AppConfig,
    storage: &S,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: SessionStorage + ?Sized,
    W: Write,
{
    let restored = match storage.load().await {
        Ok(Some(snapshot)) => WalletSession::restore(snapshot, config.mnemonic_words),
        Ok(None) => Ok(WalletSession::with_strength(config.mnemonic_words)),
        Err(e) => Err(e),
    };
    let mut session = match restored {
        Ok(session) => session,
        Err(e) if matches!(command, Commands::Reset) => {
            warn!(error = %e, "Discarding unreadable stored session");
            WalletSession::with_strength(config.mnemonic_words)
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context("stored session is invalid; run `reset` to start over"))
        }
    };

    match command {
        Commands::Generate { count } => {
            if count == 0 {
                bail!("--count must be at least 1");
            }
            for _ in 0..count {
                let position = session.len();
                let wallet = session.generate_wallet()?;
                write_wallet(out, position, wallet)?;
            }
            storage.save(&session.snapshot()).await?;
        }
        Commands::List => {
            if session.is_empty() {
                writeln!(out, "No wallets yet")?;
            }
            for (position, wallet) in session.wallets().iter().enumerate() {
                write_wallet(out, position, wallet)?;
            }
        }
        Commands::Toggle { position } => {
            let revealed = session.toggle_reveal(position)?;
            storage.save(&session.snapshot()).await?;
            let state = if revealed { "shown" } else { "hidden" };
            writeln!(out, "Private key of wallet {} is now {}", position, state)?;
        }
        Commands::Delete { position } => {
            let removed = session.remove(position)?;
            storage.save(&session.snapshot()).await?;
            writeln!(out, "Deleted wallet {} ({})", position, removed.public_key)?;
        }
        Commands::Mnemonic => match session.mnemonic() {
            Some(phrase) => writeln!(out, "Seed Phrase: {}", phrase.as_str())?,
            None => writeln!(out, "No seed phrase yet; run `generate` first")?,
        },
        Commands::Import { phrase, force } => {
            if session.mnemonic().is_some() {
                if !force {
                    bail!("a seed phrase already exists; pass --force to replace it and its wallets");
                }
                session.clear();
            }
            session.import_mnemonic(&phrase)?;
            storage.save(&session.snapshot()).await?;
            info!("Imported seed phrase");
            writeln!(out, "Seed phrase imported")?;
        }
        Commands::Reset => {
            session.clear();
            storage.clear().await?;
            writeln!(out, "Session reset")?;
        }
    }
    Ok(())
}

fn write_wallet<W: Write>(out: &mut W, position: usize, wallet: &Wallet) -> std::io::Result<()> {
    let private = if wallet.revealed {
        wallet.private_key.clone()
    } else {
        mask_private_key(&wallet.private_key)
    };
    writeln!(out, "[{}] {}", position, wallet.path)?;
    writeln!(out, "    Public Key:  {}", wallet.public_key)?;
    writeln!(out, "    Private Key: {}", private)
}
