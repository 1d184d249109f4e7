//! PoC consensus daemon: command-line access to the membership core.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use poc_consensus::{delegate_fee, transaction_fee};
use poc_node::{init_logging, LogFormat, NodeConfig, PocNode};
use poc_protocol::WireCodec;
use poc_transactions::{validate_staking_tx, SignedTransaction};
use poc_wallet_core::load_keystore;
use serde_json::json;

#[derive(Parser)]
#[command(name = "poc-daemon", about = "PoC consensus membership daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "POC_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding encrypted account keystores.
    #[arg(long, env = "POC_KEYSTORE_DIR")]
    keystore_dir: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "POC_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "POC_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show the fee schedule at a block height.
    Fee {
        #[arg(long, default_value_t = 0)]
        height: u64,
    },
    /// Configuration helpers.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage encrypted account keystores.
    Keystore {
        #[command(subcommand)]
        action: KeystoreAction,
    },
    /// Inspect staking transactions.
    Tx {
        #[command(subcommand)]
        action: TxAction,
    },
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Print the default configuration as TOML.
    Default,
}

#[derive(clap::Subcommand)]
enum KeystoreAction {
    /// Generate a new account and store it encrypted.
    New {
        #[arg(long, env = "POC_KEYSTORE_PASSWORD")]
        password: String,
        /// Overrides the configured keystore directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the public part of a keystore file.
    Show { file: PathBuf },
}

#[derive(clap::Subcommand)]
enum TxAction {
    /// Decode a hex-encoded signed transaction, validate it and print it as JSON.
    Decode { hex: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_logging(config.log_format, &config.log_level)?;
    tracing::debug!(keystore_dir = %config.keystore_dir.display(), "configuration resolved");

    match cli.command {
        Command::Fee { height } => {
            let report = fee_report(&config, height);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Config { action } => match action {
            ConfigAction::Default => print!("{}", NodeConfig::default().to_toml_string()?),
        },
        Command::Keystore { action } => match action {
            KeystoreAction::New { password, out } => {
                let mut config = config;
                if let Some(out) = out {
                    config.keystore_dir = out;
                }
                let node = PocNode::open(config)?;
                let account = node.accounts().create(&password)?;
                tracing::info!(address = %account.address, "account created");
                println!("{}", account.address);
            }
            KeystoreAction::Show { file } => {
                println!("{}", serde_json::to_string_pretty(&keystore_summary(&file)?)?);
            }
        },
        Command::Tx { action } => match action {
            TxAction::Decode { hex } => {
                let tx = decode_transaction(&hex)?;
                let valid = validate_staking_tx(&tx, &config.params);
                if let Err(e) = &valid {
                    tracing::warn!(hash = %tx.hash(), error = %e, "transaction failed validation");
                }
                let report = json!({
                    "transaction": tx,
                    "valid": valid.is_ok(),
                    "error": valid.err().map(|e| e.to_string()),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        },
    }

    Ok(())
}

/// File settings first, then flags and environment variables on top.
fn resolve_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(dir) = &cli.keystore_dir {
        config.keystore_dir = dir.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn fee_report(config: &NodeConfig, height: u64) -> serde_json::Value {
    json!({
        "height": height,
        "transaction_fee": transaction_fee(height, &config.params).value(),
        "delegate_fee": delegate_fee(height, &config.params),
    })
}

fn keystore_summary(path: &Path) -> anyhow::Result<serde_json::Value> {
    let keystore =
        load_keystore(path).with_context(|| format!("reading keystore {}", path.display()))?;
    Ok(json!({
        "version": keystore.version,
        "address": keystore.address,
        "public_key": keystore.public_key,
        "cipher": keystore.crypto.cipher,
        "kdf": keystore.crypto.kdf,
        "kdf_params": keystore.crypto.kdf_params,
    }))
}

fn decode_transaction(input: &str) -> anyhow::Result<SignedTransaction> {
    let input = input.trim();
    let input = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(input).context("transaction is not valid hex")?;
    SignedTransaction::from_bytes(&bytes).context("malformed transaction")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use poc_crypto::{derive_address, keypair_from_seed, sign_message};
    use poc_transactions::{
        Delegate, JoinConsensusData, LockTransaction, TxData, TxSignature, UnsignedTransaction,
    };
    use poc_types::{Na, Timestamp};

    fn signed_join() -> SignedTransaction {
        let kp = keypair_from_seed(&[21u8; 32]);
        let owner = derive_address(&kp.public);
        let lock =
            LockTransaction::new(owner.clone(), Na::new(500), Timestamp::new(100), 1).unwrap();
        let data = TxData::JoinConsensus(JoinConsensusData::new(
            owner,
            Delegate::new("poc_packer", Na::new(500)),
            lock,
        ));
        let sealed = UnsignedTransaction::new(Timestamp::new(100), Na::new(10), data)
            .seal()
            .unwrap();
        let signature = TxSignature {
            public_key: kp.public.clone(),
            signature: sign_message(sealed.hash().as_bytes(), &kp.private),
        };
        sealed.into_signed(signature)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_file_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.toml");
        std::fs::write(&path, "keystore_dir = \"/from/file\"\nlog_level = \"debug\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "poc-daemon",
            "--config",
            path.to_str().unwrap(),
            "--keystore-dir",
            "/from/flag",
            "fee",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.keystore_dir, PathBuf::from("/from/flag"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli =
            Cli::try_parse_from(["poc-daemon", "--config", "/nonexistent.toml", "fee"]).unwrap();
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn fee_report_uses_params() {
        let config = NodeConfig::default();
        let year = config.params.blocks_per_year;
        let first = fee_report(&config, 0);
        let second = fee_report(&config, year);
        assert_eq!(
            first["transaction_fee"].as_u64().unwrap(),
            config.params.transaction_fee.value()
        );
        assert_eq!(
            second["transaction_fee"].as_u64().unwrap(),
            config.params.transaction_fee.value() / 2
        );
        assert_eq!(first["delegate_fee"].as_f64().unwrap(), config.params.default_commission_rate);
    }

    #[test]
    fn decode_accepts_prefixed_hex() {
        let tx = signed_join();
        let encoded = format!("0x{}", hex::encode(tx.to_bytes().unwrap()));
        let decoded = decode_transaction(&encoded).unwrap();
        assert_eq!(decoded, tx);
        validate_staking_tx(&decoded, &poc_types::ConsensusParams::dev()).unwrap();
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_transaction("zz").is_err());
        assert!(decode_transaction("5b00").is_err());
    }

    #[test]
    fn keystore_summary_omits_secrets() {
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig {
            keystore_dir: dir.path().to_path_buf(),
            kdf: poc_wallet_core::KdfParams {
                memory: 64,
                iterations: 1,
                parallelism: 1,
            },
            ..NodeConfig::default()
        };
        let node = PocNode::open(config).unwrap();
        let account = node.accounts().create("pw").unwrap();

        let path = dir.path().join(format!("{}.json", account.address));
        let summary = keystore_summary(&path).unwrap();
        assert_eq!(summary["address"], json!(account.address));
        assert!(summary.get("ciphertext").is_none());
    }
}
