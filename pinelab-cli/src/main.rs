//! PineLab CLI — one-shot indicator generation without the TUI.
//!
//! Commands:
//! - `generate` — build the prompt, call Gemini, print the script
//! - `prompt` — print the rendered instruction without any network call

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pinelab_core::{
    build_prompt, EnvCredential, GenerateError, GenerationClient, GeminiTransport,
    StaticCredential, StrategyConfig, Timeframe, CredentialProvider,
};
use pinelab_core::transport::DEFAULT_MODEL;

#[derive(Parser)]
#[command(name = "pinelab", about = "PineLab CLI — AI-generated XAUUSD scalping indicators")]
struct Cli {
    /// Verbose logging (debug level) to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an indicator via the Gemini completion endpoint.
    Generate {
        #[command(flatten)]
        config: ConfigArgs,

        /// API key. Defaults to the GEMINI_API_KEY environment variable.
        #[arg(long)]
        api_key: Option<String>,

        /// Model to target.
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Emit the full result document as JSON instead of just the script.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Write the script to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the rendered instruction without calling the endpoint.
    Prompt {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Strategy configuration from flags, optionally layered over a TOML file.
#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// Path to a TOML config file (flags override its values).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Timeframe target: M1, M5, or M15.
    #[arg(long)]
    timeframe: Option<Timeframe>,

    /// Reward side of the 1:N risk/reward ratio.
    #[arg(long)]
    risk_ratio: Option<f64>,

    /// Smart Money Concepts module (true/false).
    #[arg(long)]
    smc: Option<bool>,

    /// Momentum RSI module (true/false).
    #[arg(long)]
    rsi: Option<bool>,

    /// ATR volatility filter module (true/false).
    #[arg(long)]
    volatility_filter: Option<bool>,
}

impl ConfigArgs {
    /// Resolve to a full config: file (or defaults), then flag overrides.
    fn resolve(&self) -> Result<StrategyConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => StrategyConfig::default(),
        };

        if let Some(tf) = self.timeframe {
            config.timeframe = tf;
        }
        if let Some(rr) = self.risk_ratio {
            config.risk_ratio = rr;
        }
        if let Some(v) = self.smc {
            config.use_smc = v;
        }
        if let Some(v) = self.rsi {
            config.use_rsi = v;
        }
        if let Some(v) = self.volatility_filter {
            config.volatility_filter = v;
        }

        if !(config.risk_ratio > 0.0) {
            bail!("risk ratio must be positive, got {}", config.risk_ratio);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            config,
            api_key,
            model,
            json,
            out,
        } => cmd_generate(&config, api_key, &model, json, out),
        Commands::Prompt { config } => {
            let config = config.resolve()?;
            println!("{}", build_prompt(&config));
            Ok(())
        }
    }
}

fn cmd_generate(
    args: &ConfigArgs,
    api_key: Option<String>,
    model: &str,
    json: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = args.resolve()?;
    debug!(?config, model, "resolved generate request");

    let credentials: Box<dyn CredentialProvider> = match api_key {
        Some(key) => Box::new(StaticCredential(key)),
        None => Box::new(EnvCredential),
    };
    let client = GenerationClient::new(Box::new(GeminiTransport::with_model(model)), credentials);

    let output = match client.generate(&config) {
        Ok(output) => output,
        Err(GenerateError::CredentialMissing) => {
            bail!("no API key configured: set GEMINI_API_KEY or pass --api-key")
        }
        Err(err @ GenerateError::CredentialInvalid(_)) => {
            bail!("{err}: check GEMINI_API_KEY or --api-key")
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match out {
        Some(path) => {
            std::fs::write(&path, &output.code)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Script written to {}", path.display());
        }
        None => println!("{}", output.code),
    }

    // Keep stdout clean for the script itself; the analysis goes to stderr.
    eprintln!("\n{}", output.explanation);
    for feature in &output.key_features {
        eprintln!("  - {feature}");
    }
    Ok(())
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=warn,reqwest=warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let args = ConfigArgs {
            timeframe: Some(Timeframe::M1),
            risk_ratio: Some(4.0),
            rsi: Some(false),
            ..ConfigArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.timeframe, Timeframe::M1);
        assert_eq!(config.risk_ratio, 4.0);
        assert!(!config.use_rsi);
        // Untouched fields keep their defaults.
        assert!(config.use_smc);
        assert!(config.volatility_filter);
    }

    #[test]
    fn non_positive_risk_ratio_is_rejected() {
        let args = ConfigArgs {
            risk_ratio: Some(0.0),
            ..ConfigArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = ConfigArgs {
            config: Some(PathBuf::from("/nonexistent/strategy.toml")),
            ..ConfigArgs::default()
        };
        assert!(args.resolve().is_err());
    }
}
