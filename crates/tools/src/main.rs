use anyhow::{Context, Result};
use chainkit_tools::config::{self, DocumentFormat, Settings, DEFAULT_CONFIG_FILE};
use chainkit_tools::logging::{self, LogFormat};
use chainkit_tools::secrets::{resolve_account_keys, EnvSecretSource};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chainkit")]
#[command(about = "Inspect and validate smart-contract toolchain configuration")]
struct Cli {
    /// Configuration document (.toml or .json)
    #[arg(short, long, global = true, env = "CHAINKIT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the configuration, then print a summary
    Check,
    /// List declared networks in document order
    Networks,
    /// Show one network profile
    Network {
        /// Network name (defaults to the active network)
        #[arg(env = "CHAINKIT_NETWORK")]
        name: Option<String>,
        /// Print the profile as JSON, with literal keys redacted
        #[arg(long)]
        json: bool,
        /// Check that every unset account key can be resolved from the environment
        #[arg(long)]
        resolve_keys: bool,
    },
    /// Print the compiler settings block
    Compiler,
    /// Re-serialize the validated configuration
    Export {
        /// Output document format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Toml)]
        format: ExportFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Toml,
    Json,
}

impl From<ExportFormat> for DocumentFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Toml => DocumentFormat::Toml,
            ExportFormat::Json => DocumentFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format).context("Failed to initialize logging")?;

    let settings = Settings::load_file(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    match cli.command {
        Commands::Check => {
            settings.print_summary();
            println!("Configuration is valid");
        }
        Commands::Networks => {
            for profile in settings.networks().values() {
                let chain_id = profile
                    .chain_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<16} {:>10}  {}", profile.name, chain_id, profile.kind());
            }
        }
        Commands::Network {
            name,
            json,
            resolve_keys,
        } => {
            let profile = settings.active_network(name.as_deref())?;

            if json {
                let rendered = profile
                    .to_display_json()
                    .and_then(|value| serde_json::to_string_pretty(&value))
                    .context("Failed to render network profile")?;
                println!("{rendered}");
            } else {
                config::print_network(profile);
            }

            if resolve_keys {
                let keys = resolve_account_keys(profile, &EnvSecretSource::with_dotenv())?;
                println!("Resolved {} account key(s) for {}", keys.len(), profile.name);
            }
        }
        Commands::Compiler => {
            let compiler = settings.compiler();
            println!("// solc {}", compiler.version);
            println!("{:#}", compiler.solc_settings());
        }
        Commands::Export { format } => {
            let document = settings.to_document(format.into())?;
            println!("{}", document.trim_end());
        }
    }

    Ok(())
}
