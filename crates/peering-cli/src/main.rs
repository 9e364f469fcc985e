//! Peering CLI - IRR AS-SET resolution
//!
//! The `peering` command expands the AS-SET of an autonomous system into
//! the prefix lists published in the IRR, using bgpq3.
//!
//! ## Commands
//!
//! - `normalize`: Split an AS-SET expression into queryable tokens
//! - `command`: Show the bgpq3 command line for a token
//! - `resolve`: Expand a single token for one address family
//! - `prefixes`: Expand every token of an AS for both address families
//! - `config`: Show the effective resolver configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use irr_resolver::{
    build_command, normalize_as_set, resolve_async, AddressFamily, AsSetToken, Asn, IrrPrefixes,
    PrefixEntry, ResolverConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, Level};

#[derive(Parser)]
#[command(name = "peering")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve IRR AS-SETs into prefix lists", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// TOML configuration file (default: BGPQ3_* environment variables)
    #[arg(short, long, global = true, env = "PEERING_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split an AS-SET expression into the tokens that will be queried
    Normalize {
        /// Autonomous system number, used when the AS-SET is blank
        #[arg(long)]
        asn: u32,

        /// Raw AS-SET expression (e.g. "RIPE::AS-FOO, AS-BAR")
        #[arg(default_value = "")]
        as_set: String,
    },

    /// Print the bgpq3 command line for a token without running it
    #[command(name = "command")]
    ShowCommand {
        /// AS-SET token
        token: String,

        /// Address family (4 or 6)
        #[arg(short, long, default_value = "6")]
        family: AddressFamily,
    },

    /// Expand one AS-SET token into prefixes
    Resolve {
        /// AS-SET token
        token: String,

        /// Address family (4 or 6)
        #[arg(short, long, default_value = "6")]
        family: AddressFamily,

        /// Give up after this many seconds (0 = wait forever)
        #[arg(long, default_value = "60")]
        timeout_secs: u64,

        /// Print the prefixes as a JSON array
        #[arg(long)]
        output_json: bool,
    },

    /// Expand the AS-SET of an autonomous system for both address families
    Prefixes {
        /// Autonomous system number
        #[arg(long)]
        asn: u32,

        /// Raw AS-SET expression (blank = the AS itself)
        #[arg(long, default_value = "")]
        as_set: String,

        /// Only query this address family
        #[arg(short, long)]
        family: Option<AddressFamily>,

        /// Give up on each query after this many seconds (0 = wait forever)
        #[arg(long, default_value = "60")]
        timeout_secs: u64,
    },

    /// Print the effective resolver configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    irr_resolver::init_tracing(cli.json, level);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Normalize { asn, as_set } => cmd_normalize(&config, asn, &as_set),
        Commands::ShowCommand { token, family } => cmd_command(&config, &token, family),
        Commands::Resolve {
            token,
            family,
            timeout_secs,
            output_json,
        } => cmd_resolve(&config, &token, family, timeout(timeout_secs), output_json).await,
        Commands::Prefixes {
            asn,
            as_set,
            family,
            timeout_secs,
        } => cmd_prefixes(config, asn, &as_set, family, timeout(timeout_secs)).await,
        Commands::Config => cmd_config(&config),
    }
}

fn load_config(path: Option<&Path>) -> Result<ResolverConfig> {
    match path {
        Some(path) => ResolverConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path)),
        None => Ok(ResolverConfig::from_env()),
    }
}

fn timeout(secs: u64) -> Option<Duration> {
    if secs > 0 {
        Some(Duration::from_secs(secs))
    } else {
        None
    }
}

/// Print normalized tokens, one per line
fn cmd_normalize(config: &ResolverConfig, asn: u32, as_set: &str) -> Result<()> {
    let tokens = normalize_as_set(Asn(asn), as_set, &config.sources);
    if tokens.is_empty() {
        info!("No usable AS-SET token in {:?}", as_set);
    }
    for token in tokens {
        println!("{}", token);
    }
    Ok(())
}

/// Print the command line that `resolve` would run
fn cmd_command(config: &ResolverConfig, token: &str, family: AddressFamily) -> Result<()> {
    let argv = build_command(token, family, config);
    println!("{}", shell_join(&argv));
    Ok(())
}

/// Resolve a single token
async fn cmd_resolve(
    config: &ResolverConfig,
    token: &str,
    family: AddressFamily,
    timeout: Option<Duration>,
    output_json: bool,
) -> Result<()> {
    let prefixes = resolve_async(token, family, config, timeout)
        .await
        .with_context(|| format!("Failed to resolve {} for {}", token, family))?;

    if output_json {
        println!("{}", serde_json::to_string_pretty(&prefixes)?);
    } else {
        for prefix in &prefixes {
            println!("{}", prefix);
        }
    }

    Ok(())
}

/// Resolve every token of an AS, one concurrent query per token and family
async fn cmd_prefixes(
    config: ResolverConfig,
    asn: u32,
    as_set: &str,
    family: Option<AddressFamily>,
    timeout: Option<Duration>,
) -> Result<()> {
    let asn = Asn(asn);
    let families: Vec<AddressFamily> = match family {
        Some(family) => vec![family],
        None => AddressFamily::ALL.to_vec(),
    };
    let tokens = normalize_as_set(asn, as_set, &config.sources);
    info!("Resolving {} token(s) for {}", tokens.len(), asn);

    let config = Arc::new(config);
    let mut queries = JoinSet::new();
    for (index, token) in tokens.into_iter().enumerate() {
        for &family in &families {
            let config = Arc::clone(&config);
            let token = token.clone();
            queries.spawn(async move {
                let result = resolve_async(token.as_str(), family, &config, timeout).await;
                (index, family, token, result)
            });
        }
    }

    let mut results: Vec<(usize, AddressFamily, Vec<PrefixEntry>)> = Vec::new();
    while let Some(joined) = queries.join_next().await {
        let (index, family, token, result) = joined.context("Resolver task panicked")?;
        let prefixes = result.with_context(|| query_label(&token, family, asn))?;
        debug!("{} {}: {} prefix(es)", token, family, prefixes.len());
        results.push((index, family, prefixes));
    }

    let prefixes = assemble(results);
    println!("{}", serde_json::to_string_pretty(&prefixes)?);
    Ok(())
}

fn query_label(token: &AsSetToken, family: AddressFamily, asn: Asn) -> String {
    format!("Failed to resolve {} ({}) for {}", token, family, asn)
}

/// Rebuild per-family lists in token order from out-of-order task results
fn assemble(mut results: Vec<(usize, AddressFamily, Vec<PrefixEntry>)>) -> IrrPrefixes {
    results.sort_by_key(|(index, family, _)| (*index, family.version()));

    let mut prefixes = IrrPrefixes::default();
    for (_, family, resolved) in results {
        prefixes.extend(family, resolved);
    }
    prefixes
}

/// Show the effective configuration
fn cmd_config(config: &ResolverConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// Render an argv for display, quoting arguments that need it
fn shell_join(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            let plain = !arg.is_empty()
                && arg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_./:,=+@".contains(c));
            if plain {
                arg.clone()
            } else {
                format!("'{}'", arg.replace('\'', r"'\''"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
