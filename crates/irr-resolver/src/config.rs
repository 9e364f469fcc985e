//! Expansion tool configuration
//!
//! Describes how to invoke bgpq3: where the binary lives, which IRR host
//! and sources to query, and any extra arguments per address family.
//! The configuration is always handed to the resolver explicitly.

use crate::error::ConfigError;
use crate::types::AddressFamily;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_BINARY_PATH: &str = "bgpq3";
pub const DEFAULT_HOST: &str = "rr.ntt.net";
pub const DEFAULT_SOURCES: &str =
    "RPKI,RIPE,ARIN,APNIC,AFRINIC,LACNIC,RIPE-NONAUTH,RADB,ALTDB,NTTCOM,LEVEL3,TC";

/// Extra command-line arguments, per address family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyArgs {
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
}

impl Default for FamilyArgs {
    fn default() -> Self {
        FamilyArgs {
            ipv4: to_strings(&["-r", "8", "-R", "24"]),
            ipv6: to_strings(&["-r", "16", "-R", "48"]),
        }
    }
}

impl FamilyArgs {
    /// No extra arguments for either family
    pub fn empty() -> Self {
        FamilyArgs {
            ipv4: Vec::new(),
            ipv6: Vec::new(),
        }
    }

    pub fn for_family(&self, family: AddressFamily) -> &[String] {
        match family {
            AddressFamily::Ipv4 => &self.ipv4,
            AddressFamily::Ipv6 => &self.ipv6,
        }
    }

    fn set(&mut self, family: AddressFamily, args: Vec<String>) {
        match family {
            AddressFamily::Ipv4 => self.ipv4 = args,
            AddressFamily::Ipv6 => self.ipv6 = args,
        }
    }
}

/// Invocation settings for the expansion tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Path to the bgpq3 binary
    pub binary_path: String,
    /// IRR server to query
    pub host: String,
    /// Comma-separated IRR sources, also used to strip registry tags
    pub sources: String,
    /// Extra arguments inserted before the prefix-list name
    pub args: FamilyArgs,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            binary_path: DEFAULT_BINARY_PATH.to_string(),
            host: DEFAULT_HOST.to_string(),
            sources: DEFAULT_SOURCES.to_string(),
            args: FamilyArgs::default(),
        }
    }
}

impl ResolverConfig {
    /// Create a config with no extra per-family arguments
    pub fn new(binary_path: &str, host: &str, sources: &str) -> Self {
        ResolverConfig {
            binary_path: binary_path.to_string(),
            host: host.to_string(),
            sources: sources.to_string(),
            args: FamilyArgs::empty(),
        }
    }

    /// Replace the extra arguments of one family
    pub fn with_args<I, S>(mut self, family: AddressFamily, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.set(family, args.into_iter().map(Into::into).collect());
        self
    }

    /// Defaults overridden by `BGPQ3_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `BGPQ3_*` keys
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("BGPQ3_PATH") {
            config.binary_path = path;
        }
        if let Some(host) = lookup("BGPQ3_HOST") {
            config.host = host;
        }
        if let Some(sources) = lookup("BGPQ3_SOURCES") {
            config.sources = sources;
        }
        for family in AddressFamily::ALL {
            let key = format!("BGPQ3_ARGS_{}", family.label().to_ascii_uppercase());
            if let Some(args) = lookup(&key) {
                config
                    .args
                    .set(family, args.split_whitespace().map(String::from).collect());
            }
        }

        config
    }

    /// Parse a TOML document; missing fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading resolver configuration from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Configured IRR source names, trimmed, blanks skipped
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
