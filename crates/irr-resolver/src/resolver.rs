//! IRR prefix resolution
//!
//! Expands AS-SET tokens into prefix lists by running the configured
//! expansion tool once per token and address family.

use crate::command::build_command;
use crate::config::ResolverConfig;
use crate::normalize::Normalizer;
use crate::output::interpret_output;
use crate::runner::{run_with_timeout, ProcessRunner, ToolRunner};
use crate::types::{AddressFamily, Asn, IrrPrefixes, PrefixEntry};
use crate::Result;
use std::time::Duration;
use tracing::{debug, info};

/// Resolver bound to a configuration and a way of running the tool
pub struct IrrResolver<'a, R = ProcessRunner> {
    config: &'a ResolverConfig,
    runner: R,
}

impl<'a> IrrResolver<'a, ProcessRunner> {
    /// Resolver that spawns the configured binary as a child process
    pub fn new(config: &'a ResolverConfig) -> Self {
        Self::with_runner(config, ProcessRunner)
    }
}

impl<'a, R: ToolRunner> IrrResolver<'a, R> {
    pub fn with_runner(config: &'a ResolverConfig, runner: R) -> Self {
        IrrResolver { config, runner }
    }

    pub fn config(&self) -> &ResolverConfig {
        self.config
    }

    /// Expand one token into prefixes of `family`
    ///
    /// A blank token yields an empty list without running anything.
    pub fn resolve(&self, token: &str, family: AddressFamily) -> Result<Vec<PrefixEntry>> {
        if token.trim().is_empty() {
            debug!("Empty AS-SET token, nothing to resolve");
            return Ok(Vec::new());
        }

        let argv = build_command(token, family, self.config);
        let output = self.runner.run(&argv)?;
        let prefixes = interpret_output(&self.config.binary_path, output)?;

        debug!(
            "Resolved {} {} into {} prefix(es)",
            token,
            family,
            prefixes.len()
        );
        Ok(prefixes)
    }

    /// Resolve every token of an autonomous system's AS-SET for both families
    ///
    /// Prefixes are concatenated per family in token order. The first
    /// failure aborts the whole operation.
    pub fn resolve_autonomous_system(&self, asn: Asn, raw_as_set: &str) -> Result<IrrPrefixes> {
        self.resolve_autonomous_system_families(asn, raw_as_set, &AddressFamily::ALL)
    }

    /// Same as [`resolve_autonomous_system`](Self::resolve_autonomous_system),
    /// restricted to `families`
    pub fn resolve_autonomous_system_families(
        &self,
        asn: Asn,
        raw_as_set: &str,
        families: &[AddressFamily],
    ) -> Result<IrrPrefixes> {
        let tokens = Normalizer::from_sources(&self.config.sources).normalize(asn, raw_as_set);
        info!("Resolving {} AS-SET token(s) for {}", tokens.len(), asn);

        let mut prefixes = IrrPrefixes::default();
        for token in &tokens {
            for &family in families {
                let resolved = self.resolve(token.as_str(), family)?;
                prefixes.extend(family, resolved);
            }
        }

        info!(
            "{}: {} IPv4 and {} IPv6 prefix(es)",
            asn,
            prefixes.ipv4.len(),
            prefixes.ipv6.len()
        );
        Ok(prefixes)
    }
}

/// Expand `token` by spawning the configured binary
pub fn resolve(
    token: &str,
    family: AddressFamily,
    config: &ResolverConfig,
) -> Result<Vec<PrefixEntry>> {
    IrrResolver::new(config).resolve(token, family)
}

/// Resolve an autonomous system's AS-SET for both families
pub fn resolve_autonomous_system(
    asn: Asn,
    raw_as_set: &str,
    config: &ResolverConfig,
) -> Result<IrrPrefixes> {
    IrrResolver::new(config).resolve_autonomous_system(asn, raw_as_set)
}

/// Async variant of [`resolve`] with an optional caller-imposed deadline
///
/// The child process is killed when the deadline expires.
pub async fn resolve_async(
    token: &str,
    family: AddressFamily,
    config: &ResolverConfig,
    timeout: Option<Duration>,
) -> Result<Vec<PrefixEntry>> {
    if token.trim().is_empty() {
        return Ok(Vec::new());
    }

    let argv = build_command(token, family, config);
    let output = run_with_timeout(&argv, timeout).await?;
    interpret_output(&config.binary_path, output)
}
