//! IRR-Resolver: AS-SET normalization and prefix-list expansion
//!
//! Turns the AS-SET field of an autonomous system into concrete prefix
//! lists by shelling out to bgpq3 (or a compatible tool).
//!
//! ## Pipeline
//!
//! - [`normalize_as_set`] splits a free-form AS-SET expression into tokens,
//!   stripping registry (`RIPE::`) and family (`ipv6:`) tags.
//! - [`resolve`] expands one token for one address family by running the
//!   tool and reading its JSON `prefix_list`.
//! - [`resolve_autonomous_system`] chains both for every token and family.
//!
//! Configuration is always passed in as a [`ResolverConfig`].

pub mod command;
pub mod config;
pub mod error;
pub mod normalize;
pub mod output;
pub mod resolver;
pub mod runner;
pub mod telemetry;
pub mod types;

pub use command::{build_command, PREFIX_LIST_NAME};
pub use config::{FamilyArgs, ResolverConfig};
pub use error::{ConfigError, ResolveError};
pub use normalize::{normalize_as_set, Normalizer};
pub use output::{interpret_output, parse_prefix_list, ToolOutput};
pub use resolver::{resolve, resolve_async, resolve_autonomous_system, IrrResolver};
pub use runner::{run_with_timeout, ProcessRunner, ToolRunner};
pub use telemetry::init_tracing;
pub use types::{AddressFamily, AsSetToken, Asn, IrrPrefixes, PrefixEntry};

/// Result type for resolver operations
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
