//! Value types shared by the normalizer and the resolver

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single prefix as emitted by the expansion tool (e.g. `192.0.2.0/24`)
pub type PrefixEntry = String;

/// Autonomous system number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Asn(pub u32);

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

impl From<u32> for Asn {
    fn from(value: u32) -> Self {
        Asn(value)
    }
}

/// A cleaned AS-SET name or `AS<number>`, ready to hand to the expansion tool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AsSetToken(String);

impl AsSetToken {
    pub(crate) fn new(value: String) -> Self {
        AsSetToken(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AsSetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AsSetToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Asn> for AsSetToken {
    fn from(asn: Asn) -> Self {
        AsSetToken(asn.to_string())
    }
}

/// IP address family to request prefixes for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Both families, IPv4 first
    pub const ALL: [AddressFamily; 2] = [AddressFamily::Ipv4, AddressFamily::Ipv6];

    /// Numeric IP version (4 or 6)
    pub fn version(self) -> u8 {
        match self {
            AddressFamily::Ipv4 => 4,
            AddressFamily::Ipv6 => 6,
        }
    }

    /// Label used in configuration (`ipv4` / `ipv6`)
    pub fn label(self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "ipv4",
            AddressFamily::Ipv6 => "ipv6",
        }
    }

    /// Command-line selector for the expansion tool
    pub fn flag(self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "-4",
            AddressFamily::Ipv6 => "-6",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for AddressFamily {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(AddressFamily::Ipv4),
            6 => Ok(AddressFamily::Ipv6),
            other => Err(format!("unsupported address family: {}", other)),
        }
    }
}

impl FromStr for AddressFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4" | "v4" | "ipv4" => Ok(AddressFamily::Ipv4),
            "6" | "v6" | "ipv6" => Ok(AddressFamily::Ipv6),
            other => Err(format!("unsupported address family: {}", other)),
        }
    }
}

/// Prefixes resolved for an autonomous system, split by address family
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrPrefixes {
    pub ipv4: Vec<PrefixEntry>,
    pub ipv6: Vec<PrefixEntry>,
}

impl IrrPrefixes {
    /// Prefixes of one family
    pub fn get(&self, family: AddressFamily) -> &[PrefixEntry] {
        match family {
            AddressFamily::Ipv4 => &self.ipv4,
            AddressFamily::Ipv6 => &self.ipv6,
        }
    }

    /// Append prefixes to one family, keeping order and duplicates
    pub fn extend(&mut self, family: AddressFamily, prefixes: Vec<PrefixEntry>) {
        match family {
            AddressFamily::Ipv4 => self.ipv4.extend(prefixes),
            AddressFamily::Ipv6 => self.ipv6.extend(prefixes),
        }
    }
}
