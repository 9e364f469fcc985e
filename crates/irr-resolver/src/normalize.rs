//! AS-SET normalization
//!
//! Turns the free-form AS-SET field of an autonomous system into the
//! individual names the expansion tool can query. Registry tags such as
//! `RIPE::` and family tags such as `ipv6:` are stripped; nothing else is
//! validated, the tool rejects what it cannot expand.

use crate::types::{AsSetToken, Asn};
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;
use tracing::debug;

fn separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[/,&\s]+").expect("static separator pattern"))
}

fn family_tag() -> &'static Regex {
    static FAMILY_TAG: OnceLock<Regex> = OnceLock::new();
    FAMILY_TAG.get_or_init(|| {
        RegexBuilder::new(r"^(?:ipv4|ipv6):")
            .case_insensitive(true)
            .build()
            .expect("static family tag pattern")
    })
}

/// Splits and cleans AS-SET expressions for a fixed list of IRR sources
#[derive(Debug, Clone)]
pub struct Normalizer {
    registry_tag: Option<Regex>,
}

impl Normalizer {
    /// Build a normalizer for the given IRR source names
    pub fn new<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let alternatives: Vec<String> = sources
            .into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(regex::escape)
            .collect();

        // Sources are escaped, so the pattern always compiles
        let registry_tag = if alternatives.is_empty() {
            None
        } else {
            RegexBuilder::new(&format!(r"^(?:{}):[:\s]?", alternatives.join("|")))
                .case_insensitive(true)
                .build()
                .ok()
        };

        Normalizer { registry_tag }
    }

    /// Build a normalizer from a comma-separated source list
    pub fn from_sources(sources: &str) -> Self {
        Self::new(sources.split(','))
    }

    /// Split `raw` into AS-SET tokens, falling back to `AS<asn>` when blank
    pub fn normalize(&self, asn: Asn, raw: &str) -> Vec<AsSetToken> {
        if raw.trim().is_empty() {
            debug!("No AS-SET configured for {}, using the AS itself", asn);
            return vec![AsSetToken::from(asn)];
        }

        let tokens: Vec<AsSetToken> = separators()
            .split(raw)
            .filter_map(|fragment| self.clean(fragment))
            .map(AsSetToken::new)
            .collect();

        debug!("Normalized AS-SET {:?} into {} token(s)", raw, tokens.len());
        tokens
    }

    fn clean(&self, fragment: &str) -> Option<String> {
        let mut value = fragment.trim();
        if value.is_empty() {
            return None;
        }

        let passes = [self.registry_tag.as_ref(), Some(family_tag())];
        for pattern in passes.into_iter().flatten() {
            if let Some(found) = pattern.find(value) {
                value = value[found.end()..].trim();
            }
        }

        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

/// Normalize `raw` using the comma-separated IRR `sources` list
pub fn normalize_as_set(asn: Asn, raw: &str, sources: &str) -> Vec<AsSetToken> {
    Normalizer::from_sources(sources).normalize(asn, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCES: &str = "RPKI,RIPE,ARIN,APNIC,AFRINIC,LACNIC,RIPE-NONAUTH,RADB,ALTDB";

    fn tokens(raw: &str) -> Vec<String> {
        normalize_as_set(Asn(64500), raw, SOURCES)
            .into_iter()
            .map(AsSetToken::into_string)
            .collect()
    }

    #[test]
    fn test_blank_falls_back_to_asn() {
        for raw in ["", " ", "\t\n  "] {
            assert_eq!(tokens(raw), vec!["AS64500"]);
        }
        let tokens = normalize_as_set(Asn(1), "", SOURCES);
        assert_eq!(tokens[0].as_str(), "AS1");
    }

    #[test]
    fn test_single_as_set() {
        assert_eq!(tokens("AS-FOO"), vec!["AS-FOO"]);
        assert_eq!(tokens("  AS-FOO  "), vec!["AS-FOO"]);
    }

    #[test]
    fn test_split_keeps_order_and_duplicates() {
        assert_eq!(tokens("AS-FOO/AS-BAR"), vec!["AS-FOO", "AS-BAR"]);
        assert_eq!(
            tokens("AS-FOO, AS-BAR & AS-BAZ AS-FOO"),
            vec!["AS-FOO", "AS-BAR", "AS-BAZ", "AS-FOO"]
        );
        assert_eq!(tokens("AS-FOO//,,AS-BAR"), vec!["AS-FOO", "AS-BAR"]);
    }

    #[test]
    fn test_registry_tag_is_case_insensitive() {
        assert_eq!(tokens("RIPE:AS-X"), vec!["AS-X"]);
        assert_eq!(tokens("ripe:AS-X"), vec!["AS-X"]);
        assert_eq!(tokens("RIPE::AS-X"), vec!["AS-X"]);
        assert_eq!(tokens("Radb::AS-X"), vec!["AS-X"]);
        assert_eq!(tokens("AS-X"), vec!["AS-X"]);
    }

    #[test]
    fn test_registry_tag_followed_by_space() {
        assert_eq!(tokens("RIPE: AS-FOO"), vec!["AS-FOO"]);
        assert_eq!(tokens("RIPE::AS-FOO ARIN::AS-BAR"), vec!["AS-FOO", "AS-BAR"]);
    }

    #[test]
    fn test_unknown_registry_tag_is_kept() {
        assert_eq!(tokens("NOTAREGISTRY::AS-X"), vec!["NOTAREGISTRY::AS-X"]);
    }

    #[test]
    fn test_hierarchical_set_name_is_kept() {
        assert_eq!(tokens("AS64500:AS-CUSTOMERS"), vec!["AS64500:AS-CUSTOMERS"]);
    }

    #[test]
    fn test_family_tag_is_stripped() {
        assert_eq!(tokens("ipv6:AS-FOO"), vec!["AS-FOO"]);
        assert_eq!(tokens("IPv4:AS-FOO"), vec!["AS-FOO"]);
        assert_eq!(tokens("ipv4:AS-FOO ipv6:AS-FOO-V6"), vec!["AS-FOO", "AS-FOO-V6"]);
    }

    #[test]
    fn test_registry_then_family_tag() {
        assert_eq!(tokens("RIPE::ipv6:AS-FOO"), vec!["AS-FOO"]);
    }

    #[test]
    fn test_tokens_never_empty_or_split_artifacts() {
        let inputs = [
            "AS-A/AS-B",
            " , / & ",
            "RIPE: ",
            "ipv4:",
            "AS-A,\tAS-B\n&AS-C",
            "RADB::AS-A / ipv6:AS-B",
        ];
        for raw in inputs {
            for token in tokens(raw) {
                assert!(!token.is_empty(), "empty token from {:?}", raw);
                assert!(
                    !token.contains(|c: char| c == '/' || c == ',' || c == '&' || c.is_whitespace()),
                    "unsplit token {:?} from {:?}",
                    token,
                    raw
                );
            }
        }
    }

    #[test]
    fn test_only_separators_yields_empty() {
        assert!(tokens(" / , & ").is_empty());
    }

    #[test]
    fn test_no_sources_configured() {
        let normalizer = Normalizer::from_sources("");
        let tokens = normalizer.normalize(Asn(64500), "RIPE::AS-FOO ipv6:AS-BAR");
        let tokens: Vec<_> = tokens.iter().map(AsSetToken::as_str).collect();
        assert_eq!(tokens, vec!["RIPE::AS-FOO", "AS-BAR"]);
    }

    #[test]
    fn test_source_with_regex_metacharacters() {
        let normalizer = Normalizer::from_sources("RIPE.NONAUTH");
        let tokens = normalizer.normalize(Asn(1), "RIPEXNONAUTH::AS-FOO RIPE.NONAUTH::AS-BAR");
        let tokens: Vec<_> = tokens.iter().map(AsSetToken::as_str).collect();
        assert_eq!(tokens, vec!["RIPEXNONAUTH::AS-FOO", "AS-BAR"]);
    }
}
