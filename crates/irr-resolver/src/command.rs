//! Command-line assembly for the expansion tool

use crate::config::ResolverConfig;
use crate::types::AddressFamily;

/// Name of the JSON list the tool is asked to emit
pub const PREFIX_LIST_NAME: &str = "prefix_list";

/// Number of trailing elements (`-l`, list name, token) that extra arguments precede
const TAIL_LEN: usize = 3;

/// Build the full argv (binary first) to expand `token` for `family`
///
/// Produces `bgpq3 -h <host> -S <sources> -4|-6 -A -j [extra...] -l prefix_list <token>`.
pub fn build_command(token: &str, family: AddressFamily, config: &ResolverConfig) -> Vec<String> {
    let mut command = vec![
        config.binary_path.clone(),
        "-h".to_string(),
        config.host.clone(),
        "-S".to_string(),
        config.sources.clone(),
        family.flag().to_string(),
        "-A".to_string(),
        "-j".to_string(),
        "-l".to_string(),
        PREFIX_LIST_NAME.to_string(),
        token.to_string(),
    ];

    let extra = config.args.for_family(family);
    if !extra.is_empty() {
        let index = command.len() - TAIL_LEN;
        command.splice(index..index, extra.iter().cloned());
    }

    command
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ResolverConfig {
        ResolverConfig::new("/usr/bin/bgpq3", "rr.ntt.net", "RIPE,ARIN")
    }

    #[test]
    fn test_base_command() {
        let command = build_command("AS-FOO", AddressFamily::Ipv6, &config());
        assert_eq!(
            command,
            vec![
                "/usr/bin/bgpq3",
                "-h",
                "rr.ntt.net",
                "-S",
                "RIPE,ARIN",
                "-6",
                "-A",
                "-j",
                "-l",
                "prefix_list",
                "AS-FOO",
            ]
        );
    }

    #[test]
    fn test_extra_args_precede_list_name_ipv4() {
        let config = config()
            .with_args(AddressFamily::Ipv4, ["-r", "8", "-R", "24"])
            .with_args(AddressFamily::Ipv6, ["-m", "48"]);

        let command = build_command("AS-FOO", AddressFamily::Ipv4, &config);
        assert_eq!(
            command,
            vec![
                "/usr/bin/bgpq3",
                "-h",
                "rr.ntt.net",
                "-S",
                "RIPE,ARIN",
                "-4",
                "-A",
                "-j",
                "-r",
                "8",
                "-R",
                "24",
                "-l",
                "prefix_list",
                "AS-FOO",
            ]
        );
    }

    #[test]
    fn test_extra_args_precede_list_name_ipv6() {
        let config = config()
            .with_args(AddressFamily::Ipv4, ["-r", "8", "-R", "24"])
            .with_args(AddressFamily::Ipv6, ["-m", "48"]);

        let command = build_command("AS-FOO", AddressFamily::Ipv6, &config);
        let n = command.len();
        assert_eq!(&command[n - 5..], ["-m", "48", "-l", "prefix_list", "AS-FOO"]);
        assert_eq!(command[5], "-6");
        assert!(!command.iter().any(|arg| arg == "-R"));
    }
}
