//! Session name generation.
//!
//! The session name is derived from the short host names so that a glance at
//! `tmux ls` tells which machines a session is connected to.
//!
//! # Example
//!
//! ```
//! use scitsifreine::naming::{session_name, DEFAULT_PREFIX};
//!
//! let name = session_name(&["web1.example.com", "web2.example.com"], DEFAULT_PREFIX);
//! assert_eq!(name, "multissh-web1-web2");
//! ```

/// Prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "multissh";

/// Build a session name from `prefix` and the short name of every host.
///
/// The short name is everything before the first `.`. An empty host list
/// yields the bare prefix.
pub fn session_name<S: AsRef<str>>(hosts: &[S], prefix: &str) -> String {
    let mut name = prefix.to_string();
    for host in hosts {
        let host = host.as_ref();
        let short = host.split('.').next().unwrap_or(host);
        name.push('-');
        name.push_str(short);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hosts_yield_prefix() {
        let hosts: [&str; 0] = [];
        assert_eq!(session_name(&hosts, DEFAULT_PREFIX), "multissh");

        let absent: Option<Vec<String>> = None;
        assert_eq!(
            session_name(&absent.unwrap_or_default(), DEFAULT_PREFIX),
            "multissh"
        );
    }

    #[test]
    fn test_simple_host_names() {
        assert_eq!(
            session_name(&["a", "b", "c"], DEFAULT_PREFIX),
            "multissh-a-b-c"
        );
    }

    #[test]
    fn test_fqdn_hosts_are_shortened() {
        assert_eq!(
            session_name(&["a.x.com", "b.y.com"], DEFAULT_PREFIX),
            "multissh-a-b"
        );
        assert_eq!(
            session_name(
                &["host1.example.com", "host2.example.com", "host3.example.com"],
                DEFAULT_PREFIX
            ),
            "multissh-host1-host2-host3"
        );
    }

    #[test]
    fn test_custom_prefix_and_odd_hosts() {
        assert_eq!(session_name(&["admin@db", ".hidden"], "ops"), "ops-admin@db-");
    }

    #[test]
    fn test_name_is_stable() {
        let hosts = vec!["one.a".to_string(), "two.b".to_string()];
        assert_eq!(
            session_name(&hosts, DEFAULT_PREFIX),
            session_name(&hosts, DEFAULT_PREFIX)
        );
    }
}
