//! Scan target parsing and resolution.
//!
//! A target is either an IP literal (IPv4 or IPv6) or a hostname. Hostnames
//! are resolved exactly once, before any probe is launched.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A scan target that has been resolved to an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

impl ScanTarget {
    pub fn new(original: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            original: original.into(),
            ip,
        }
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

/// A syntactically valid, not yet resolved, host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// An IP literal.
    Ip(IpAddr),
    /// A hostname to be resolved.
    Hostname(String),
}

impl TargetSpec {
    /// Parse a host string, rejecting anything that is neither an IP literal
    /// nor a well-formed hostname.
    pub fn parse(s: &str) -> ConfigResult<Self> {
        let s = s.trim();

        // Bracketed IPv6 literals are accepted as a convenience.
        let unbracketed = s
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(s);

        if let Ok(ip) = unbracketed.parse::<IpAddr>() {
            return Ok(Self::Ip(ip));
        }

        if is_valid_hostname(s) {
            return Ok(Self::Hostname(s.to_string()));
        }

        Err(ConfigError::InvalidTarget(s.to_string()))
    }

    /// Resolve to a single address. The first address the resolver returns wins.
    pub async fn resolve(&self) -> ConfigResult<ScanTarget> {
        match self {
            Self::Ip(ip) => Ok(ScanTarget::new(ip.to_string(), *ip)),
            Self::Hostname(hostname) => {
                let resolver =
                    TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

                let response = resolver.lookup_ip(hostname.as_str()).await.map_err(|e| {
                    ConfigError::DnsResolutionFailed {
                        host: hostname.clone(),
                        reason: e.to_string(),
                    }
                })?;

                let ip = response
                    .iter()
                    .next()
                    .ok_or_else(|| ConfigError::NoAddressesFound(hostname.clone()))?;
                debug!(host = %hostname, %ip, "resolved target");

                Ok(ScanTarget::new(hostname.clone(), ip))
            }
        }
    }
}

impl FromStr for TargetSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => write!(f, "{}", ip),
            Self::Hostname(hostname) => write!(f, "{}", hostname),
        }
    }
}

/// Check if a string is a valid RFC 1123 hostname.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    // A trailing dot marks a fully qualified name.
    let s = s.strip_suffix('.').unwrap_or(s);

    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.starts_with(|c: char| c.is_ascii_alphanumeric())
            && label.ends_with(|c: char| c.is_ascii_alphanumeric())
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_parse_ipv4() {
        let spec = TargetSpec::parse("192.168.1.1").unwrap();
        assert!(matches!(spec, TargetSpec::Ip(IpAddr::V4(_))));
    }

    #[test]
    fn test_parse_ipv6() {
        assert!(matches!(
            TargetSpec::parse("::1").unwrap(),
            TargetSpec::Ip(IpAddr::V6(_))
        ));
        assert!(matches!(
            TargetSpec::parse("[::1]").unwrap(),
            TargetSpec::Ip(IpAddr::V6(_))
        ));
    }

    #[test]
    fn test_parse_hostname() {
        let spec = TargetSpec::parse("example.com").unwrap();
        assert_eq!(spec, TargetSpec::Hostname("example.com".to_string()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            TargetSpec::parse("not a host!"),
            Err(ConfigError::InvalidTarget(_))
        ));
        assert!(TargetSpec::parse("").is_err());
        assert!(TargetSpec::parse("192.168.1.0/24").is_err());
    }

    #[test]
    fn test_valid_hostname() {
        assert!(is_valid_hostname("example.com"));
        assert!(is_valid_hostname("example.com."));
        assert!(is_valid_hostname("my-server"));
        assert!(!is_valid_hostname("-invalid.com"));
        assert!(!is_valid_hostname("a..b"));
    }

    #[tokio::test]
    async fn test_resolve_ip_literal_skips_dns() {
        let target = TargetSpec::parse("127.0.0.1").unwrap().resolve().await.unwrap();
        assert_eq!(target.ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(target.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_target_display_with_hostname() {
        let target = ScanTarget::new("localhost", IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(target.to_string(), "localhost (127.0.0.1)");
    }
}
