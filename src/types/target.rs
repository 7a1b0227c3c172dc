//! Scan target resolution.
//!
//! A target is given as a literal IPv4/IPv6 address or a hostname. Literals
//! are used as-is; hostnames go through a [`HostLookup`], which is DNS via
//! `trust-dns-resolver` in production.

use crate::error::ResolutionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use tracing::{debug, info};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::{system_conf, TokioAsyncResolver};

/// A single scan target that has been resolved to an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

impl ScanTarget {
    /// Create a new scan target.
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

/// Forward name lookup.
///
/// Returns every address the name maps to, in resolver order. The error
/// string is a human-readable diagnostic.
#[async_trait]
pub trait HostLookup: Send + Sync {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, String>;
}

/// DNS lookup backed by `trust-dns-resolver`.
pub struct DnsLookup {
    resolver: TokioAsyncResolver,
}

impl DnsLookup {
    /// Build a resolver from the system configuration (`/etc/resolv.conf`
    /// or the platform equivalent), falling back to the library defaults.
    pub fn from_system() -> Self {
        let (config, opts) = system_conf::read_system_conf().unwrap_or_else(|e| {
            debug!("system resolver config unavailable ({e}), using defaults");
            (ResolverConfig::default(), ResolverOpts::default())
        });

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

#[async_trait]
impl HostLookup for DnsLookup {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, String> {
        let response = self
            .resolver
            .lookup_ip(host)
            .await
            .map_err(|e| e.to_string())?;

        Ok(response.iter().collect())
    }
}

/// Resolve `target` with the system DNS resolver.
pub async fn resolve(target: &str) -> Result<ScanTarget, ResolutionError> {
    if let Some(ip) = parse_literal(target) {
        return Ok(ScanTarget::new(target.trim(), ip));
    }
    resolve_with(target, &DnsLookup::from_system()).await
}

/// Resolve `target`, consulting `lookup` only when it is not an address
/// literal. The first address returned by the lookup wins.
pub async fn resolve_with<L>(target: &str, lookup: &L) -> Result<ScanTarget, ResolutionError>
where
    L: HostLookup + ?Sized,
{
    let host = target.trim();

    if let Some(ip) = parse_literal(host) {
        return Ok(ScanTarget::new(host, ip));
    }

    if !is_valid_hostname(host) {
        return Err(ResolutionError::new(target, "not an IP address or valid hostname"));
    }

    let ip = lookup
        .lookup(host)
        .await
        .map_err(|reason| ResolutionError::new(target, reason))?
        .into_iter()
        .next()
        .ok_or_else(|| ResolutionError::new(target, "no addresses found"))?;

    info!("{host} resolved to {ip}");
    Ok(ScanTarget::new(host, ip))
}

/// Parse an IPv4 or IPv6 literal, allowing `[v6]` brackets.
fn parse_literal(s: &str) -> Option<IpAddr> {
    let s = s.trim();
    let s = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(s);
    s.parse().ok()
}

/// Cheap screen before a lookup: non-empty, within the DNS name length
/// limit, and free of whitespace or control characters. Label syntax is
/// left to the resolver, which also knows `/etc/hosts` aliases.
fn is_valid_hostname(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 253
        && !s.chars().any(|c| c.is_whitespace() || c.is_control())
}
