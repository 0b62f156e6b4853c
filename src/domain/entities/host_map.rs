//! Mapping from request host to site prefix.

use std::collections::{BTreeSet, HashMap};

/// Errors raised while building a [`HostMap`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostMapError {
    #[error("malformed host mapping '{0}', expected 'host=prefix'")]
    Malformed(String),

    #[error("invalid prefix '{0}': must be non-empty without ':' or whitespace")]
    InvalidPrefix(String),
}

/// Partial function from a request `Host` header value to a site prefix.
///
/// Hosts are matched verbatim, port included. A port suffix configured at
/// startup is appended to every host, so `tribuna.com` with suffix `:8080`
/// matches a `Host: tribuna.com:8080` header.
#[derive(Debug, Clone, Default)]
pub struct HostMap {
    hosts: HashMap<String, String>,
}

impl HostMap {
    /// Builds a map from `(host, prefix)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`HostMapError::InvalidPrefix`] if a prefix is empty or contains
    /// `:` or whitespace.
    pub fn from_pairs<I, H, P>(pairs: I, port_suffix: &str) -> Result<Self, HostMapError>
    where
        I: IntoIterator<Item = (H, P)>,
        H: AsRef<str>,
        P: Into<String>,
    {
        let mut hosts = HashMap::new();
        for (host, prefix) in pairs {
            let prefix = prefix.into();
            if !is_valid_prefix(&prefix) {
                return Err(HostMapError::InvalidPrefix(prefix));
            }
            hosts.insert(format!("{}{}", host.as_ref(), port_suffix), prefix);
        }
        Ok(Self { hosts })
    }

    /// Parses the `HOST_PREFIXES` format: `host=prefix,host=prefix,...`.
    ///
    /// # Errors
    ///
    /// Returns [`HostMapError::Malformed`] for an item without `=` or with an
    /// empty host, and [`HostMapError::InvalidPrefix`] for a bad prefix.
    pub fn parse(spec: &str, port_suffix: &str) -> Result<Self, HostMapError> {
        let mut pairs = Vec::new();
        for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (host, prefix) = item
                .split_once('=')
                .ok_or_else(|| HostMapError::Malformed(item.to_string()))?;
            let host = host.trim();
            if host.is_empty() {
                return Err(HostMapError::Malformed(item.to_string()));
            }
            pairs.push((host.to_string(), prefix.trim().to_string()));
        }
        Self::from_pairs(pairs, port_suffix)
    }

    /// Returns the site prefix for a host, if one is configured.
    pub fn prefix_for(&self, host: &str) -> Option<&str> {
        self.hosts.get(host).map(String::as_str)
    }

    /// Distinct prefixes, used as the known-prefix set of the table loader.
    pub fn prefixes(&self) -> BTreeSet<String> {
        self.hosts.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && !prefix.contains(':') && !prefix.contains(char::is_whitespace)
}
