// Copyright 2025 The c2pa-lineage Authors. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! The network boundary.
//!
//! Remote URLs must use `https`, must name a public host, and must match
//! the configured allow-list when there is one. Checks happen before any
//! network I/O.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use async_trait::async_trait;
use http::{Request, Response, Uri};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::{Host, Url};

use crate::{
    http::{AsyncGenericResolver, AsyncHttpResolver, HttpResolverError},
    Error,
};

/// Wraps an [`AsyncHttpResolver`] and rejects every request whose URI does
/// not pass [`validate_remote_url`].
#[derive(Debug)]
pub struct RestrictedResolver<T> {
    inner: T,
    allowed_hosts: Vec<HostPattern>,
}

impl<T> RestrictedResolver<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            allowed_hosts: Vec::new(),
        }
    }

    pub fn with_allowed_hosts(inner: T, allowed_hosts: Vec<HostPattern>) -> Self {
        Self {
            inner,
            allowed_hosts,
        }
    }

    pub fn allowed_hosts(&self) -> &[HostPattern] {
        &self.allowed_hosts
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl Default for RestrictedResolver<AsyncGenericResolver> {
    fn default() -> Self {
        Self::new(AsyncGenericResolver::new())
    }
}

#[async_trait]
impl<T: AsyncHttpResolver> AsyncHttpResolver for RestrictedResolver<T> {
    async fn http_resolve_async(
        &self,
        request: Request<Vec<u8>>,
    ) -> Result<Response<Vec<u8>>, HttpResolverError> {
        let uri = request.uri().to_string();
        match validate_remote_url(&uri, self.allowed_hosts()) {
            Ok(_) => self.inner.http_resolve_async(request).await,
            Err(err) => {
                debug!("{err}");
                Err(HttpResolverError::UriDisallowed { uri })
            }
        }
    }
}

/// A host pattern for the allow-list, such as `*.example.com` or
/// `https://cdn.example.com`.
///
/// A leading `*.` matches exactly one or more labels in front of the
/// suffix, never the bare suffix. A pattern with a scheme also requires the
/// scheme to match.
#[derive(Debug, Clone, PartialEq)]
pub struct HostPattern {
    uri: Uri,
}

impl HostPattern {
    pub fn new(uri: Uri) -> Self {
        Self { uri }
    }

    /// Parses a pattern string.
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let uri = pattern
            .parse::<Uri>()
            .map_err(|e| Error::InvalidSettings(format!("host pattern {pattern:?}: {e}")))?;
        if uri.host().is_none() {
            return Err(Error::InvalidSettings(format!(
                "host pattern {pattern:?} has no host"
            )));
        }
        Ok(Self { uri })
    }

    /// Returns `true` if the URL's scheme and host are covered by this
    /// pattern.
    pub fn matches(&self, url: &Url) -> bool {
        let Some(allowed_host_pattern) = self.uri.host() else {
            return false;
        };
        let Some(host) = url.host_str() else {
            return false;
        };

        // If there's a wildcard, do a suffix match, otherwise do an exact match.
        let host_allowed = if let Some(suffix) = allowed_host_pattern.strip_prefix("*.") {
            let host = host.to_ascii_lowercase();
            let suffix = suffix.to_ascii_lowercase();

            if host.len() <= suffix.len() || !host.ends_with(&suffix) {
                false
            } else {
                // Make sure there is a component in place of the wildcard.
                host.as_bytes()[host.len() - suffix.len() - 1] == b'.'
            }
        } else {
            allowed_host_pattern.eq_ignore_ascii_case(host)
        };

        host_allowed
            && self
                .uri
                .scheme_str()
                .map_or(true, |scheme| scheme.eq_ignore_ascii_case(url.scheme()))
    }
}

impl Serialize for HostPattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.uri.to_string())
    }
}

impl<'de> Deserialize<'de> for HostPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        HostPattern::parse(&string).map_err(serde::de::Error::custom)
    }
}

/// Checks a remote URL against the network boundary and returns it parsed.
///
/// The URL must be `https`, must not name `localhost` or an IP literal in
/// a loopback, private, link-local, unspecified, multicast, broadcast,
/// shared, reserved or documentation range, and must match one of
/// `allowed_hosts` unless that list is empty.
pub fn validate_remote_url(url: &str, allowed_hosts: &[HostPattern]) -> crate::Result<Url> {
    let disallowed = |reason: &str| Error::UrlDisallowed {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(url).map_err(|e| disallowed(&e.to_string()))?;

    if parsed.scheme() != "https" {
        return Err(disallowed("only https URLs are permitted"));
    }

    match parsed.host() {
        None => return Err(disallowed("URL has no host")),
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            if domain == "localhost" || domain.ends_with(".localhost") {
                return Err(disallowed("localhost is not permitted"));
            }
        }
        Some(Host::Ipv4(ip)) => {
            if is_special_ip(IpAddr::V4(ip)) {
                return Err(disallowed("non-public IP address"));
            }
        }
        Some(Host::Ipv6(ip)) => {
            if is_special_ip(IpAddr::V6(ip)) {
                return Err(disallowed("non-public IP address"));
            }
        }
    }

    if !allowed_hosts.is_empty() && !allowed_hosts.iter().any(|p| p.matches(&parsed)) {
        return Err(disallowed("host is not in the allowed list"));
    }

    Ok(parsed)
}

fn is_special_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ip) => is_special_ipv4(ip),
        IpAddr::V6(ip) => match ip.to_ipv4_mapped() {
            Some(mapped) => is_special_ipv4(mapped),
            None => is_special_ipv6(ip),
        },
    }
}

fn is_special_ipv4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_multicast()
        || ip.is_broadcast()
        || ip.is_documentation()
        // 0.0.0.0/8
        || a == 0
        // shared address space, 100.64.0.0/10
        || (a == 100 && (64..128).contains(&b))
        // benchmarking, 198.18.0.0/15
        || (a == 198 && (b == 18 || b == 19))
        // reserved, 240.0.0.0/4
        || a >= 240
}

fn is_special_ipv6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || ip.is_multicast()
        // unique local, fc00::/7
        || (first & 0xfe00) == 0xfc00
        // link-local, fe80::/10
        || (first & 0xffc0) == 0xfe80
        // documentation, 2001:db8::/32
        || (first == 0x2001 && ip.segments()[1] == 0x0db8)
}
