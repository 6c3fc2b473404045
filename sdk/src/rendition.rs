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

//! Rendition routes: URL patterns served with a manifest they are a
//! rendition of.

use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    assertions::Relationship,
    http::restricted::{validate_remote_url, HostPattern},
    Error, Result,
};

const WILDCARD: char = '*';

/// A URL template in which `*` matches any run of characters.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RoutePattern(String);

impl RoutePattern {
    /// Parses a pattern such as `https://cdn.example.com/video/*/720p.mp4`.
    ///
    /// With each `*` filled in, the pattern must be an `https` URL with a
    /// host.
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = || Error::InvalidRoutePattern(pattern.to_string());

        if pattern.is_empty() || pattern.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        if pattern.contains("**") {
            return Err(invalid());
        }

        let sample = pattern.replace(WILDCARD, "x");
        let url = Url::parse(&sample).map_err(|_| invalid())?;
        if url.scheme() != "https" || url.host_str().map_or(true, str::is_empty) {
            return Err(invalid());
        }

        Ok(Self(pattern.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `url` matches the whole pattern.
    pub fn matches(&self, url: &str) -> bool {
        let mut parts = self.0.split(WILDCARD);
        let Some(first) = parts.next() else {
            return false;
        };
        let Some(mut rest) = url.strip_prefix(first) else {
            return false;
        };

        let parts: Vec<&str> = parts.collect();
        let Some((last, middle)) = parts.split_last() else {
            // no wildcard
            return rest.is_empty();
        };

        for part in middle {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
        rest.ends_with(last)
    }

    /// Number of literal characters; more literal patterns are more
    /// specific.
    pub fn specificity(&self) -> usize {
        self.0.chars().filter(|c| *c != WILDCARD).count()
    }
}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RoutePattern {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RoutePattern {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let pattern = String::deserialize(deserializer)?;
        RoutePattern::parse(&pattern).map_err(serde::de::Error::custom)
    }
}

/// A route pattern associated with the manifest its URLs are renditions
/// of.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RenditionRoute {
    pub asset_id: String,
    pub manifest_url: String,
    pub pattern: RoutePattern,
    pub relationship: Relationship,
}

/// Storage for rendition routes, owned by the caller.
pub trait RenditionStore: Send + Sync {
    /// Stores `route`, replacing any route with the same pattern.
    fn insert(&mut self, route: RenditionRoute) -> Result<()>;

    /// Finds the most specific route matching `url`.
    fn resolve(&self, url: &str) -> Option<RenditionRoute>;

    /// Routes registered for `asset_id`.
    fn routes_for(&self, asset_id: &str) -> Vec<RenditionRoute>;
}

/// A [`RenditionStore`] held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRenditionStore {
    routes: Vec<RenditionRoute>,
}

impl InMemoryRenditionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RenditionStore for InMemoryRenditionStore {
    fn insert(&mut self, route: RenditionRoute) -> Result<()> {
        self.routes.retain(|r| r.pattern != route.pattern);
        self.routes.push(route);
        Ok(())
    }

    fn resolve(&self, url: &str) -> Option<RenditionRoute> {
        // `max_by_key` keeps the last maximum, so later registrations win ties
        self.routes
            .iter()
            .filter(|r| r.pattern.matches(url))
            .max_by_key(|r| r.pattern.specificity())
            .cloned()
    }

    fn routes_for(&self, asset_id: &str) -> Vec<RenditionRoute> {
        self.routes
            .iter()
            .filter(|r| r.asset_id == asset_id)
            .cloned()
            .collect()
    }
}

/// Associates every route pattern with `manifest_url` under `renditionOf`.
///
/// The manifest URL must pass the network boundary and every pattern must
/// parse; nothing is stored otherwise. Returns the number of distinct
/// routes stored.
pub fn register_rendition(
    store: &mut dyn RenditionStore,
    asset_id: &str,
    manifest_url: &str,
    routes: &[&str],
) -> Result<usize> {
    register_rendition_with_hosts(store, asset_id, manifest_url, routes, &[])
}

/// [`register_rendition`] with a host allow-list for the manifest URL.
pub fn register_rendition_with_hosts(
    store: &mut dyn RenditionStore,
    asset_id: &str,
    manifest_url: &str,
    routes: &[&str],
    allowed_hosts: &[HostPattern],
) -> Result<usize> {
    if asset_id.trim().is_empty() {
        return Err(Error::BadParam("asset id is empty".into()));
    }
    if routes.is_empty() {
        return Err(Error::BadParam("no route patterns".into()));
    }
    let manifest_url = validate_remote_url(manifest_url, allowed_hosts)?;

    let mut patterns: Vec<RoutePattern> = Vec::with_capacity(routes.len());
    for route in routes {
        let pattern = RoutePattern::parse(route)?;
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    }

    let count = patterns.len();
    for pattern in patterns {
        store.insert(RenditionRoute {
            asset_id: asset_id.to_string(),
            manifest_url: manifest_url.to_string(),
            pattern,
            relationship: Relationship::RenditionOf,
        })?;
    }

    debug!("registered {count} rendition routes for {asset_id} -> {manifest_url}");
    Ok(count)
}

#[cfg(test)]
pub mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn pattern_matching() {
        let pattern = RoutePattern::parse("https://cdn.example.com/v/*/720p.mp4").unwrap();
        assert!(pattern.matches("https://cdn.example.com/v/abc/720p.mp4"));
        assert!(pattern.matches("https://cdn.example.com/v/a/b/720p.mp4"));
        assert!(!pattern.matches("https://cdn.example.com/v/abc/1080p.mp4"));
        assert!(!pattern.matches("https://cdn.example.com/v/abc/720p.mp4?x=1"));

        let exact = RoutePattern::parse("https://cdn.example.com/a.mp4").unwrap();
        assert!(exact.matches("https://cdn.example.com/a.mp4"));
        assert!(!exact.matches("https://cdn.example.com/a.mp4.bak"));

        let hosts = RoutePattern::parse("https://*.cdn.example.com/*").unwrap();
        assert!(hosts.matches("https://edge1.cdn.example.com/any/path"));
        assert!(!hosts.matches("https://cdn.example.org/any/path"));

        // the literal after a wildcard must not overlap the one before it
        let tight = RoutePattern::parse("https://a.example.com/x*x").unwrap();
        assert!(!tight.matches("https://a.example.com/x"));
        assert!(tight.matches("https://a.example.com/xx"));
    }

    #[test]
    fn invalid_patterns() {
        for pattern in [
            "",
            "cdn.example.com/*",
            "http://cdn.example.com/*",
            "data:text/plain,*",
            "https://cdn.example.com/a b/*",
            "https://cdn.example.com/**",
        ] {
            let err = RoutePattern::parse(pattern).unwrap_err();
            assert_eq!(err.code(), crate::error::INVALID_REFERENCE, "{pattern}");
        }
    }

    #[test]
    fn register_and_resolve() {
        let mut store = InMemoryRenditionStore::new();
        let count = register_rendition(
            &mut store,
            "asset-42",
            "https://manifests.example.com/asset-42.c2pa",
            &[
                "https://cdn.example.com/asset-42/*",
                "https://cdn.example.com/asset-42/*/720p.mp4",
                "https://cdn.example.com/asset-42/*",
            ],
        )
        .unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.len(), 2);

        register_rendition(
            &mut store,
            "asset-43",
            "https://manifests.example.com/asset-43.c2pa",
            &["https://cdn.example.com/asset-42/hls/720p.mp4"],
        )
        .unwrap();

        let route = store
            .resolve("https://cdn.example.com/asset-42/dash/720p.mp4")
            .unwrap();
        assert_eq!(route.pattern.as_str(), "https://cdn.example.com/asset-42/*/720p.mp4");
        assert_eq!(route.relationship, Relationship::RenditionOf);
        assert_eq!(route.manifest_url, "https://manifests.example.com/asset-42.c2pa");

        let route = store
            .resolve("https://cdn.example.com/asset-42/hls/720p.mp4")
            .unwrap();
        assert_eq!(route.asset_id, "asset-43");

        let route = store.resolve("https://cdn.example.com/asset-42/poster.jpg").unwrap();
        assert_eq!(route.pattern.as_str(), "https://cdn.example.com/asset-42/*");

        assert!(store.resolve("https://cdn.example.com/other.mp4").is_none());
        assert_eq!(store.routes_for("asset-42").len(), 2);
    }

    #[test]
    fn ties_go_to_the_latest_registration() {
        let mut store = InMemoryRenditionStore::new();
        for (asset_id, pattern) in [
            ("old", "https://cdn.example.com/*/a.mp4"),
            ("new", "https://cdn.example.com/v/*.mp4"),
        ] {
            register_rendition(
                &mut store,
                asset_id,
                &format!("https://manifests.example.com/{asset_id}.c2pa"),
                &[pattern],
            )
            .unwrap();
        }

        let route = store.resolve("https://cdn.example.com/v/a.mp4").unwrap();
        assert_eq!(route.asset_id, "new");

        // registering a pattern again makes it the latest
        register_rendition(
            &mut store,
            "old",
            "https://manifests.example.com/old.c2pa",
            &["https://cdn.example.com/*/a.mp4"],
        )
        .unwrap();
        let route = store.resolve("https://cdn.example.com/v/a.mp4").unwrap();
        assert_eq!(route.asset_id, "old");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn nothing_stored_on_error() {
        let mut store = InMemoryRenditionStore::new();

        let err = register_rendition(
            &mut store,
            "asset-42",
            "https://192.168.1.10/asset-42.c2pa",
            &["https://cdn.example.com/asset-42/*"],
        )
        .unwrap_err();
        assert_eq!(err.code(), crate::error::URL_DISALLOWED);

        let err = register_rendition(
            &mut store,
            "asset-42",
            "https://manifests.example.com/asset-42.c2pa",
            &["https://cdn.example.com/asset-42/*", "ftp://cdn.example.com/*"],
        )
        .unwrap_err();
        assert_eq!(err.code(), crate::error::INVALID_REFERENCE);

        let err = register_rendition_with_hosts(
            &mut store,
            "asset-42",
            "https://manifests.example.com/asset-42.c2pa",
            &["https://cdn.example.com/asset-42/*"],
            &[HostPattern::parse("*.example.org").unwrap()],
        )
        .unwrap_err();
        assert_eq!(err.code(), crate::error::URL_DISALLOWED);

        let err = register_rendition(
            &mut store,
            " ",
            "https://m.example.com/a.c2pa",
            &["https://a.example.com/*"],
        )
        .unwrap_err();
        assert_eq!(err.code(), crate::error::BAD_PARAM);

        assert!(store.is_empty());
    }

    #[test]
    fn serde_form() {
        let route: RenditionRoute = serde_json::from_str(
            r#"{"asset_id": "a", "manifest_url": "https://m.example.com/a.c2pa",
                "pattern": "https://cdn.example.com/a/*", "relationship": "renditionOf"}"#,
        )
        .unwrap();
        assert!(route.pattern.matches("https://cdn.example.com/a/1.mp4"));

        assert!(serde_json::from_str::<RoutePattern>(r#""ftp://x/*""#).is_err());
    }
}
