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

//! Manifest references and their resolution to parsed manifests.

use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    http::restricted::{validate_remote_url, HostPattern},
    manifest::Manifest,
    parser::parse_with_limit,
    resolver::{fetch_with_timeout, ManifestResolver},
    settings::Settings,
    Error, Result,
};

/// Where a manifest comes from.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ManifestReference {
    /// A manifest store passed by value.
    Inline(#[serde(with = "crate::utils::base64::bytes")] Vec<u8>),

    /// An asset whose manifest is found through its `Link` header, or whose
    /// body is itself a manifest store.
    AssetUrl(String),

    /// A `.c2pa` sidecar next to the asset.
    SidecarUrl(String),

    /// A manifest store served directly.
    ManifestUrl(String),
}

impl ManifestReference {
    /// The remote URL of this reference, if it has one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Inline(_) => None,
            Self::AssetUrl(url) | Self::SidecarUrl(url) | Self::ManifestUrl(url) => Some(url),
        }
    }
}

/// Resolves `reference` to its active manifest.
///
/// Every URL, including one found in a `Link` header, is checked against
/// the network boundary of `settings` before it is fetched.
pub async fn resolve_reference(
    reference: &ManifestReference,
    resolver: &dyn ManifestResolver,
    settings: &Settings,
) -> Result<Manifest> {
    resolve_with_policy(reference, resolver, &FetchPolicy::from_settings(settings)).await
}

/// The limits applied to remote fetches.
#[derive(Clone, Debug)]
pub(crate) struct FetchPolicy {
    pub allowed_hosts: Vec<HostPattern>,
    pub timeout_ms: u64,
    pub max_size: usize,
}

impl FetchPolicy {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        Self {
            allowed_hosts: settings.network.allowed_hosts.clone(),
            timeout_ms: settings.lineage.fetch_timeout_ms,
            max_size: settings.core.max_manifest_size,
        }
    }

    fn checked_url(&self, url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| Error::InvalidReference(format!("{url}: {e}")))?;
        validate_remote_url(url, &self.allowed_hosts)
    }
}

pub(crate) async fn resolve_with_policy(
    reference: &ManifestReference,
    resolver: &dyn ManifestResolver,
    policy: &FetchPolicy,
) -> Result<Manifest> {
    let url = match reference {
        ManifestReference::Inline(bytes) => {
            if bytes.is_empty() {
                return Err(Error::InvalidReference("inline manifest is empty".into()));
            }
            return parse_with_limit(bytes, policy.max_size);
        }
        ManifestReference::AssetUrl(url)
        | ManifestReference::SidecarUrl(url)
        | ManifestReference::ManifestUrl(url) => policy.checked_url(url)?,
    };

    let fetched = fetch_with_timeout(resolver, &url, policy.timeout_ms).await?;

    match reference {
        ManifestReference::AssetUrl(_) => match &fetched.manifest_link {
            Some(link) => {
                debug!("following manifest link {link} from {url}");
                let link = policy.checked_url(link.as_str())?;
                let manifest = fetch_with_timeout(resolver, &link, policy.timeout_ms).await?;
                parse_with_limit(&manifest.body, policy.max_size)
            }
            None => parse_with_limit(&fetched.body, policy.max_size).map_err(|e| match e {
                Error::ManifestTooLarge { .. } => e,
                e => Error::InvalidStructure(format!(
                    "asset {url} has no manifest link and is not a manifest store: {e}"
                )),
            }),
        },
        _ => parse_with_limit(&fetched.body, policy.max_size),
    }
}

#[cfg(test)]
pub mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::{
        resolver::{tests::StaticHttp, HttpManifestResolver},
        utils::test::{derived_manifest, sample_manifest},
    };

    fn resolver(http: StaticHttp) -> HttpManifestResolver<StaticHttp> {
        HttpManifestResolver::new(http, Vec::new())
    }

    #[tokio::test]
    async fn inline() {
        let signed = sample_manifest();
        let manifest = resolve_reference(
            &ManifestReference::Inline(signed.bytes.clone()),
            &resolver(StaticHttp::default()),
            &Settings::default(),
        )
        .await
        .unwrap();
        assert_eq!(manifest, signed.manifest);

        let err = resolve_reference(
            &ManifestReference::Inline(Vec::new()),
            &resolver(StaticHttp::default()),
            &Settings::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), crate::error::INVALID_REFERENCE);
    }

    #[tokio::test]
    async fn sidecar_and_manifest_urls() {
        let (parent, child) = derived_manifest();
        let http = StaticHttp::default()
            .serve("https://cdn.example.com/parent.c2pa", &parent.bytes)
            .serve("https://cdn.example.com/child.c2pa", &child.bytes);
        let resolver = resolver(http);

        let manifest = resolve_reference(
            &ManifestReference::SidecarUrl("https://cdn.example.com/parent.c2pa".into()),
            &resolver,
            &Settings::default(),
        )
        .await
        .unwrap();
        assert_eq!(manifest.manifest_hash(), parent.manifest.manifest_hash());

        let manifest = resolve_reference(
            &ManifestReference::ManifestUrl("https://cdn.example.com/child.c2pa".into()),
            &resolver,
            &Settings::default(),
        )
        .await
        .unwrap();
        assert_eq!(manifest.manifest_hash(), child.manifest.manifest_hash());
        assert_eq!(manifest.embedded_manifests().len(), 1);
    }

    #[tokio::test]
    async fn asset_url_follows_link() {
        let signed = sample_manifest();
        let http = StaticHttp::default()
            .serve_with_link(
                "https://cdn.example.com/video.mp4",
                r#"<https://manifests.example.com/video.c2pa>; rel="c2pa-manifest""#,
                b"not a manifest",
            )
            .serve("https://manifests.example.com/video.c2pa", &signed.bytes)
            .serve("https://cdn.example.com/bare.c2pa", &signed.bytes)
            .serve("https://cdn.example.com/plain.mp4", b"just video");
        let resolver = resolver(http);
        let settings = Settings::default();

        let manifest = resolve_reference(
            &ManifestReference::AssetUrl("https://cdn.example.com/video.mp4".into()),
            &resolver,
            &settings,
        )
        .await
        .unwrap();
        assert_eq!(manifest, signed.manifest);

        // a body that is a manifest store is parsed directly
        let manifest = resolve_reference(
            &ManifestReference::AssetUrl("https://cdn.example.com/bare.c2pa".into()),
            &resolver,
            &settings,
        )
        .await
        .unwrap();
        assert_eq!(manifest, signed.manifest);

        let err = resolve_reference(
            &ManifestReference::AssetUrl("https://cdn.example.com/plain.mp4".into()),
            &resolver,
            &settings,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), crate::error::INVALID_STRUCTURE);
    }

    #[tokio::test]
    async fn link_target_is_checked() {
        let signed = sample_manifest();
        let http = StaticHttp::default()
            .serve_with_link(
                "https://cdn.example.com/video.mp4",
                r#"<http://169.254.169.254/latest>; rel="c2pa-manifest""#,
                &signed.bytes,
            );

        let err = resolve_reference(
            &ManifestReference::AssetUrl("https://cdn.example.com/video.mp4".into()),
            &resolver(http),
            &Settings::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), crate::error::URL_DISALLOWED);
    }

    #[tokio::test]
    async fn urls_are_checked_before_fetching() {
        let settings = Settings {
            network: crate::settings::Network {
                allowed_hosts: vec![HostPattern::parse("*.example.org").unwrap()],
            },
            ..Default::default()
        };

        for (url, code) in [
            ("not a url", crate::error::INVALID_REFERENCE),
            ("http://cdn.example.org/a.c2pa", crate::error::URL_DISALLOWED),
            ("https://localhost/a.c2pa", crate::error::URL_DISALLOWED),
            ("https://10.0.0.1/a.c2pa", crate::error::URL_DISALLOWED),
            ("https://cdn.example.com/a.c2pa", crate::error::URL_DISALLOWED),
        ] {
            let err = resolve_reference(
                &ManifestReference::ManifestUrl(url.into()),
                &resolver(StaticHttp::default()),
                &settings,
            )
            .await
            .unwrap_err();
            assert_eq!(err.code(), code, "{url}");
        }
    }

    #[test]
    fn serde_form() {
        let reference: ManifestReference =
            serde_json::from_str(r#"{"type": "sidecar_url", "value": "https://a.example.com/x.c2pa"}"#)
                .unwrap();
        assert_eq!(reference.url(), Some("https://a.example.com/x.c2pa"));

        let inline = ManifestReference::Inline(vec![1, 2, 3]);
        assert_eq!(
            serde_json::to_value(&inline).unwrap(),
            serde_json::json!({"type": "inline", "value": "AQID"})
        );
    }
}
