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

//! Fetching of remote manifests and assets.

use std::time::Duration;

use async_trait::async_trait;
use http::{header, HeaderMap, Request};
use log::debug;
use url::Url;

use crate::{
    http::{
        restricted::{HostPattern, RestrictedResolver},
        AsyncGenericResolver, AsyncHttpResolver, BodyLimit, HttpResolverError,
    },
    settings::{Settings, DEFAULT_MAX_MANIFEST_SIZE},
    Error, Result,
};

/// The `rel` value of a `Link` header pointing at an asset's manifest.
pub const MANIFEST_LINK_REL: &str = "c2pa-manifest";

/// Redirects followed by [`HttpManifestResolver`] for one fetch.
pub const MAX_REDIRECTS: usize = 5;

/// A fetched body and the manifest link that came with it, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchedResource {
    pub url: String,
    pub body: Vec<u8>,
    /// Target of a `Link: <...>; rel="c2pa-manifest"` header, resolved
    /// against `url`.
    pub manifest_link: Option<Url>,
}

/// The remote-fetch capability used to resolve URL references and
/// ingredient manifests.
///
/// Implementations must only be handed URLs that passed
/// [`validate_remote_url`](crate::http::restricted::validate_remote_url).
#[async_trait]
pub trait ManifestResolver: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource>;
}

/// A [`ManifestResolver`] over any [`AsyncHttpResolver`], restricted to the
/// network boundary.
pub struct HttpManifestResolver<T = AsyncGenericResolver> {
    inner: RestrictedResolver<T>,
    max_size: usize,
}

impl<T: AsyncHttpResolver> HttpManifestResolver<T> {
    pub fn new(inner: T, allowed_hosts: Vec<HostPattern>) -> Self {
        Self {
            inner: RestrictedResolver::with_allowed_hosts(inner, allowed_hosts),
            max_size: DEFAULT_MAX_MANIFEST_SIZE,
        }
    }

    /// Creates a resolver honoring the network allow-list and the manifest
    /// size limit of `settings`.
    pub fn from_settings(inner: T, settings: &Settings) -> Self {
        Self {
            inner: RestrictedResolver::with_allowed_hosts(
                inner,
                settings.network.allowed_hosts.clone(),
            ),
            max_size: settings.core.max_manifest_size,
        }
    }
}

impl Default for HttpManifestResolver<AsyncGenericResolver> {
    fn default() -> Self {
        Self::new(AsyncGenericResolver::new(), Vec::new())
    }
}

#[async_trait]
impl<T: AsyncHttpResolver> ManifestResolver for HttpManifestResolver<T> {
    /// Fetches `url`, following redirects. Every hop passes the network
    /// boundary before it is requested.
    async fn fetch(&self, url: &Url) -> Result<FetchedResource> {
        let mut url = url.clone();

        for _ in 0..=MAX_REDIRECTS {
            let mut request = Request::get(url.as_str())
                .body(Vec::new())
                .map_err(HttpResolverError::from)?;
            request.extensions_mut().insert(BodyLimit(self.max_size));

            let response = match self.inner.http_resolve_async(request).await {
                Ok(response) => response,
                Err(HttpResolverError::BodyTooLarge { size, limit }) => {
                    return Err(Error::ManifestTooLarge { size, limit });
                }
                Err(err) => return Err(err.into()),
            };

            let status = response.status();
            if status.is_redirection() {
                let location = redirect_location(response.headers(), &url)?;
                debug!("{url} redirects to {location}");
                url = location;
                continue;
            }
            if !status.is_success() {
                return Err(Error::FetchFailed {
                    url: url.to_string(),
                    reason: format!("HTTP status {status}"),
                });
            }

            let manifest_link = manifest_link(response.headers(), &url);
            let body = response.into_body();
            // resolvers are not required to honor the body limit
            if body.len() > self.max_size {
                return Err(Error::ManifestTooLarge {
                    size: body.len(),
                    limit: self.max_size,
                });
            }

            debug!("fetched {} bytes from {url}", body.len());
            return Ok(FetchedResource {
                url: url.to_string(),
                body,
                manifest_link,
            });
        }

        Err(Error::FetchFailed {
            url: url.to_string(),
            reason: format!("more than {MAX_REDIRECTS} redirects"),
        })
    }
}

// The target of a redirect response, resolved against `base`.
fn redirect_location(headers: &HeaderMap, base: &Url) -> Result<Url> {
    headers
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|location| base.join(location).ok())
        .ok_or_else(|| Error::FetchFailed {
            url: base.to_string(),
            reason: "redirect without a usable Location".to_string(),
        })
}

/// Fetches `url`, failing with [`Error::FetchTimeout`] after `timeout_ms`.
pub(crate) async fn fetch_with_timeout(
    resolver: &dyn ManifestResolver,
    url: &Url,
    timeout_ms: u64,
) -> Result<FetchedResource> {
    tokio::time::timeout(Duration::from_millis(timeout_ms), resolver.fetch(url))
        .await
        .map_err(|_| Error::FetchTimeout {
            url: url.to_string(),
            timeout_ms,
        })?
}

/// Finds the first `Link` target with `rel="c2pa-manifest"`, resolved
/// against `base`.
pub fn manifest_link(headers: &HeaderMap, base: &Url) -> Option<Url> {
    headers
        .get_all(header::LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(|link| {
            let (target, params) = parse_link(link)?;
            params
                .iter()
                .any(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case(MANIFEST_LINK_REL)))
                .then(|| base.join(target).ok())
                .flatten()
        })
}

// Splits `<target>; rel="a b"; other=x` into the target and its rel values.
fn parse_link(link: &str) -> Option<(&str, Vec<&str>)> {
    let link = link.trim();
    let rest = link.strip_prefix('<')?;
    let (target, params) = rest.split_once('>')?;

    let rels = params
        .split(';')
        .filter_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("rel")
                .then(|| value.trim().trim_matches('"'))
        })
        .collect();

    Some((target.trim(), rels))
}
