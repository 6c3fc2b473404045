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

//! HTTP abstraction layer.
//!
//! This module defines the trait the crate fetches remote manifests and
//! assets through, without hard-wiring a specific HTTP client. Host
//! applications can plug in their own HTTP implementation, restrict where
//! the crate may connect, or disable networking entirely.
//!
//! # When do outbound network requests occur?
//!
//! Only when a caller hands the [`Engine`] a URL reference, and during
//! lineage reconstruction when an ingredient manifest is neither embedded
//! in a parsed store nor already cached for the call. Every URL passes
//! [`restricted::validate_remote_url`] first.
//!
//! [`Engine`]: crate::Engine

use std::io;

use async_trait::async_trait;
use http::{Request, Response};

mod reqwest;
pub mod restricted;

// Since we use `http::Request` and `http::Response` we also expose the `http` crate.
pub use http;

/// The largest response body a caller will accept, attached to a
/// [`Request`] as an extension.
///
/// Resolvers that honor it fail with [`HttpResolverError::BodyTooLarge`]
/// as soon as the body is known to exceed the limit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BodyLimit(pub usize);

/// A resolver for non-blocking (async) HTTP requests.
///
/// The response body is read to completion by the resolver. Redirects are
/// returned to the caller rather than followed.
#[async_trait]
pub trait AsyncHttpResolver: Send + Sync {
    /// Resolve a [`Request`] into a [`Response`] with the full body.
    ///
    /// [`Request`]: http::Request
    /// [`Response`]: http::Response
    async fn http_resolve_async(
        &self,
        request: Request<Vec<u8>>,
    ) -> Result<Response<Vec<u8>>, HttpResolverError>;
}

/// A generic resolver for [`AsyncHttpResolver`].
///
/// This implementation uses [`reqwest::Client`] when the `http_reqwest`
/// feature is enabled, and otherwise fails every request with
/// [`HttpResolverError::AsyncHttpResolverNotImplemented`].
///
/// [`reqwest::Client`]: https://docs.rs/reqwest/latest/reqwest/struct.Client.html
pub struct AsyncGenericResolver(async_resolver::Impl);

impl AsyncGenericResolver {
    /// Create a new [`AsyncGenericResolver`] with an auto-specified [`AsyncHttpResolver`].
    pub fn new() -> Self {
        Self(async_resolver::new())
    }
}

impl Default for AsyncGenericResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AsyncHttpResolver for AsyncGenericResolver {
    async fn http_resolve_async(
        &self,
        request: Request<Vec<u8>>,
    ) -> Result<Response<Vec<u8>>, HttpResolverError> {
        self.0.http_resolve_async(request).await
    }
}

/// An error that occurs during async HTTP resolution.
#[derive(Debug, thiserror::Error)]
pub enum HttpResolverError {
    /// An error occured in the [`http`] crate.
    #[error(transparent)]
    Http(#[from] http::Error),

    /// An error occured in during I/O.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The async HTTP resolver is not implemented.
    ///
    /// Note this often occurs when the http-related features are improperly enabled.
    #[error("the async http resolver is not implemented")]
    AsyncHttpResolverNotImplemented,

    /// The remote URI is rejected by the network boundary.
    ///
    /// The boundary is normally enforced by a [`RestrictedResolver`].
    ///
    /// [`RestrictedResolver`]: restricted::RestrictedResolver
    #[error("remote URI \"{uri}\" is not permitted")]
    UriDisallowed { uri: String },

    /// The response body exceeds the request's [`BodyLimit`].
    #[error("response body of at least {size} bytes exceeds the limit of {limit}")]
    BodyTooLarge { size: usize, limit: usize },

    /// An error occured from the underlying HTTP resolver.
    #[error("an error occurred from the underlying http resolver: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "http_reqwest")]
mod async_resolver {
    use super::*;

    pub type Impl = AsyncReqwestResolver;
    pub fn new() -> Impl {
        let client = ::reqwest::Client::builder()
            .redirect(::reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| log::error!("could not build the HTTP client: {err}"))
            .ok();
        AsyncReqwestResolver(client)
    }

    // A client that never follows redirects on its own.
    pub struct AsyncReqwestResolver(Option<::reqwest::Client>);

    #[async_trait]
    impl AsyncHttpResolver for AsyncReqwestResolver {
        async fn http_resolve_async(
            &self,
            request: Request<Vec<u8>>,
        ) -> Result<Response<Vec<u8>>, HttpResolverError> {
            match &self.0 {
                Some(client) => client.http_resolve_async(request).await,
                None => Err(HttpResolverError::AsyncHttpResolverNotImplemented),
            }
        }
    }
}

#[cfg(not(feature = "http_reqwest"))]
mod async_resolver {
    use super::*;

    pub type Impl = AsyncNoopResolver;
    pub fn new() -> Impl {
        AsyncNoopResolver
    }

    pub struct AsyncNoopResolver;

    #[async_trait]
    impl AsyncHttpResolver for AsyncNoopResolver {
        async fn http_resolve_async(
            &self,
            _request: Request<Vec<u8>>,
        ) -> Result<Response<Vec<u8>>, HttpResolverError> {
            Err(HttpResolverError::AsyncHttpResolverNotImplemented)
        }
    }
}

#[cfg(test)]
pub mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    async fn remote_mock_server(server: &httpmock::MockServer) -> httpmock::Mock<'_> {
        server
            .mock_async(|when, then| {
                when.method(httpmock::Method::GET).path("/manifest.c2pa");
                then.status(200)
                    .header("content-type", "application/c2pa")
                    .body([1, 2, 3]);
            })
            .await
    }

    pub async fn assert_http_resolver_async(resolver: impl AsyncHttpResolver) {
        let server = httpmock::MockServer::start_async().await;
        let mock = remote_mock_server(&server).await;

        let request = Request::get(server.url("/manifest.c2pa"))
            .body(Vec::new())
            .unwrap();

        let response = resolver.http_resolve_async(request).await.unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/c2pa"
        );
        assert_eq!(response.body(), &[1, 2, 3]);

        mock.assert_async().await;
    }
}
