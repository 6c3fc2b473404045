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

#[cfg(feature = "http_reqwest")]
pub mod async_impl {
    use async_trait::async_trait;
    use http::{Request, Response};

    use crate::http::{AsyncHttpResolver, BodyLimit, HttpResolverError};

    #[async_trait]
    impl AsyncHttpResolver for reqwest::Client {
        async fn http_resolve_async(
            &self,
            request: Request<Vec<u8>>,
        ) -> Result<Response<Vec<u8>>, HttpResolverError> {
            let limit = request.extensions().get::<BodyLimit>().map(|l| l.0);
            let mut response = self.execute(request.try_into()?).await?;

            if let (Some(limit), Some(length)) = (limit, response.content_length()) {
                if length > limit as u64 {
                    return Err(HttpResolverError::BodyTooLarge {
                        size: usize::try_from(length).unwrap_or(usize::MAX),
                        limit,
                    });
                }
            }

            let mut builder = Response::builder()
                .status(response.status())
                .version(response.version());

            for (name, value) in response.headers().iter() {
                builder = builder.header(name, value);
            }

            // the declared length is not trusted
            let mut body = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                body.extend_from_slice(&chunk);
                if let Some(limit) = limit.filter(|limit| body.len() > *limit) {
                    return Err(HttpResolverError::BodyTooLarge {
                        size: body.len(),
                        limit,
                    });
                }
            }

            Ok(builder.body(body)?)
        }
    }

    impl From<reqwest::Error> for HttpResolverError {
        fn from(value: reqwest::Error) -> Self {
            Self::Other(Box::new(value))
        }
    }

    #[cfg(test)]
    pub mod tests {
        #![allow(clippy::unwrap_used)]

        use super::*;
        use crate::http::tests::assert_http_resolver_async;

        #[tokio::test]
        async fn test_http_reqwest() {
            assert_http_resolver_async(reqwest::Client::new()).await;
        }

        #[tokio::test]
        async fn error_status_is_a_response() {
            let server = httpmock::MockServer::start_async().await;
            let mock = server
                .mock_async(|when, then| {
                    when.method(httpmock::Method::GET).path("/missing");
                    then.status(404);
                })
                .await;

            let request = Request::get(server.url("/missing")).body(Vec::new()).unwrap();
            let response = reqwest::Client::new()
                .http_resolve_async(request)
                .await
                .unwrap();

            assert_eq!(response.status(), 404);
            assert!(response.body().is_empty());
            mock.assert_async().await;
        }

        #[tokio::test]
        async fn body_limit_is_enforced() {
            let server = httpmock::MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(httpmock::Method::GET).path("/big.c2pa");
                    then.status(200).body(vec![0u8; 64]);
                })
                .await;

            let mut request = Request::get(server.url("/big.c2pa")).body(Vec::new()).unwrap();
            request.extensions_mut().insert(BodyLimit(16));
            let err = reqwest::Client::new()
                .http_resolve_async(request)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                HttpResolverError::BodyTooLarge { size, limit: 16 } if size > 16
            ));

            let mut request = Request::get(server.url("/big.c2pa")).body(Vec::new()).unwrap();
            request.extensions_mut().insert(BodyLimit(64));
            let response = reqwest::Client::new()
                .http_resolve_async(request)
                .await
                .unwrap();
            assert_eq!(response.body().len(), 64);
        }

        #[tokio::test]
        async fn generic_resolver_returns_redirects() {
            let server = httpmock::MockServer::start_async().await;
            let target = server
                .mock_async(|when, then| {
                    when.method(httpmock::Method::GET).path("/internal");
                    then.status(200).body("secret");
                })
                .await;
            server
                .mock_async(|when, then| {
                    when.method(httpmock::Method::GET).path("/moved");
                    then.status(302).header("location", "/internal");
                })
                .await;

            let request = Request::get(server.url("/moved")).body(Vec::new()).unwrap();
            let response = crate::http::AsyncGenericResolver::new()
                .http_resolve_async(request)
                .await
                .unwrap();

            assert_eq!(response.status(), 302);
            assert_eq!(response.headers().get("location").unwrap(), "/internal");
            assert_eq!(target.hits_async().await, 0);
        }
    }
}
