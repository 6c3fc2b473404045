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

#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use c2pa_lineage::{
    assertions::{c2pa_action, Action, Actions},
    create_signer,
    error::Error,
    resolver::{FetchedResource, ManifestResolver},
    ClaimGeneratorInfo, ManifestBuilder, RawSigner, Result, SignedManifest, SigningAlg,
    TrustAnchors,
};
use url::Url;

pub const ROOT_CA: &[u8] = include_bytes!("../fixtures/certs/root_ca.pem");
pub const EC_ROOT_CA: &[u8] = include_bytes!("../fixtures/certs/ec_root_ca.pem");
pub const TSA_ROOT_CA: &[u8] = include_bytes!("../fixtures/certs/tsa_root_ca.pem");

pub fn es256_signer() -> Box<dyn RawSigner> {
    create_signer::from_keys(
        include_bytes!("../fixtures/certs/es256.pub"),
        include_bytes!("../fixtures/certs/es256.priv"),
        SigningAlg::Es256,
    )
    .unwrap()
}

pub fn expired_signer() -> Box<dyn RawSigner> {
    create_signer::from_keys(
        include_bytes!("../fixtures/certs/expired_ed25519.pub"),
        include_bytes!("../fixtures/certs/expired_ed25519.priv"),
        SigningAlg::Ed25519,
    )
    .unwrap()
}

pub fn trust_anchors() -> TrustAnchors {
    let mut anchors = TrustAnchors::new();
    anchors.add_trust_anchors(ROOT_CA).unwrap();
    anchors.add_trust_anchors(EC_ROOT_CA).unwrap();
    anchors.add_tsa_trust_anchors(TSA_ROOT_CA).unwrap();
    anchors
}

/// A pipeline manifest with a `c2pa.actions` and a `com.c2c.policy.v1`
/// assertion.
pub fn pipeline_manifest(signer: &dyn RawSigner) -> SignedManifest {
    let mut info = ClaimGeneratorInfo::new("c2c-pipeline");
    info.set_version("2.0");
    let mut builder = ManifestBuilder::new(info);
    builder
        .add_typed_assertion(&Actions::new().add_action(Action::new(c2pa_action::CREATED)))
        .unwrap()
        .add_assertion_json(
            "com.c2c.policy.v1",
            &serde_json::json!({"license": "CC-BY-4.0"}),
        )
        .unwrap();
    builder.sign(signer, None).unwrap()
}

pub fn replace_first(bytes: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    let at = bytes
        .windows(from.len())
        .position(|w| w == from)
        .unwrap();
    let mut out = bytes.to_vec();
    out[at..at + to.len()].copy_from_slice(to);
    out
}

/// Serves fixed bodies by URL, with an optional `Link` target.
#[derive(Default)]
pub struct MemoryResolver {
    bodies: HashMap<String, (Vec<u8>, Option<String>)>,
}

impl MemoryResolver {
    pub fn serve(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), (body.to_vec(), None));
        self
    }

    pub fn serve_with_link(mut self, url: &str, link: &str, body: &[u8]) -> Self {
        self.bodies
            .insert(url.to_string(), (body.to_vec(), Some(link.to_string())));
        self
    }
}

#[async_trait]
impl ManifestResolver for MemoryResolver {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource> {
        let (body, link) = self
            .bodies
            .get(url.as_str())
            .ok_or_else(|| Error::FetchFailed {
                url: url.to_string(),
                reason: "HTTP status 404 Not Found".into(),
            })?;
        Ok(FetchedResource {
            url: url.to_string(),
            body: body.clone(),
            manifest_link: link.as_deref().and_then(|l| url.join(l).ok()),
        })
    }
}

#[allow(unused_macros)]
macro_rules! assert_err {
    ($expression:expr, $($pattern:tt)+) => {
        match $expression {
            $($pattern)+ => (),
            ref e => panic!("expected `{}` but got `{:?}`", stringify!($($pattern)+), e),
        }
    }
}
#[allow(unused_imports)]
pub(crate) use assert_err;
