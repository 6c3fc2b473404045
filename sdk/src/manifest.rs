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

use serde::Serialize;
use serde_json::Value;

use crate::{
    assertion::Assertion,
    canonical::hash_uri,
    claim::Claim,
    claim_generator_info::ClaimGeneratorInfo,
    claim_signature::ClaimSignature,
    ingredient::Ingredient,
    jumbf::labels::{to_assertion_uri, to_manifest_uri, to_signature_uri},
    Error, HashedUri, Result,
};

/// A decoded C2PA manifest.
///
/// Manifests are immutable once decoded. Changing an assertion or an
/// ingredient means building and signing a new manifest with
/// [`ManifestBuilder`](crate::ManifestBuilder).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    label: String,

    manifest_hash: HashedUri,

    claim: Claim,

    #[serde(skip)]
    claim_bytes: Vec<u8>,

    claim_signature: ClaimSignature,

    assertions: Vec<Assertion>,

    ingredients: Vec<Ingredient>,

    /// Labels of assertions the claim lists but the store does not carry.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unresolved_assertions: Vec<String>,

    /// Other manifests shipped in the same store, usually the manifests of
    /// this manifest's ingredients.
    #[serde(skip)]
    embedded: Vec<Manifest>,
}

impl Manifest {
    pub(crate) fn new(
        label: &str,
        claim_bytes: Vec<u8>,
        claim: Claim,
        claim_signature: ClaimSignature,
        assertions: Vec<Assertion>,
        unresolved_assertions: Vec<String>,
    ) -> Result<Self> {
        let manifest_hash = claim_hash(&claim_bytes)?;
        let ingredients = assertions
            .iter()
            .filter_map(Ingredient::from_assertion)
            .collect();

        Ok(Self {
            label: label.to_owned(),
            manifest_hash,
            claim,
            claim_bytes,
            claim_signature,
            assertions,
            ingredients,
            unresolved_assertions,
            embedded: Vec::new(),
        })
    }

    pub(crate) fn set_embedded(&mut self, embedded: Vec<Manifest>) {
        self.embedded = embedded;
    }

    #[cfg(test)]
    pub(crate) fn set_manifest_hash(&mut self, manifest_hash: HashedUri) {
        self.manifest_hash = manifest_hash;
    }

    /// JUMBF label of the manifest, normally `urn:uuid:...`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Hashed URI of the canonical claim. This is the identity other
    /// manifests use to cite this one.
    pub fn manifest_hash(&self) -> &HashedUri {
        &self.manifest_hash
    }

    pub fn claim(&self) -> &Claim {
        &self.claim
    }

    /// Claim bytes exactly as stored, which are the signed payload.
    pub fn claim_bytes(&self) -> &[u8] {
        &self.claim_bytes
    }

    pub fn claim_signature(&self) -> &ClaimSignature {
        &self.claim_signature
    }

    pub fn claim_generator(&self) -> Option<&ClaimGeneratorInfo> {
        self.claim.claim_generator_info()
    }

    /// Claim creation time (RFC 3339).
    pub fn timestamp(&self) -> Option<&str> {
        self.claim.created()
    }

    /// Assertions in claim order. Redacted assertions are included as
    /// content-less placeholders.
    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    pub fn assertion(&self, label: &str) -> Option<&Assertion> {
        self.assertions.iter().find(|a| a.label() == label)
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn unresolved_assertions(&self) -> &[String] {
        &self.unresolved_assertions
    }

    pub fn embedded_manifests(&self) -> &[Manifest] {
        &self.embedded
    }

    /// Absolute JUMBF URI of this manifest.
    pub fn uri(&self) -> String {
        to_manifest_uri(&self.label)
    }

    pub fn signature_uri(&self) -> String {
        to_signature_uri(&self.label)
    }

    pub fn assertion_uri(&self, label: &str) -> String {
        to_assertion_uri(&self.label, label)
    }

    /// Hash, generator and creation time of this manifest.
    pub fn identity(&self) -> ManifestIdentity {
        ManifestIdentity {
            manifest_hash: self.manifest_hash,
            label: self.label.clone(),
            claim_generator: self.claim_generator().map(ToString::to_string),
            timestamp: self.timestamp().map(str::to_owned),
        }
    }
}

/// Who made a manifest and when.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestIdentity {
    pub manifest_hash: HashedUri,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_generator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Hashes claim bytes the way manifests are identified: over the canonical
/// form of the claim JSON.
pub(crate) fn claim_hash(claim_bytes: &[u8]) -> Result<HashedUri> {
    let value: Value =
        serde_json::from_slice(claim_bytes).map_err(|e| Error::ClaimDecoding(e.to_string()))?;
    Ok(hash_uri(&value))
}

#[cfg(test)]
pub mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::{canonical::hash_bytes, utils::test::sample_manifest};

    #[test]
    fn hash_is_over_canonical_claim() {
        let signed = sample_manifest();
        let manifest = &signed.manifest;

        assert_eq!(
            manifest.manifest_hash(),
            &hash_bytes(manifest.claim_bytes())
        );
        assert_eq!(manifest.manifest_hash(), &manifest.claim().hash().unwrap());
        assert_eq!(
            claim_hash(br#"{ "b": 1, "a": 2 }"#).unwrap(),
            hash_bytes(br#"{"a":2,"b":1}"#)
        );
    }

    #[test]
    fn identity_and_uris() {
        let signed = sample_manifest();
        let manifest = &signed.manifest;
        let identity = manifest.identity();

        assert_eq!(identity.manifest_hash, *manifest.manifest_hash());
        assert_eq!(identity.claim_generator.as_deref(), Some("c2c-pipeline/2.0"));
        assert!(identity.timestamp.is_some());
        assert!(manifest.uri().ends_with(manifest.label()));
        assert_eq!(
            manifest.assertion_uri("c2pa.actions"),
            format!("{}/c2pa.assertions/c2pa.actions", manifest.uri())
        );
    }

    #[test]
    fn report_skips_raw_claim() {
        let signed = sample_manifest();
        let report = serde_json::to_value(&signed.manifest).unwrap();
        assert!(report.get("claimBytes").is_none());
        assert!(report["manifestHash"].as_str().unwrap().starts_with("ni:///sha-256;"));
        assert_eq!(report["assertions"].as_array().unwrap().len(), 2);
    }
}
