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

//! The claim: the signed statement listing a manifest's assertions.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    canonical::{canonicalize_serializable, hash_uri},
    claim_generator_info::ClaimGeneratorInfo,
    jumbf::labels::{assertion_label_from_uri, relative_signature_uri, to_relative_assertion_uri},
    Error, HashedUri, Result,
};

/// The only hash algorithm claims are written with.
pub const CLAIM_HASH_ALG: &str = "sha256";

/// A claimed assertion: where it lives and the hash of its content.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AssertionReference {
    pub url: String,
    pub hash: HashedUri,
}

impl AssertionReference {
    pub fn new(label: &str, hash: HashedUri) -> Self {
        Self {
            url: to_relative_assertion_uri(label),
            hash,
        }
    }

    /// The assertion label this reference points to, if the URL is an
    /// assertion URL.
    pub fn label(&self) -> Option<String> {
        assertion_label_from_uri(&self.url)
    }
}

/// A `Claim` gathers together all the assertions about an asset from an
/// actor at a given time, and binds them by hash.
///
/// Every field is optional on input so that a claim missing a mandatory
/// field can still be decoded and reported by validation as structurally
/// invalid. Claims built by this crate always have every field set.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Claim {
    #[serde(skip_serializing_if = "Option::is_none")]
    alg: Option<String>,

    #[serde(default)]
    assertions: Vec<AssertionReference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    claim_generator_info: Option<ClaimGeneratorInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<String>,

    #[serde(rename = "instanceID", skip_serializing_if = "Option::is_none")]
    instance_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    redacted_assertions: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
}

impl Claim {
    /// Creates an empty claim made now by `claim_generator_info`.
    pub fn new(claim_generator_info: ClaimGeneratorInfo) -> Self {
        Self {
            alg: Some(CLAIM_HASH_ALG.to_string()),
            assertions: Vec::new(),
            claim_generator_info: Some(claim_generator_info),
            created: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            instance_id: Some(format!("xmp:iid:{}", Uuid::new_v4())),
            redacted_assertions: Vec::new(),
            signature: Some(relative_signature_uri()),
        }
    }

    /// Decodes a claim from its JSON content box.
    ///
    /// The claim must be a JSON object matching the claim schema; fields
    /// that are merely missing are reported later by validation.
    pub fn from_bytes(claim_bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(claim_bytes)
            .map_err(|e| Error::ClaimDecoding(format!("claim is not JSON: {e}")))?;
        if !value.is_object() {
            return Err(Error::ClaimDecoding("claim is not a JSON object".into()));
        }
        serde_json::from_value(value).map_err(|e| Error::ClaimDecoding(e.to_string()))
    }

    /// Returns the canonical JSON encoding of this claim, which is what
    /// gets signed and stored.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        canonicalize_serializable(self)
    }

    /// Returns the hashed URI of the canonical claim.
    pub fn hash(&self) -> Result<HashedUri> {
        Ok(hash_uri(&serde_json::to_value(self)?))
    }

    pub fn alg(&self) -> Option<&str> {
        self.alg.as_deref()
    }

    pub fn assertion_references(&self) -> &[AssertionReference] {
        &self.assertions
    }

    /// Returns the reference for the assertion with the given label.
    pub fn assertion_reference(&self, label: &str) -> Option<&AssertionReference> {
        self.assertions
            .iter()
            .find(|r| r.label().as_deref() == Some(label))
    }

    pub fn claim_generator_info(&self) -> Option<&ClaimGeneratorInfo> {
        self.claim_generator_info.as_ref()
    }

    /// Claim creation time, as written in the claim.
    pub fn created(&self) -> Option<&str> {
        self.created.as_deref()
    }

    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }

    /// URLs of assertions that were removed from the manifest after signing
    /// of an earlier version, and are intentionally absent.
    pub fn redacted_assertions(&self) -> &[String] {
        &self.redacted_assertions
    }

    /// Returns `true` if the assertion with the given label is redacted.
    pub fn is_redacted(&self, label: &str) -> bool {
        self.redacted_assertions
            .iter()
            .any(|url| assertion_label_from_uri(url).as_deref() == Some(label))
    }

    pub fn signature_reference(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub(crate) fn add_assertion_reference(&mut self, reference: AssertionReference) {
        self.assertions.push(reference);
    }

    pub(crate) fn add_redaction(&mut self, label: &str) {
        self.redacted_assertions
            .push(to_relative_assertion_uri(label));
    }

    pub(crate) fn set_created(&mut self, created: DateTime<Utc>) {
        self.created = Some(created.to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    /// Lists every way in which this claim is missing a mandatory part or
    /// is internally inconsistent. An empty list means the claim is
    /// structurally sound on its own.
    pub fn structural_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        match self.alg.as_deref() {
            Some(CLAIM_HASH_ALG) => {}
            Some(alg) => problems.push(format!("unsupported claim hash algorithm {alg}")),
            None => problems.push("claim has no alg".to_string()),
        }

        match &self.claim_generator_info {
            Some(info) if !info.name.trim().is_empty() => {}
            Some(_) => problems.push("claim generator has no name".to_string()),
            None => problems.push("claim has no claim_generator_info".to_string()),
        }

        match self.signature.as_deref() {
            Some(sig) if sig == relative_signature_uri() => {}
            Some(sig) => problems.push(format!("claim signature reference {sig} is not local")),
            None => problems.push("claim has no signature reference".to_string()),
        }

        if let Some(created) = &self.created {
            if DateTime::parse_from_rfc3339(created).is_err() {
                problems.push(format!("claim creation time {created:?} is not RFC 3339"));
            }
        }

        let mut labels = Vec::with_capacity(self.assertions.len());
        for reference in &self.assertions {
            match reference.label() {
                Some(label) if labels.contains(&label) => {
                    problems.push(format!("assertion {label} is claimed twice"));
                }
                Some(label) => labels.push(label),
                None => problems.push(format!("{} is not an assertion URL", reference.url)),
            }
        }

        for url in &self.redacted_assertions {
            if assertion_label_from_uri(url).is_none() {
                problems.push(format!("redaction {url} is not an assertion URL"));
            }
        }

        problems
    }
}
