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

use crate::{
    assertion::{Assertion, AssertionData},
    assertions::{IngredientAssertion, Relationship},
    HashedUri,
};

/// An ingredient of a manifest: a weak, resolve-by-hash reference to
/// another manifest, read from a `c2pa.ingredient` assertion.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Label of the ingredient assertion, such as `c2pa.ingredient__1`.
    label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    relationship: Relationship,

    active_manifest: HashedUri,

    #[serde(with = "crate::utils::base64::bytes")]
    claim_signature: Vec<u8>,

    /// Hash of the ingredient assertion, as recorded in the claim.
    hashed_uri: HashedUri,

    #[serde(skip_serializing_if = "Option::is_none")]
    asset_url: Option<String>,
}

impl Ingredient {
    /// Returns the ingredient described by an assertion, or `None` if the
    /// assertion is not a decodable ingredient assertion.
    pub(crate) fn from_assertion(assertion: &Assertion) -> Option<Self> {
        let Some(AssertionData::Ingredient(ingredient)) = assertion.data() else {
            return None;
        };
        let IngredientAssertion {
            title,
            relationship,
            active_manifest,
            claim_signature,
            asset_url,
        } = ingredient.clone();

        Some(Self {
            label: assertion.label().to_string(),
            title,
            relationship,
            active_manifest,
            claim_signature,
            hashed_uri: *assertion.hashed_uri(),
            asset_url,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn relationship(&self) -> Relationship {
        self.relationship
    }

    /// Hashed URI of the referenced manifest's claim.
    pub fn active_manifest(&self) -> &HashedUri {
        &self.active_manifest
    }

    /// COSE signature bytes of the referenced manifest, copied when the
    /// ingredient was added.
    pub fn claim_signature(&self) -> &[u8] {
        &self.claim_signature
    }

    pub fn hashed_uri(&self) -> &HashedUri {
        &self.hashed_uri
    }

    /// Where the referenced asset or manifest may be fetched.
    pub fn asset_url(&self) -> Option<&str> {
        self.asset_url.as_deref()
    }

    /// Identity of this ingredient across manifests:
    /// `<relationship>:<hex digest of the active manifest>`.
    pub fn identity_key(&self) -> String {
        format!("{}:{}", self.relationship, self.active_manifest.hex())
    }
}
