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

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    assertion::{Assertion, AssertionBase, AssertionJson},
    assertions::labels,
    error::Result,
    utils::base64,
    HashedUri,
};

/// How an ingredient relates to the asset whose manifest cites it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Relationship {
    /// The current asset is derived from this ingredient.
    #[serde(rename = "parentOf")]
    ParentOf,

    /// The current asset is a rendition (a differently encoded or packaged
    /// copy) of this ingredient.
    #[serde(rename = "renditionOf")]
    RenditionOf,

    /// The ingredient is a part of the current asset.
    #[serde(rename = "componentOf")]
    ComponentOf,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParentOf => "parentOf",
            Self::RenditionOf => "renditionOf",
            Self::ComponentOf => "componentOf",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The content of an ingredient assertion.
///
/// `claim_signature` is a copy of the referenced manifest's COSE signature
/// bytes, so a manifest can be checked against its ingredients without
/// fetching them.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientAssertion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub relationship: Relationship,

    /// Hashed URI of the ingredient's own manifest.
    pub active_manifest: HashedUri,

    #[serde(with = "base64::bytes")]
    pub claim_signature: Vec<u8>,

    /// Where the ingredient or its manifest can be fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_url: Option<String>,
}

impl IngredientAssertion {
    /// Label prefix for an ingredient assertion.
    pub const LABEL: &'static str = labels::INGREDIENT;

    pub fn new(
        relationship: Relationship,
        active_manifest: HashedUri,
        claim_signature: Vec<u8>,
    ) -> Self {
        Self {
            title: None,
            relationship,
            active_manifest,
            claim_signature,
            asset_url: None,
        }
    }

    pub fn set_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_asset_url<S: Into<String>>(mut self, asset_url: S) -> Self {
        self.asset_url = Some(asset_url.into());
        self
    }
}

impl AssertionJson for IngredientAssertion {}

impl AssertionBase for IngredientAssertion {
    const LABEL: &'static str = labels::INGREDIENT;

    fn to_assertion(&self) -> Result<Assertion> {
        Self::to_json_assertion(self)
    }

    fn from_assertion(assertion: &Assertion) -> Result<Self> {
        Self::from_json_assertion(assertion)
    }
}

#[cfg(test)]
pub mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::canonical::hash_bytes;

    #[test]
    fn camel_case_json() {
        let ingredient =
            IngredientAssertion::new(Relationship::RenditionOf, hash_bytes(b"claim"), vec![1, 2])
                .set_asset_url("https://cdn.example.com/a.mp4");

        let assertion = ingredient.to_assertion().unwrap();
        let json: serde_json::Value = serde_json::from_slice(assertion.raw()).unwrap();

        assert_eq!(json["relationship"], "renditionOf");
        assert_eq!(json["claimSignature"], "AQI=");
        assert_eq!(json["assetUrl"], "https://cdn.example.com/a.mp4");
        assert_eq!(json["activeManifest"], hash_bytes(b"claim").to_string());
        assert!(json.get("title").is_none());

        assert_eq!(
            IngredientAssertion::from_assertion(&assertion).unwrap(),
            ingredient
        );
    }

    #[test]
    fn relationship_names() {
        assert_eq!(Relationship::ParentOf.to_string(), "parentOf");
        assert_eq!(
            serde_json::from_str::<Relationship>("\"componentOf\"").unwrap(),
            Relationship::ComponentOf
        );
        assert!(serde_json::from_str::<Relationship>("\"inputTo\"").is_err());
    }
}
