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

//! Derivative manifests: new manifests that cite a validated parent.

use std::collections::BTreeMap;

use c2pa_lineage_crypto::raw_signature::RawSigner;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{
    assertions::{c2pa_action, Action, Actions, IngredientReference, Relationship},
    builder::ManifestBuilder,
    claim_generator_info::ClaimGeneratorInfo,
    manifest::Manifest,
    resolver::MANIFEST_LINK_REL,
    settings::Settings,
    trust_anchors::TrustAnchors,
    validator::validate,
    Error, Result,
};

/// What was done to the parent asset to produce the derivative.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivativeActionKind {
    Transcode,
    Crop,
    Edit,
    Place,
    Repackage,
}

impl DerivativeActionKind {
    /// The `c2pa.actions` label this kind is recorded as.
    pub fn action_label(self) -> &'static str {
        match self {
            Self::Transcode => c2pa_action::TRANSCODED,
            Self::Crop => c2pa_action::CROPPED,
            Self::Edit => c2pa_action::EDITED,
            Self::Place => c2pa_action::PLACED,
            Self::Repackage => c2pa_action::REPACKAGED,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DerivativeAction {
    pub kind: DerivativeActionKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_agent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,
}

impl DerivativeAction {
    pub fn new(kind: DerivativeActionKind) -> Self {
        Self {
            kind,
            software_agent: None,
            description: None,
            parameters: BTreeMap::new(),
        }
    }

    fn to_action(&self, ingredient: &IngredientReference) -> Result<Action> {
        let mut action = Action::new(self.kind.action_label());
        if let Some(agent) = &self.software_agent {
            action = action.set_software_agent(agent.as_str());
        }
        if let Some(description) = &self.description {
            action = action.set_description(description.as_str());
        }
        for (key, value) in &self.parameters {
            action = action.set_parameter(key.as_str(), value)?;
        }
        action.add_ingredient(ingredient.clone())
    }
}

/// Describes the derivative to create.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DerivativeRequest {
    /// Where the child manifest will be published, for the discovery link.
    pub manifest_url: String,

    /// Where the parent asset can be fetched, recorded on the ingredient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_asset_url: Option<String>,

    pub actions: Vec<DerivativeAction>,

    /// Claim generator of the child. Defaults to the configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_generator: Option<ClaimGeneratorInfo>,
}

/// A signed child manifest and how to find it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Derivative {
    pub child_manifest: Manifest,
    #[serde(with = "crate::utils::base64::bytes")]
    pub child_bytes: Vec<u8>,
    pub ingredient_ref: IngredientReference,
    /// Value of a `Link` header advertising the child manifest.
    pub discovery_link: String,
}

/// Formats a `Link` header value pointing at a manifest.
pub fn discovery_link(manifest_url: &str) -> String {
    format!("<{manifest_url}>; rel=\"{MANIFEST_LINK_REL}\"")
}

/// Creates and signs a manifest derived from `parent`.
///
/// The parent must validate against `trust_anchors`. The child has one
/// `parentOf` ingredient citing the parent and a `c2pa.actions` assertion
/// whose actions all reference that ingredient. The parent and the
/// manifests embedded with it are embedded in the child's store.
pub fn create_derivative(
    parent: &Manifest,
    request: &DerivativeRequest,
    signer: &dyn RawSigner,
    trust_anchors: &TrustAnchors,
) -> Result<Derivative> {
    if request.actions.is_empty() {
        return Err(Error::BadParam("a derivative needs at least one action".into()));
    }
    Url::parse(&request.manifest_url)
        .map_err(|e| Error::InvalidReference(format!("{}: {e}", request.manifest_url)))?;

    let status = validate(parent, trust_anchors);
    if !status.valid() {
        return Err(Error::UntrustedParent {
            manifest_hash: parent.manifest_hash().to_string(),
            codes: status.code_strings().into_iter().map(str::to_owned).collect(),
        });
    }

    let mut builder = match &request.claim_generator {
        Some(info) => ManifestBuilder::new(info.clone()),
        None => ManifestBuilder::from_settings(&Settings::default()),
    };

    let ingredient_ref = builder.add_ingredient(
        parent,
        Relationship::ParentOf,
        request.parent_asset_url.as_deref(),
    )?;

    let mut actions = Actions::new();
    for action in &request.actions {
        actions = actions.add_action(action.to_action(&ingredient_ref)?);
    }
    builder.add_typed_assertion(&actions)?;

    let signed = builder.sign(signer, None)?;
    info!(
        "created derivative {} of {}",
        signed.manifest.manifest_hash(),
        parent.manifest_hash()
    );

    Ok(Derivative {
        child_manifest: signed.manifest,
        child_bytes: signed.bytes,
        ingredient_ref,
        discovery_link: discovery_link(&request.manifest_url),
    })
}
