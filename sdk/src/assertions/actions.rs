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

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    assertion::{Assertion, AssertionBase, AssertionCbor},
    assertions::labels,
    error::Result,
    HashedUri,
};

/// Specification defined C2PA actions
pub mod c2pa_action {
    /// The asset was first created.
    pub const CREATED: &str = "c2pa.created";

    /// An existing asset was opened and is being set as the `parentOf` ingredient.
    pub const OPENED: &str = "c2pa.opened";

    /// Generalized actions that would be considered editorial transformations of the content.
    pub const EDITED: &str = "c2pa.edited";

    /// Areas of the asset's "editorial" content were cropped out.
    pub const CROPPED: &str = "c2pa.cropped";

    /// A direct conversion of one encoding to another, including resolution scaling,
    /// bitrate adjustment and encoding format change.
    ///
    /// This action is considered as a non-editorial transformation of the `parentOf`
    /// ingredient.
    pub const TRANSCODED: &str = "c2pa.transcoded";

    /// Added/Placed a `componentOf` ingredient into the asset.
    pub const PLACED: &str = "c2pa.placed";

    /// A conversion of one packaging or container format to another. Content may be
    /// repackaged without transcoding.
    pub const REPACKAGED: &str = "c2pa.repackaged";

    /// The format of the asset was changed.
    pub const CONVERTED: &str = "c2pa.converted";

    /// The asset was published or distributed.
    pub const PUBLISHED: &str = "c2pa.published";

    /// Something happened, but the claim_generator cannot specify what.
    pub const UNKNOWN: &str = "c2pa.unknown";
}

const INGREDIENTS_PARAMETER: &str = "ingredients";

/// Reference from an action to an ingredient assertion in the same claim.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IngredientReference {
    /// Relative JUMBF URI of the ingredient assertion.
    pub url: String,

    /// Hash of the ingredient assertion's content.
    pub hash: HashedUri,
}

/// Defines a single action taken on an asset.
///
/// An [`Action`] describes what took place on the asset, when it took place,
/// along with possible other information such as what software performed
/// the action.
///
/// See <https://c2pa.org/specifications/specifications/2.1/specs/C2PA_Specification.html#_actions>.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Action {
    /// The label associated with this action. See ([`c2pa_action`]).
    action: String,

    /// Timestamp of when the action occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    when: Option<String>,

    /// The software agent that performed the action.
    #[serde(rename = "softwareAgent", skip_serializing_if = "Option::is_none")]
    software_agent: Option<String>,

    /// Human-readable description of the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// Additional parameters of the action. These vary by the type of action.
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<BTreeMap<String, Value>>,
}

impl Action {
    /// Create a new action with a specific action label.
    ///
    /// This label is often one of the labels defined in [`c2pa_action`],
    /// but can also be a custom string in reverse-domain format.
    pub fn new(label: &str) -> Self {
        Self {
            action: label.to_owned(),
            when: None,
            software_agent: None,
            description: None,
            parameters: None,
        }
    }

    /// Returns the label for this action.
    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn when(&self) -> Option<&str> {
        self.when.as_deref()
    }

    pub fn software_agent(&self) -> Option<&str> {
        self.software_agent.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn get_parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.as_ref()?.get(key)
    }

    /// Returns the ingredient assertions this action was applied to.
    pub fn ingredients(&self) -> Vec<IngredientReference> {
        self.get_parameter(INGREDIENTS_PARAMETER)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    pub fn set_when<S: Into<String>>(mut self, when: S) -> Self {
        self.when = Some(when.into());
        self
    }

    pub fn set_software_agent<S: Into<String>>(mut self, software_agent: S) -> Self {
        self.software_agent = Some(software_agent.into());
        self
    }

    pub fn set_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a parameter value, replacing any previous value for `key`.
    pub fn set_parameter<S: Into<String>, T: Serialize>(mut self, key: S, value: T) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        self.parameters
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value);
        Ok(self)
    }

    /// Records that this action was applied to the given ingredient.
    pub fn add_ingredient(self, ingredient: IngredientReference) -> Result<Self> {
        let mut ingredients = self.ingredients();
        ingredients.push(ingredient);
        self.set_parameter(INGREDIENTS_PARAMETER, ingredients)
    }
}

/// An `Actions` assertion provides information on edits and other
/// actions taken that affect the asset's content.
///
/// See <https://c2pa.org/specifications/specifications/2.1/specs/C2PA_Specification.html#_actions>.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Actions {
    /// A list of [`Action`]s.
    pub actions: Vec<Action>,
}

impl Actions {
    /// Label prefix for an [`Actions`] assertion.
    pub const LABEL: &'static str = labels::ACTIONS;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Adds an [`Action`] to this assertion's list of actions.
    pub fn add_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

impl AssertionCbor for Actions {}

impl AssertionBase for Actions {
    const LABEL: &'static str = labels::ACTIONS;

    fn to_assertion(&self) -> Result<Assertion> {
        Self::to_cbor_assertion(self)
    }

    fn from_assertion(assertion: &Assertion) -> Result<Self> {
        Self::from_cbor_assertion(assertion)
    }
}
