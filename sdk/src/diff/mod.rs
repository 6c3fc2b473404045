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

//! Structural differences between two manifests.
//!
//! Both manifests are first reduced to a keyed view: assertions by label
//! and ingredients by relationship plus the digest of the ingredient's
//! manifest. Each output format is computed from the two views, so
//! reordering assertions or ingredients never shows up as a change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    assertion::Assertion, canonical::canonicalize, ingredient::Ingredient, lineage::LineageDelta,
    manifest::Manifest, settings::Settings, HashedUri,
};

mod json_patch;
mod merge_patch;
mod semantic;

pub use json_patch::{PatchOp, PatchOperation};
pub use semantic::{ChangeSet, EntryChange, EntryModification, GeneratorChange, SemanticDiff};

/// A representation of the difference between two manifests.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffFormat {
    Semantic,
    JsonPatch,
    MergePatch,
    /// Ancestors present in only one of the two lineage graphs. Computed by
    /// the engine, which owns the resolver lineage needs.
    Lineage,
}

impl DiffFormat {
    pub const ALL: [DiffFormat; 4] = [
        DiffFormat::Semantic,
        DiffFormat::JsonPatch,
        DiffFormat::MergePatch,
        DiffFormat::Lineage,
    ];
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DiffOptions {
    /// Report claim generator differences.
    pub compare_generator: bool,
}

impl DiffOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            compare_generator: settings.diff.compare_generator,
        }
    }
}

/// The requested representations of a diff. Formats that were not
/// requested are `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DiffResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticDiff>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_patch: Option<Vec<PatchOperation>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_patch: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineage: Option<LineageDelta>,
}

impl DiffResult {
    /// Returns `true` if no computed format reports a difference.
    pub fn is_empty(&self) -> bool {
        self.semantic.as_ref().map_or(true, SemanticDiff::is_empty)
            && self.json_patch.as_ref().map_or(true, Vec::is_empty)
            && self
                .merge_patch
                .as_ref()
                .map_or(true, |patch| patch.as_object().map_or(false, |o| o.is_empty()))
            && self.lineage.as_ref().map_or(true, LineageDelta::is_empty)
    }
}

/// Computes the requested representations of the changes from `base` to
/// `target`.
///
/// [`DiffFormat::Lineage`] is ignored here; see
/// [`Engine::diff`](crate::Engine::diff).
pub fn diff(
    base: &Manifest,
    target: &Manifest,
    formats: &[DiffFormat],
    options: &DiffOptions,
) -> DiffResult {
    let base = DiffView::new(base, options);
    let target = DiffView::new(target, options);

    let mut result = DiffResult::default();
    for format in formats {
        match format {
            DiffFormat::Semantic => result.semantic = Some(semantic::diff(&base, &target)),
            DiffFormat::JsonPatch => result.json_patch = Some(json_patch::diff(&base, &target)),
            DiffFormat::MergePatch => {
                result.merge_patch = Some(merge_patch::view_diff(&base, &target))
            }
            DiffFormat::Lineage => {}
        }
    }
    result
}

/// One assertion or ingredient, reduced to what diffs compare.
#[derive(Debug)]
pub(crate) struct DiffEntry {
    hashed_uri: HashedUri,
    redacted: bool,
    comparison: Vec<u8>,
    document: Value,
}

impl DiffEntry {
    fn from_assertion(assertion: &Assertion) -> Self {
        let document = if assertion.is_redacted() {
            json!({ "redacted": true })
        } else {
            // opaque content is represented by its hashed URI
            assertion
                .value()
                .unwrap_or_else(|| Value::String(assertion.hashed_uri().to_string()))
        };

        Self {
            hashed_uri: *assertion.hashed_uri(),
            redacted: assertion.is_redacted(),
            comparison: if assertion.is_redacted() {
                Vec::new()
            } else {
                assertion.comparison_bytes()
            },
            document,
        }
    }

    fn from_ingredient(ingredient: &Ingredient) -> Self {
        let mut document = serde_json::to_value(ingredient).unwrap_or_default();
        if let Some(object) = document.as_object_mut() {
            // the assertion label only reflects position
            object.remove("label");
        }

        Self {
            hashed_uri: *ingredient.hashed_uri(),
            redacted: false,
            comparison: canonicalize(&document),
            document,
        }
    }

    pub(crate) fn hashed_uri(&self) -> &HashedUri {
        &self.hashed_uri
    }

    pub(crate) fn document(&self) -> &Value {
        &self.document
    }

    /// Redacted entries are only compared for presence.
    pub(crate) fn same_as(&self, other: &DiffEntry) -> bool {
        self.redacted || other.redacted || self.comparison == other.comparison
    }
}

/// A manifest keyed by identity.
#[derive(Debug)]
pub(crate) struct DiffView {
    pub(crate) assertions: BTreeMap<String, DiffEntry>,
    pub(crate) ingredients: BTreeMap<String, DiffEntry>,
    pub(crate) claim_generator: Option<Option<String>>,
}

impl DiffView {
    pub(crate) fn new(manifest: &Manifest, options: &DiffOptions) -> Self {
        let mut assertions = BTreeMap::new();
        for assertion in manifest.assertions() {
            assertions
                .entry(assertion.label().to_string())
                .or_insert_with(|| DiffEntry::from_assertion(assertion));
        }

        let mut ingredients = BTreeMap::new();
        for ingredient in manifest.ingredients() {
            ingredients
                .entry(ingredient.identity_key())
                .or_insert_with(|| DiffEntry::from_ingredient(ingredient));
        }

        Self {
            assertions,
            ingredients,
            claim_generator: options
                .compare_generator
                .then(|| manifest.claim_generator().map(ToString::to_string)),
        }
    }

    /// The JSON document patches are expressed against.
    #[cfg(test)]
    pub(crate) fn document(&self) -> Value {
        let section = |entries: &BTreeMap<String, DiffEntry>| {
            Value::Object(
                entries
                    .iter()
                    .map(|(key, entry)| (key.clone(), entry.document.clone()))
                    .collect(),
            )
        };

        let mut document = json!({
            "assertions": section(&self.assertions),
            "ingredients": section(&self.ingredients),
        });
        if let (Some(generator), Some(object)) = (&self.claim_generator, document.as_object_mut()) {
            object.insert(
                "claim_generator".to_string(),
                generator.clone().map_or(Value::Null, Value::String),
            );
        }
        document
    }
}
