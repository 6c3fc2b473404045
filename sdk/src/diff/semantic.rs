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

use serde::Serialize;

use super::{DiffEntry, DiffView};
use crate::HashedUri;

/// Added, removed and modified entries, each ordered by identity key.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ChangeSet {
    pub added: Vec<EntryChange>,
    pub removed: Vec<EntryChange>,
    pub modified: Vec<EntryModification>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// An entry present on one side only.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryChange {
    pub key: String,
    pub hashed_uri: HashedUri,
}

/// An entry whose content differs between the two sides.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EntryModification {
    pub key: String,
    pub base: HashedUri,
    pub target: HashedUri,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GeneratorChange {
    pub base: Option<String>,
    pub target: Option<String>,
}

/// The semantic representation of a diff.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SemanticDiff {
    pub assertions: ChangeSet,
    pub ingredients: ChangeSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_generator: Option<GeneratorChange>,
}

impl SemanticDiff {
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty() && self.ingredients.is_empty() && self.claim_generator.is_none()
    }
}

pub(super) fn diff(base: &DiffView, target: &DiffView) -> SemanticDiff {
    let claim_generator = match (&base.claim_generator, &target.claim_generator) {
        (Some(b), Some(t)) if b != t => Some(GeneratorChange {
            base: b.clone(),
            target: t.clone(),
        }),
        _ => None,
    };

    SemanticDiff {
        assertions: change_set(&base.assertions, &target.assertions),
        ingredients: change_set(&base.ingredients, &target.ingredients),
        claim_generator,
    }
}

fn change_set(
    base: &BTreeMap<String, DiffEntry>,
    target: &BTreeMap<String, DiffEntry>,
) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (key, entry) in base {
        match target.get(key) {
            None => changes.removed.push(EntryChange {
                key: key.clone(),
                hashed_uri: *entry.hashed_uri(),
            }),
            Some(other) if !entry.same_as(other) => changes.modified.push(EntryModification {
                key: key.clone(),
                base: *entry.hashed_uri(),
                target: *other.hashed_uri(),
            }),
            Some(_) => {}
        }
    }

    changes.added = target
        .iter()
        .filter(|(key, _)| !base.contains_key(*key))
        .map(|(key, entry)| EntryChange {
            key: key.clone(),
            hashed_uri: *entry.hashed_uri(),
        })
        .collect();

    changes
}
