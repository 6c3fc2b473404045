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

//! RFC 7396 JSON Merge Patch output.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{DiffEntry, DiffView};

/// Computes the merge patch between two manifest views.
///
/// Entries present on both sides are only diffed when they are not
/// [`same_as`](DiffEntry::same_as) each other, so a redacted assertion never
/// exposes the other side's content.
pub(super) fn view_diff(base: &DiffView, target: &DiffView) -> Value {
    let mut patch = Map::new();

    for (section, base_entries, target_entries) in [
        ("assertions", &base.assertions, &target.assertions),
        ("ingredients", &base.ingredients, &target.ingredients),
    ] {
        let members = section_diff(base_entries, target_entries);
        if !members.is_empty() {
            patch.insert(section.to_string(), Value::Object(members));
        }
    }

    if let (Some(b), Some(t)) = (&base.claim_generator, &target.claim_generator) {
        if b != t {
            patch.insert(
                "claim_generator".to_string(),
                t.clone().map_or(Value::Null, Value::String),
            );
        }
    }

    Value::Object(patch)
}

fn section_diff(
    base: &BTreeMap<String, DiffEntry>,
    target: &BTreeMap<String, DiffEntry>,
) -> Map<String, Value> {
    let mut members = Map::new();

    for (key, entry) in base {
        match target.get(key) {
            None => {
                members.insert(key.clone(), Value::Null);
            }
            Some(other) if !entry.same_as(other) => {
                members.insert(key.clone(), diff(entry.document(), other.document()));
            }
            Some(_) => {}
        }
    }

    for (key, entry) in target {
        if !base.contains_key(key) {
            members.insert(key.clone(), entry.document().clone());
        }
    }

    members
}

/// Computes the merge patch that turns `base` into `target`.
///
/// Removed members become `null`, nested objects are diffed recursively
/// and anything else that changed is replaced whole. Identical documents
/// give `{}`.
pub(crate) fn diff(base: &Value, target: &Value) -> Value {
    match (base, target) {
        (Value::Object(base), Value::Object(target)) => Value::Object(object_diff(base, target)),
        _ => target.clone(),
    }
}

fn object_diff(base: &Map<String, Value>, target: &Map<String, Value>) -> Map<String, Value> {
    let mut patch = Map::new();

    for (key, value) in base {
        match target.get(key) {
            None => {
                patch.insert(key.clone(), Value::Null);
            }
            Some(other) if other != value => {
                let member = match (value, other) {
                    (Value::Object(b), Value::Object(t)) => Value::Object(object_diff(b, t)),
                    _ => other.clone(),
                };
                patch.insert(key.clone(), member);
            }
            Some(_) => {}
        }
    }

    for (key, value) in target {
        if !base.contains_key(key) {
            patch.insert(key.clone(), value.clone());
        }
    }

    patch
}
