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

//! RFC 6902 JSON Patch output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DiffEntry, DiffView};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

/// One JSON Patch operation.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn add<S: Into<String>>(path: S, value: Value) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value: Some(value),
        }
    }

    pub fn remove<S: Into<String>>(path: S) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
        }
    }

    pub fn replace<S: Into<String>>(path: S, value: Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: Some(value),
        }
    }
}

/// Escapes a JSON Pointer reference token.
pub(crate) fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

pub(super) fn diff(base: &DiffView, target: &DiffView) -> Vec<PatchOperation> {
    let mut ops = Vec::new();
    section("assertions", &base.assertions, &target.assertions, &mut ops);
    section("ingredients", &base.ingredients, &target.ingredients, &mut ops);

    if let (Some(b), Some(t)) = (&base.claim_generator, &target.claim_generator) {
        match (b, t) {
            (Some(b), Some(t)) if b != t => ops.push(PatchOperation::replace(
                "/claim_generator",
                Value::String(t.clone()),
            )),
            (None, Some(t)) => ops.push(PatchOperation::replace(
                "/claim_generator",
                Value::String(t.clone()),
            )),
            (Some(_), None) => ops.push(PatchOperation::replace("/claim_generator", Value::Null)),
            _ => {}
        }
    }
    ops
}

fn section(
    name: &str,
    base: &BTreeMap<String, DiffEntry>,
    target: &BTreeMap<String, DiffEntry>,
    ops: &mut Vec<PatchOperation>,
) {
    let path = |key: &str| format!("/{name}/{}", escape_token(key));

    for (key, entry) in base {
        match target.get(key) {
            None => ops.push(PatchOperation::remove(path(key))),
            Some(other) if !entry.same_as(other) => {
                ops.push(PatchOperation::replace(path(key), other.document().clone()))
            }
            Some(_) => {}
        }
    }

    for (key, entry) in target {
        if !base.contains_key(key) {
            ops.push(PatchOperation::add(path(key), entry.document().clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::{
        diff::{diff, DiffFormat, DiffOptions, DiffView},
        utils::test::derived_manifest,
    };

    // Applies operations produced by this module to a document.
    fn apply(document: &mut Value, ops: &[PatchOperation]) {
        for op in ops {
            let (parent, token) = op.path.rsplit_once('/').unwrap();
            let token = token.replace("~1", "/").replace("~0", "~");
            let parent = if parent.is_empty() {
                document.as_object_mut().unwrap()
            } else {
                document.pointer_mut(parent).unwrap().as_object_mut().unwrap()
            };
            match op.op {
                PatchOp::Add | PatchOp::Replace => {
                    parent.insert(token, op.value.clone().unwrap());
                }
                PatchOp::Remove => {
                    parent.remove(&token).unwrap();
                }
            }
        }
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_token("a/b~c"), "a~1b~0c");
        assert_eq!(escape_token("c2pa.actions"), "c2pa.actions");
    }

    #[test]
    fn patch_transforms_base_into_target() {
        let (parent, child) = derived_manifest();
        let options = DiffOptions::default();
        let ops = diff(
            &parent.manifest,
            &child.manifest,
            &[DiffFormat::JsonPatch],
            &options,
        )
        .json_patch
        .unwrap();

        let paths: Vec<_> = ops.iter().map(|op| (op.op, op.path.as_str())).collect();
        let ingredient_path = format!(
            "/ingredients/parentOf:{}",
            parent.manifest.manifest_hash().hex()
        );
        assert_eq!(
            paths,
            vec![
                (PatchOp::Replace, "/assertions/c2pa.actions"),
                (PatchOp::Remove, "/assertions/com.c2c.policy.v1"),
                (PatchOp::Add, "/assertions/c2pa.ingredient"),
                (PatchOp::Add, ingredient_path.as_str()),
            ]
        );

        let mut document = DiffView::new(&parent.manifest, &options).document();
        apply(&mut document, &ops);
        assert_eq!(
            document,
            DiffView::new(&child.manifest, &options).document()
        );
    }

    #[test]
    fn wire_form() {
        let ops = vec![
            PatchOperation::remove("/assertions/com.c2c.policy.v1"),
            PatchOperation::add("/assertions/c2pa.ingredient", json!({"title": "x"})),
        ];
        assert_eq!(
            serde_json::to_value(&ops).unwrap(),
            json!([
                {"op": "remove", "path": "/assertions/com.c2c.policy.v1"},
                {"op": "add", "path": "/assertions/c2pa.ingredient", "value": {"title": "x"}}
            ])
        );
    }
}
