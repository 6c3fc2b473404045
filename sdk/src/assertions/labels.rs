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

#![deny(missing_docs)]

//! Labels for the assertion types this crate interprets.
//!
//! These constants do not include instance suffixes. An assertion that
//! appears more than once in a claim carries a `__N` suffix, as in
//! `c2pa.ingredient__1`.
//!
//! See <https://c2pa.org/specifications/specifications/2.1/specs/C2PA_Specification.html#_c2pa_standard_assertions>.

/// Label prefix for an actions assertion.
///
/// See <https://c2pa.org/specifications/specifications/2.1/specs/C2PA_Specification.html#_actions>.
pub const ACTIONS: &str = "c2pa.actions";

/// Label prefix for an ingredient assertion.
///
/// See <https://c2pa.org/specifications/specifications/2.1/specs/C2PA_Specification.html#_ingredient>.
pub const INGREDIENT: &str = "c2pa.ingredient";

/// Label prefix for a creative work assertion.
///
/// See <https://c2pa.org/specifications/specifications/2.1/specs/C2PA_Specification.html#_creative_work>.
pub const CREATIVE_WORK: &str = "stds.schema-org.CreativeWork";

const INSTANCE_SEPARATOR: &str = "__";

/// Returns the label without its instance suffix.
///
/// ```
/// # use c2pa_lineage::assertions::labels;
/// assert_eq!(labels::label_root("c2pa.ingredient__2"), "c2pa.ingredient");
/// assert_eq!(labels::label_root("com.c2c.policy.v1"), "com.c2c.policy.v1");
/// ```
pub fn label_root(label: &str) -> &str {
    match label.rsplit_once(INSTANCE_SEPARATOR) {
        Some((root, instance))
            if !root.is_empty()
                && !instance.is_empty()
                && instance.bytes().all(|b| b.is_ascii_digit()) =>
        {
            root
        }
        _ => label,
    }
}

/// Returns the instance number encoded in a label, if any.
pub fn label_instance(label: &str) -> Option<usize> {
    let root = label_root(label);
    if root.len() == label.len() {
        return None;
    }
    label[root.len() + INSTANCE_SEPARATOR.len()..].parse().ok()
}

/// Returns the label for the `instance`th assertion with label `root`.
///
/// The first instance has no suffix.
pub fn instance_label(root: &str, instance: usize) -> String {
    if instance == 0 {
        root.to_string()
    } else {
        format!("{root}{INSTANCE_SEPARATOR}{instance}")
    }
}

/// Returns `true` if the label names an ingredient assertion.
pub fn is_ingredient(label: &str) -> bool {
    label_root(label) == INGREDIENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_suffixes() {
        assert_eq!(label_root("c2pa.ingredient"), "c2pa.ingredient");
        assert_eq!(label_root("c2pa.ingredient__12"), "c2pa.ingredient");
        assert_eq!(label_root("c2pa.ingredient__x"), "c2pa.ingredient__x");
        assert_eq!(label_root("__1"), "__1");
        assert_eq!(label_instance("c2pa.ingredient__12"), Some(12));
        assert_eq!(label_instance("c2pa.ingredient"), None);
        assert_eq!(instance_label(INGREDIENT, 0), "c2pa.ingredient");
        assert_eq!(instance_label(INGREDIENT, 3), "c2pa.ingredient__3");
    }

    #[test]
    fn ingredient_labels() {
        assert!(is_ingredient("c2pa.ingredient"));
        assert!(is_ingredient("c2pa.ingredient__1"));
        assert!(!is_ingredient("c2pa.ingredients"));
        assert!(!is_ingredient(ACTIONS));
    }
}
