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

//! Labels for the JUMBF boxes of a C2PA manifest store and helpers for the
//! JUMBF URIs that point into it.
//!
//! See <https://c2pa.org/specifications/specifications/2.1/specs/C2PA_Specification.html#_c2pa_box_details>.

/// Label for the C2PA manifest store.
pub const MANIFEST_STORE: &str = "c2pa";

/// Label for the C2PA assertion store box.
pub const ASSERTIONS: &str = "c2pa.assertions";

/// Label for the C2PA claim box.
pub const CLAIM: &str = "c2pa.claim";

/// Label for the C2PA claim signature box.
pub const SIGNATURE: &str = "c2pa.signature";

const JUMBF_PREFIX: &str = "self#jumbf";

/// Converts a manifest label to an absolute JUMBF URI.
pub fn to_manifest_uri(manifest_label: &str) -> String {
    format!("{JUMBF_PREFIX}=/{MANIFEST_STORE}/{manifest_label}")
}

/// Converts a manifest label and an assertion label into an absolute JUMBF
/// URI.
pub fn to_assertion_uri(manifest_label: &str, assertion_label: &str) -> String {
    format!(
        "{}/{}/{}",
        to_manifest_uri(manifest_label),
        ASSERTIONS,
        assertion_label
    )
}

/// Converts a manifest label to the absolute JUMBF URI of its signature.
pub fn to_signature_uri(manifest_label: &str) -> String {
    format!("{}/{}", to_manifest_uri(manifest_label), SIGNATURE)
}

/// JUMBF URI of an assertion relative to its own manifest, as written in
/// claims.
pub fn to_relative_assertion_uri(assertion_label: &str) -> String {
    format!("{JUMBF_PREFIX}={ASSERTIONS}/{assertion_label}")
}

/// JUMBF URI of a manifest's signature relative to the manifest.
pub fn relative_signature_uri() -> String {
    format!("{JUMBF_PREFIX}={SIGNATURE}")
}

// Split off the JUMBF prefix and normalize a leading "/".
fn to_normalized_uri(uri: &str) -> String {
    let output = uri.split_once('=').map_or(uri, |(_, path)| path);

    let manifest_store_part = format!("{MANIFEST_STORE}/");
    if output.starts_with(&manifest_store_part) {
        format!("/{output}")
    } else {
        output.to_string()
    }
}

/// Given an absolute JUMBF URI, returns the manifest label contained within
/// it.
pub fn manifest_label_from_uri(uri: &str) -> Option<String> {
    let raw_uri = to_normalized_uri(uri);
    let parts: Vec<&str> = raw_uri.split('/').collect();
    if parts.len() > 2 && parts[1] == MANIFEST_STORE && !parts[2].is_empty() {
        Some(parts[2].to_string())
    } else {
        None
    }
}

/// Extracts an assertion label from an absolute or relative JUMBF URI.
pub fn assertion_label_from_uri(uri: &str) -> Option<String> {
    let raw_uri = to_normalized_uri(uri);
    let parts: Vec<&str> = raw_uri.split('/').collect();
    if parts.len() > 4 && parts[1] == MANIFEST_STORE && parts[3] == ASSERTIONS {
        Some(parts[4].to_string())
    } else if parts.len() > 1 && parts[0] == ASSERTIONS && !parts[1].is_empty() {
        Some(parts[1].to_string())
    } else {
        None
    }
}

/// Returns the name of the box a JUMBF URI points to.
pub fn box_name_from_uri(uri: &str) -> Option<String> {
    to_normalized_uri(uri)
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
