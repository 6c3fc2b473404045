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

//! Decoding of C2PA manifest stores.
//!
//! A manifest store is a `jumb` superbox labelled `c2pa` holding one or
//! more manifest superboxes. The last manifest is the active one; the
//! others are manifests of its ingredients shipped for offline
//! verification.

use std::collections::HashMap;

use log::debug;

use crate::{
    assertion::{Assertion, ContentKind},
    claim::Claim,
    claim_signature::ClaimSignature,
    jumbf::{
        boxes::{
            BMFFBox, BoxReader, JUMBFCBORContentBox, JUMBFJSONContentBox, JUMBFSuperBox,
            JUMBFUnknownContentBox, CAI_ASSERTION_STORE_UUID, CAI_BLOCK_UUID, CAI_CLAIM_UUID,
            CAI_SIGNATURE_UUID, CAI_STORE_UUID,
        },
        labels,
    },
    manifest::Manifest,
    settings::DEFAULT_MAX_MANIFEST_SIZE,
    Error, HashedUri, Result,
};

/// All manifests decoded from one manifest store.
#[derive(Clone, Debug)]
pub struct ManifestStore {
    manifests: Vec<Manifest>,
}

impl ManifestStore {
    /// Manifests in store order; the active manifest is last.
    pub fn manifests(&self) -> &[Manifest] {
        &self.manifests
    }

    /// The active manifest, carrying every other manifest of the store as
    /// embedded manifests.
    pub fn active_manifest(&self) -> &Manifest {
        // A store is never empty once decoded.
        &self.manifests[self.manifests.len() - 1]
    }

    /// Finds a manifest of this store by its manifest hash.
    pub fn get(&self, manifest_hash: &HashedUri) -> Option<&Manifest> {
        self.manifests
            .iter()
            .find(|m| m.manifest_hash() == manifest_hash)
    }

    pub fn into_active(mut self) -> Manifest {
        let last = self.manifests.len() - 1;
        self.manifests.swap_remove(last)
    }
}

/// Decodes a manifest store and returns its active manifest.
pub fn parse(bytes: &[u8]) -> Result<Manifest> {
    parse_with_limit(bytes, DEFAULT_MAX_MANIFEST_SIZE)
}

/// Like [`parse`], rejecting stores larger than `max_size` bytes.
pub fn parse_with_limit(bytes: &[u8], max_size: usize) -> Result<Manifest> {
    Ok(parse_store_with_limit(bytes, max_size)?.into_active())
}

/// Decodes every manifest in a manifest store.
pub fn parse_store(bytes: &[u8]) -> Result<ManifestStore> {
    parse_store_with_limit(bytes, DEFAULT_MAX_MANIFEST_SIZE)
}

/// Like [`parse_store`], rejecting stores larger than `max_size` bytes
/// before decoding anything.
pub fn parse_store_with_limit(bytes: &[u8], max_size: usize) -> Result<ManifestStore> {
    if bytes.len() > max_size {
        return Err(Error::ManifestTooLarge {
            size: bytes.len(),
            limit: max_size,
        });
    }
    if bytes.is_empty() {
        return Err(Error::InvalidStructure("manifest store is empty".into()));
    }

    let cai_block = BoxReader::read_jumbf(bytes)?;

    let desc_box = cai_block.desc_box();
    if desc_box.uuid() != CAI_BLOCK_UUID || desc_box.label() != labels::MANIFEST_STORE {
        return Err(Error::InvalidStructure(format!(
            "top level box {:?} is not a c2pa manifest store",
            desc_box.label()
        )));
    }

    let mut manifests: Vec<Manifest> = Vec::new();
    for cai_store_box in cai_block.child_superboxes() {
        // ignore unknown boxes at the store level
        if cai_store_box.desc_box().uuid() != CAI_STORE_UUID {
            debug!(
                "skipping unknown box {:?} in manifest store",
                cai_store_box.desc_box().label()
            );
            continue;
        }

        let manifest = parse_manifest(cai_store_box)?;
        if manifests.iter().any(|m| m.label() == manifest.label()) {
            return Err(Error::InvalidStructure(format!(
                "manifest {} appears twice",
                manifest.label()
            )));
        }
        manifests.push(manifest);
    }

    let Some(mut active) = manifests.pop() else {
        return Err(Error::InvalidStructure(
            "manifest store holds no manifests".into(),
        ));
    };
    active.set_embedded(manifests.clone());
    manifests.push(active);

    Ok(ManifestStore { manifests })
}

fn parse_manifest(cai_store_box: &JUMBFSuperBox) -> Result<Manifest> {
    let label = cai_store_box.desc_box().label();
    if label.is_empty() {
        return Err(Error::InvalidStructure("manifest has no label".into()));
    }

    let mut assertion_store = None;
    let mut claim_box = None;
    let mut signature_box = None;

    for sbox in cai_store_box.child_superboxes() {
        let slot = match sbox.desc_box().uuid().as_str() {
            CAI_ASSERTION_STORE_UUID => &mut assertion_store,
            CAI_CLAIM_UUID => &mut claim_box,
            CAI_SIGNATURE_UUID => &mut signature_box,
            uuid => {
                return Err(Error::InvalidStructure(format!(
                    "manifest {label} contains unknown box {:?} ({uuid})",
                    sbox.desc_box().label()
                )))
            }
        };
        if slot.replace(sbox).is_some() {
            return Err(Error::InvalidStructure(format!(
                "manifest {label} contains more than one {:?} box",
                sbox.desc_box().label()
            )));
        }
    }

    let claim_box = claim_box
        .ok_or_else(|| Error::InvalidStructure(format!("manifest {label} has no claim")))?;
    let signature_box = signature_box
        .ok_or_else(|| Error::InvalidStructure(format!("manifest {label} has no signature")))?;
    let assertion_store = assertion_store.ok_or_else(|| {
        Error::InvalidStructure(format!("manifest {label} has no assertion store"))
    })?;

    let claim_bytes = claim_box
        .content_box()
        .and_then(|b| b.as_any().downcast_ref::<JUMBFJSONContentBox>())
        .map(|b| b.json().to_vec())
        .ok_or_else(|| {
            Error::InvalidStructure(format!("claim of manifest {label} is not a JSON box"))
        })?;
    let claim = Claim::from_bytes(&claim_bytes)?;

    let cose_bytes = signature_box
        .content_box()
        .and_then(|b| b.as_any().downcast_ref::<JUMBFCBORContentBox>())
        .map(|b| b.cbor())
        .ok_or_else(|| {
            Error::InvalidStructure(format!("signature of manifest {label} is not a CBOR box"))
        })?;
    let claim_signature = ClaimSignature::from_cose(cose_bytes, &claim_bytes)?;

    let mut boxes = read_assertion_boxes(label, assertion_store)?;

    let mut assertions = Vec::with_capacity(claim.assertion_references().len());
    let mut unresolved = Vec::new();
    for reference in claim.assertion_references() {
        // malformed references are reported by validation
        let Some(assertion_label) = reference.label() else {
            continue;
        };

        if claim.is_redacted(&assertion_label) {
            boxes.remove(&assertion_label);
            assertions.push(Assertion::redacted(&assertion_label, reference.hash));
            continue;
        }

        match boxes.remove(&assertion_label) {
            Some((kind, raw)) => assertions.push(Assertion::from_parts(
                &assertion_label,
                reference.hash,
                kind,
                raw,
            )),
            None => {
                debug!("assertion {assertion_label} of manifest {label} is missing");
                unresolved.push(assertion_label);
            }
        }
    }

    for unclaimed in boxes.keys() {
        debug!("ignoring unclaimed assertion {unclaimed} in manifest {label}");
    }

    Manifest::new(
        label,
        claim_bytes,
        claim,
        claim_signature,
        assertions,
        unresolved,
    )
}

fn read_assertion_boxes(
    manifest_label: &str,
    assertion_store: &JUMBFSuperBox,
) -> Result<HashMap<String, (ContentKind, Vec<u8>)>> {
    let mut boxes = HashMap::new();

    for assertion_box in assertion_store.child_superboxes() {
        let label = assertion_box.desc_box().label().to_string();

        let content = assertion_box.content_box().ok_or_else(|| {
            Error::InvalidStructure(format!(
                "assertion {label} of manifest {manifest_label} has no content"
            ))
        })?;
        let content = content_of(content).ok_or_else(|| {
            Error::InvalidStructure(format!(
                "assertion {label} of manifest {manifest_label} has unreadable content"
            ))
        })?;

        if boxes.insert(label.clone(), content).is_some() {
            return Err(Error::InvalidStructure(format!(
                "assertion {label} appears twice in manifest {manifest_label}"
            )));
        }
    }

    Ok(boxes)
}

fn content_of(content: &dyn BMFFBox) -> Option<(ContentKind, Vec<u8>)> {
    let any = content.as_any();
    if let Some(json) = any.downcast_ref::<JUMBFJSONContentBox>() {
        Some((ContentKind::Json, json.json().to_vec()))
    } else if let Some(cbor) = any.downcast_ref::<JUMBFCBORContentBox>() {
        Some((ContentKind::Cbor, cbor.cbor().to_vec()))
    } else {
        any.downcast_ref::<JUMBFUnknownContentBox>()
            .map(|other| (ContentKind::Other(other.box_type()), other.data().to_vec()))
    }
}
