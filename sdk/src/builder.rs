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

//! Construction and signing of manifest stores.

use chrono::{DateTime, Utc};
use c2pa_lineage_crypto::{cose, raw_signature::RawSigner, time_stamp::TimeStampProvider};
use log::debug;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    assertion::{Assertion, AssertionBase, ContentKind},
    assertions::{labels, IngredientAssertion, IngredientReference, Relationship},
    claim::{AssertionReference, Claim},
    claim_generator_info::ClaimGeneratorInfo,
    jumbf::{
        boxes::{
            to_bytes, JUMBFCBORContentBox, JUMBFJSONContentBox, JUMBFSuperBox,
            JUMBFUnknownContentBox, CAI_ASSERTION_STORE_UUID, CAI_BLOCK_UUID,
            CAI_CBOR_ASSERTION_UUID, CAI_CLAIM_UUID, CAI_EMBEDDED_FILE_UUID,
            CAI_JSON_ASSERTION_UUID, CAI_SIGNATURE_UUID, CAI_STORE_UUID,
        },
        labels as jumbf_labels,
    },
    manifest::Manifest,
    parser::parse_with_limit,
    settings::Settings,
    Error, Result,
};

/// A freshly signed manifest and the manifest store it was written to.
#[derive(Clone, Debug)]
pub struct SignedManifest {
    /// The new manifest, decoded from `bytes`.
    pub manifest: Manifest,
    /// The serialized manifest store.
    pub bytes: Vec<u8>,
}

/// Use a `ManifestBuilder` to assemble and sign a new manifest.
///
/// # Example
///
/// ```no_run
/// # use c2pa_lineage::{assertions::{c2pa_action, Action, Actions}, ClaimGeneratorInfo, ManifestBuilder, Result};
/// # use c2pa_lineage_crypto::raw_signature::RawSigner;
/// # fn sign(signer: &dyn RawSigner) -> Result<()> {
/// let mut builder = ManifestBuilder::new(ClaimGeneratorInfo::new("my-pipeline"));
/// builder
///     .add_typed_assertion(&Actions::new().add_action(Action::new(c2pa_action::CREATED)))?
///     .add_assertion_json("com.example.policy", &serde_json::json!({"license": "CC-BY"}))?;
///
/// let signed = builder.sign(signer, None)?;
/// println!("{}", signed.manifest.manifest_hash());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ManifestBuilder {
    label: String,
    claim_generator_info: ClaimGeneratorInfo,
    created: Option<DateTime<Utc>>,
    assertions: Vec<Assertion>,
    redactions: Vec<String>,
    // Manifests written ahead of the new one, ancestors first.
    embedded: Vec<Manifest>,
}

impl ManifestBuilder {
    /// Creates a builder for a manifest made by `claim_generator_info`.
    pub fn new(claim_generator_info: ClaimGeneratorInfo) -> Self {
        Self {
            label: format!("urn:uuid:{}", Uuid::new_v4()),
            claim_generator_info,
            created: None,
            assertions: Vec::new(),
            redactions: Vec::new(),
            embedded: Vec::new(),
        }
    }

    /// Creates a builder whose claim generator comes from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut info = ClaimGeneratorInfo::new(settings.core.claim_generator.clone());
        info.set_version(env!("CARGO_PKG_VERSION"));
        Self::new(info)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sets the JUMBF label of the new manifest.
    pub fn set_label<S: Into<String>>(&mut self, label: S) -> &mut Self {
        self.label = label.into();
        self
    }

    pub fn set_claim_generator_info(&mut self, info: ClaimGeneratorInfo) -> &mut Self {
        self.claim_generator_info = info;
        self
    }

    /// Sets the claim creation time. The default is the signing time.
    pub fn set_created(&mut self, created: DateTime<Utc>) -> &mut Self {
        self.created = Some(created);
        self
    }

    /// Adds a CBOR assertion with an arbitrary label.
    pub fn add_assertion<S, T>(&mut self, label: S, data: &T) -> Result<&mut Self>
    where
        S: Into<String>,
        T: Serialize,
    {
        let assertion = Assertion::from_cbor(&label.into(), data)?;
        self.add_raw_assertion(assertion)
    }

    /// Adds a JSON assertion with an arbitrary label.
    pub fn add_assertion_json<S, T>(&mut self, label: S, data: &T) -> Result<&mut Self>
    where
        S: Into<String>,
        T: Serialize,
    {
        let value = serde_json::to_value(data)?;
        self.add_raw_assertion(Assertion::from_json_value(&label.into(), &value))
    }

    /// Adds an assertion of a type this crate knows, in its own encoding.
    pub fn add_typed_assertion<T: AssertionBase>(&mut self, assertion: &T) -> Result<&mut Self> {
        self.add_raw_assertion(assertion.to_assertion()?)
    }

    /// Adds an assertion exactly as given, raw bytes included.
    pub fn add_raw_assertion(&mut self, assertion: Assertion) -> Result<&mut Self> {
        if assertion.is_redacted() {
            return Err(Error::BadParam(format!(
                "assertion {} has no content",
                assertion.label()
            )));
        }
        if self.assertions.iter().any(|a| a.label() == assertion.label()) {
            return Err(Error::DuplicateAssertion(assertion.label().to_string()));
        }
        self.assertions.push(assertion);
        Ok(self)
    }

    /// Adds an ingredient citing `parent` and embeds `parent`, with the
    /// manifests embedded in it, ahead of the new manifest.
    ///
    /// Returns the reference actions use to point at the new ingredient
    /// assertion.
    pub fn add_ingredient(
        &mut self,
        parent: &Manifest,
        relationship: Relationship,
        asset_url: Option<&str>,
    ) -> Result<IngredientReference> {
        let reference = self.cite(parent, relationship, asset_url)?;

        for manifest in parent
            .embedded_manifests()
            .iter()
            .chain(std::iter::once(parent))
        {
            self.embed(manifest);
        }

        Ok(reference)
    }

    /// Adds an ingredient citing `parent` without embedding it. Readers
    /// find the parent's manifest through `asset_url`.
    pub fn add_remote_ingredient(
        &mut self,
        parent: &Manifest,
        relationship: Relationship,
        asset_url: &str,
    ) -> Result<IngredientReference> {
        self.cite(parent, relationship, Some(asset_url))
    }

    fn cite(
        &mut self,
        parent: &Manifest,
        relationship: Relationship,
        asset_url: Option<&str>,
    ) -> Result<IngredientReference> {
        let instance = self
            .assertions
            .iter()
            .filter(|a| labels::is_ingredient(a.label()))
            .count();
        let label = labels::instance_label(labels::INGREDIENT, instance);

        let mut ingredient = IngredientAssertion::new(
            relationship,
            *parent.manifest_hash(),
            parent.claim_signature().cose_bytes().to_vec(),
        )
        .set_title(parent.label());
        if let Some(asset_url) = asset_url {
            ingredient = ingredient.set_asset_url(asset_url);
        }

        let assertion = ingredient.to_assertion()?.with_label(&label);
        let reference = IngredientReference {
            url: assertion.url(),
            hash: *assertion.hashed_uri(),
        };
        self.add_raw_assertion(assertion)?;
        Ok(reference)
    }

    fn embed(&mut self, manifest: &Manifest) {
        let hash = manifest.manifest_hash();
        if self.embedded.iter().any(|m| m.manifest_hash() == hash) {
            return;
        }
        let mut flat = manifest.clone();
        flat.set_embedded(Vec::new());
        self.embedded.push(flat);
    }

    /// Marks an added assertion as redacted: the claim keeps its hash and
    /// lists it as redacted, and its content is not written.
    pub fn redact(&mut self, label: &str) -> Result<&mut Self> {
        if !self.assertions.iter().any(|a| a.label() == label) {
            return Err(Error::AssertionRedactionNotFound(label.to_string()));
        }
        if !self.redactions.iter().any(|r| r == label) {
            self.redactions.push(label.to_string());
        }
        Ok(self)
    }

    fn claim(&self) -> Claim {
        let mut claim = Claim::new(self.claim_generator_info.clone());
        if let Some(created) = self.created {
            claim.set_created(created);
        }
        for assertion in &self.assertions {
            claim.add_assertion_reference(AssertionReference::new(
                assertion.label(),
                *assertion.hashed_uri(),
            ));
        }
        for label in &self.redactions {
            claim.add_redaction(label);
        }
        claim
    }

    /// Signs the claim and writes the manifest store.
    ///
    /// With a time-stamp provider, a time-stamp token over the signature is
    /// attached to the COSE structure.
    pub fn sign(
        &self,
        signer: &dyn RawSigner,
        tsa: Option<&dyn TimeStampProvider>,
    ) -> Result<SignedManifest> {
        let claim_bytes = self.claim().to_bytes()?;
        let cose_bytes = cose::sign(signer, &claim_bytes, tsa)?;

        let mut cai_block = JUMBFSuperBox::new(jumbf_labels::MANIFEST_STORE, Some(CAI_BLOCK_UUID));
        for manifest in &self.embedded {
            cai_block.add_data_box(Box::new(manifest_box(
                manifest.label(),
                manifest.assertions().iter().filter(|a| !a.is_redacted()),
                manifest.claim_bytes(),
                manifest.claim_signature().cose_bytes(),
            )));
        }
        cai_block.add_data_box(Box::new(manifest_box(
            &self.label,
            self.assertions
                .iter()
                .filter(|a| !self.redactions.iter().any(|r| r == a.label())),
            &claim_bytes,
            &cose_bytes,
        )));

        let bytes = to_bytes(&cai_block)?;
        debug!(
            "signed manifest {} ({} bytes, {} embedded)",
            self.label,
            bytes.len(),
            self.embedded.len()
        );

        let manifest = parse_with_limit(&bytes, usize::MAX)?;
        Ok(SignedManifest { manifest, bytes })
    }
}

fn manifest_box<'a>(
    label: &str,
    assertions: impl Iterator<Item = &'a Assertion>,
    claim_bytes: &[u8],
    cose_bytes: &[u8],
) -> JUMBFSuperBox {
    let mut cai_store = JUMBFSuperBox::new(label, Some(CAI_STORE_UUID));

    let mut assertion_store =
        JUMBFSuperBox::new(jumbf_labels::ASSERTIONS, Some(CAI_ASSERTION_STORE_UUID));
    for assertion in assertions {
        assertion_store.add_data_box(Box::new(assertion_box(assertion)));
    }
    cai_store.add_data_box(Box::new(assertion_store));

    let mut claim_box = JUMBFSuperBox::new(jumbf_labels::CLAIM, Some(CAI_CLAIM_UUID));
    claim_box.add_data_box(Box::new(JUMBFJSONContentBox::new(claim_bytes.to_vec())));
    cai_store.add_data_box(Box::new(claim_box));

    let mut signature_box = JUMBFSuperBox::new(jumbf_labels::SIGNATURE, Some(CAI_SIGNATURE_UUID));
    signature_box.add_data_box(Box::new(JUMBFCBORContentBox::new(cose_bytes.to_vec())));
    cai_store.add_data_box(Box::new(signature_box));

    cai_store
}

fn assertion_box(assertion: &Assertion) -> JUMBFSuperBox {
    let raw = assertion.raw().to_vec();
    match assertion.content_kind() {
        ContentKind::Json => {
            let mut sbox = JUMBFSuperBox::new(assertion.label(), Some(CAI_JSON_ASSERTION_UUID));
            sbox.add_data_box(Box::new(JUMBFJSONContentBox::new(raw)));
            sbox
        }
        ContentKind::Cbor => {
            let mut sbox = JUMBFSuperBox::new(assertion.label(), Some(CAI_CBOR_ASSERTION_UUID));
            sbox.add_data_box(Box::new(JUMBFCBORContentBox::new(raw)));
            sbox
        }
        ContentKind::Other(box_type) => {
            let mut sbox = JUMBFSuperBox::new(assertion.label(), Some(CAI_EMBEDDED_FILE_UUID));
            sbox.add_data_box(Box::new(JUMBFUnknownContentBox::new(box_type, raw)));
            sbox
        }
    }
}
