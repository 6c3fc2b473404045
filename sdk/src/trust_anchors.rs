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

use c2pa_lineage_crypto::cose::{CertificateTrustPolicy, Verifier};

use crate::{settings, Error, Result};

/// The trust configuration a manifest is validated against.
///
/// Claim signers are checked against one [`CertificateTrustPolicy`] and
/// time-stamp authorities against a second one. An empty `TrustAnchors`
/// trusts nothing, so every signature validates as
/// `signingCredential.untrusted`.
#[derive(Clone, Debug)]
pub struct TrustAnchors {
    signing: CertificateTrustPolicy,
    time_stamping: CertificateTrustPolicy,
}

impl TrustAnchors {
    pub fn new() -> Self {
        Self {
            signing: CertificateTrustPolicy::new(),
            time_stamping: CertificateTrustPolicy::for_time_stamping(),
        }
    }

    /// Creates trust anchors for claim signers from a PEM bundle of root
    /// certificates.
    pub fn from_pem(anchors_pem: &[u8]) -> Result<Self> {
        let mut anchors = Self::new();
        anchors.add_trust_anchors(anchors_pem)?;
        Ok(anchors)
    }

    /// Creates trust anchors from the `trust` section of [`Settings`].
    ///
    /// [`Settings`]: crate::settings::Settings
    pub fn from_settings(trust: &settings::Trust) -> Result<Self> {
        let mut anchors = Self::new();

        if let Some(pem) = &trust.trust_anchors {
            anchors.add_trust_anchors(unescape(pem).as_bytes())?;
        }
        if let Some(pem) = &trust.tsa_trust_anchors {
            anchors.add_tsa_trust_anchors(unescape(pem).as_bytes())?;
        }
        if let Some(allowed) = &trust.allowed_list {
            anchors.add_allowed_certificates(unescape(allowed).as_bytes())?;
        }
        if let Some(revoked) = &trust.revoked {
            anchors.add_revoked_certificates(unescape(revoked).as_bytes())?;
        }
        if let Some(ekus) = &trust.trust_config {
            anchors.add_valid_ekus(ekus.as_bytes());
        }

        Ok(anchors)
    }

    /// Adds root certificates, as PEM, that claim signers may chain to.
    pub fn add_trust_anchors(&mut self, pem: &[u8]) -> Result<()> {
        self.signing
            .add_trust_anchors(pem)
            .map_err(|e| Error::InvalidSettings(format!("trust anchors: {e}")))
    }

    /// Adds root certificates, as PEM, that time-stamp authorities may
    /// chain to.
    pub fn add_tsa_trust_anchors(&mut self, pem: &[u8]) -> Result<()> {
        self.time_stamping
            .add_trust_anchors(pem)
            .map_err(|e| Error::InvalidSettings(format!("time-stamp trust anchors: {e}")))
    }

    /// Adds end-entity certificates that are trusted for claim signing
    /// without chaining to an anchor.
    pub fn add_allowed_certificates(&mut self, pems_or_hashes: &[u8]) -> Result<()> {
        self.signing
            .add_end_entity_credentials(pems_or_hashes)
            .map_err(|e| Error::InvalidSettings(format!("allowed list: {e}")))
    }

    /// Adds certificates that are never trusted, wherever they appear in a
    /// chain.
    pub fn add_revoked_certificates(&mut self, pems_or_hashes: &[u8]) -> Result<()> {
        self.signing
            .add_revoked_credentials(pems_or_hashes)
            .map_err(|e| Error::InvalidSettings(format!("revoked list: {e}")))?;
        self.time_stamping
            .add_revoked_credentials(pems_or_hashes)
            .map_err(|e| Error::InvalidSettings(format!("revoked list: {e}")))
    }

    /// Adds EKU OIDs, one per line, accepted for claim signers.
    pub fn add_valid_ekus(&mut self, eku_oids: &[u8]) {
        self.signing.add_valid_ekus(eku_oids);
    }

    pub fn signing_policy(&self) -> &CertificateTrustPolicy {
        &self.signing
    }

    pub fn time_stamping_policy(&self) -> &CertificateTrustPolicy {
        &self.time_stamping
    }

    pub(crate) fn verifier(&self) -> Verifier<'_> {
        Verifier::new(&self.signing, &self.time_stamping)
    }
}

impl Default for TrustAnchors {
    fn default() -> Self {
        Self::new()
    }
}

// allow for JSON-encoded PEMs with \n
fn unescape(s: &str) -> String {
    s.replace("\\n", "\n")
}
