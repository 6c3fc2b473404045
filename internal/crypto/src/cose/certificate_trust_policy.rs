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

use std::{collections::HashSet, io::BufRead, str::FromStr};

use asn1_rs::{oid, Oid};
use thiserror::Error;
use x509_parser::{extensions::ExtendedKeyUsage, pem::Pem};

use crate::{base64, hash::sha256};

/// Which certificate purpose a [`CertificateTrustPolicy`] accepts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EkuPurpose {
    /// Claim signers: `id-kp-emailProtection` or any configured additional
    /// EKU.
    #[default]
    ClaimSigning,

    /// Time-stamp authorities: `id-kp-timeStamping`.
    TimeStamping,
}

/// Describes how a certificate was found to be trusted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrustAnchorType {
    /// The certificate chain ends at one of the configured trust anchors.
    TrustAnchor,

    /// The end-entity certificate appears on the allow-list of end-entity
    /// certificates.
    EndEntity,
}

/// A `CertificateTrustPolicy` is configured with information about trust
/// anchors, privately-accepted end-entity certificates, revoked
/// certificates, and allowed EKUs. It can be used to evaluate a signing
/// certificate against those policies.
///
/// A validator keeps one policy for claim signers and a second one for
/// time-stamp authorities; see [`EkuPurpose`].
#[derive(Clone, Debug, Default)]
pub struct CertificateTrustPolicy {
    /// Trust anchors (root X.509 certificates) in DER format.
    trust_anchor_ders: Vec<Vec<u8>>,

    /// Base-64 encoded SHA-256 hash of end-entity certificates (root X.509
    /// certificates) in DER format.
    end_entity_cert_set: HashSet<String>,

    /// Base-64 encoded SHA-256 hash of revoked certificates in DER format.
    revoked_cert_set: HashSet<String>,

    /// Additional extended key usage (EKU) OIDs.
    additional_ekus: HashSet<String>,

    purpose: EkuPurpose,
}

impl CertificateTrustPolicy {
    /// Create a new, empty certificate trust policy for claim signers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new, empty certificate trust policy for time-stamp
    /// authorities.
    pub fn for_time_stamping() -> Self {
        Self {
            purpose: EkuPurpose::TimeStamping,
            ..Self::default()
        }
    }

    /// Return the certificate purpose this policy accepts.
    pub fn purpose(&self) -> EkuPurpose {
        self.purpose
    }

    /// Evaluate a certificate against the trust policy described by this
    /// struct.
    ///
    /// `chain_der` holds the certificates that follow the end-entity
    /// certificate. Validity periods are evaluated at `signing_time_epoch`
    /// (seconds since the Unix epoch) or at the current time if `None`.
    ///
    /// Returns `Ok(TrustAnchorType)` if the certificate is trusted or one of
    /// the errors in [`CertificateTrustError`] otherwise.
    pub fn check_certificate_trust(
        &self,
        chain_der: &[Vec<u8>],
        end_entity_cert_der: &[u8],
        signing_time_epoch: Option<i64>,
    ) -> Result<TrustAnchorType, CertificateTrustError> {
        // Revocation overrides every other way of being trusted.
        let revoked = std::iter::once(end_entity_cert_der)
            .chain(chain_der.iter().map(Vec::as_slice))
            .any(|der| self.is_revoked(der));

        if revoked {
            log::debug!(
                "certificate {} or its chain is revoked",
                base64_sha256_cert_der(end_entity_cert_der)
            );
            return Err(CertificateTrustError::CertificateRevoked);
        }

        // First check to see if the certificate appears in the allowed set of
        // end-entity certificates.
        let cert_hash = base64_sha256_cert_der(end_entity_cert_der);
        if self.end_entity_cert_set.contains(&cert_hash) {
            return Ok(TrustAnchorType::EndEntity);
        }

        let signing_time_epoch =
            signing_time_epoch.unwrap_or_else(|| chrono::Utc::now().timestamp());

        crate::raw_signature::rust_native::check_certificate_trust::check_certificate_trust(
            self,
            chain_der,
            end_entity_cert_der,
            signing_time_epoch,
        )
    }

    /// Add trust anchors (root X.509 certificates) that shall be accepted
    /// when verifying certificates.
    ///
    /// The trust anchors must be PEM-encoded. Any number of trust anchors may
    /// be provided in a single call.
    pub fn add_trust_anchors(
        &mut self,
        trust_anchor_pems: &[u8],
    ) -> Result<(), InvalidCertificateError> {
        for maybe_pem in Pem::iter_from_buffer(trust_anchor_pems) {
            // NOTE: The `x509_parser::pem::Pem` struct's `contents` field contains the
            // decoded PEM content, which is expected to be in DER format.
            match maybe_pem {
                Ok(pem) => self.trust_anchor_ders.push(pem.contents),
                Err(e) => {
                    return Err(InvalidCertificateError(e.to_string()));
                }
            }
        }

        Ok(())
    }

    /// Add individual end-entity credentials that shall be accepted when
    /// verifying certificates.
    ///
    /// The credentials may be provided as PEM-encoded certificates or as
    /// base-64 encoded SHA-256 hashes of the DER form, one per line.
    pub fn add_end_entity_credentials(
        &mut self,
        end_entity_cert_pems: &[u8],
    ) -> Result<(), InvalidCertificateError> {
        let hashes = cert_hashes_from_pems_or_lines(end_entity_cert_pems)?;
        self.end_entity_cert_set.extend(hashes);
        Ok(())
    }

    /// Add certificates that shall be rejected wherever they appear in a
    /// chain.
    ///
    /// Accepts the same formats as
    /// [`add_end_entity_credentials`](Self::add_end_entity_credentials).
    pub fn add_revoked_credentials(
        &mut self,
        revoked_cert_pems: &[u8],
    ) -> Result<(), InvalidCertificateError> {
        let hashes = cert_hashes_from_pems_or_lines(revoked_cert_pems)?;
        self.revoked_cert_set.extend(hashes);
        Ok(())
    }

    /// Add extended key usage (EKU) values that shall be accepted when
    /// verifying claim signing certificates.
    ///
    /// This function reads zero or more EKU object identifiers (OIDs) in
    /// dotted-decimal notation (one per line). Lines that can not be parsed
    /// as OIDs, such as comments or blank lines, are quietly ignored.
    pub fn add_valid_ekus(&mut self, eku_oids: &[u8]) {
        let Ok(eku_oids) = std::str::from_utf8(eku_oids) else {
            return;
        };

        for line in eku_oids.lines() {
            let line = line.trim();
            if let Ok(_oid) = Oid::from_str(line) {
                self.additional_ekus.insert(line.to_string());
            }
        }
    }

    /// Remove all trust anchors, private credentials, revocations, and EKUs
    /// previously configured.
    pub fn clear(&mut self) {
        self.trust_anchor_ders.clear();
        self.end_entity_cert_set.clear();
        self.revoked_cert_set.clear();
        self.additional_ekus.clear();
    }

    /// Return `true` if no trust anchor and no end-entity credential has been
    /// configured.
    pub fn is_empty(&self) -> bool {
        self.trust_anchor_ders.is_empty() && self.end_entity_cert_set.is_empty()
    }

    /// Return an iterator over the trust anchors.
    ///
    /// Each anchor will be returned in DER format.
    pub(crate) fn trust_anchor_ders(&self) -> impl Iterator<Item = &'_ Vec<u8>> {
        self.trust_anchor_ders.iter()
    }

    pub(crate) fn is_revoked(&self, cert_der: &[u8]) -> bool {
        !self.revoked_cert_set.is_empty()
            && self
                .revoked_cert_set
                .contains(&base64_sha256_cert_der(cert_der))
    }

    /// Return the matching EKU OID if the certificate's EKU is allowed for
    /// this policy's purpose.
    pub(crate) fn has_allowed_eku<'a>(&self, eku: &'a ExtendedKeyUsage) -> Option<Oid<'a>> {
        match self.purpose {
            EkuPurpose::TimeStamping => {
                if eku.time_stamping {
                    return Some(TIMESTAMPING_OID.clone());
                }
                None
            }

            EkuPurpose::ClaimSigning => {
                if eku.email_protection {
                    return Some(EMAIL_PROTECTION_OID.clone());
                }

                // x509-parser lifts well-known EKUs out of `other`.
                let known = [
                    (eku.server_auth, &SERVER_AUTH_OID),
                    (eku.client_auth, &CLIENT_AUTH_OID),
                    (eku.code_signing, &CODE_SIGNING_OID),
                    (eku.ocsp_signing, &OCSP_SIGNING_OID),
                ];

                known
                    .into_iter()
                    .filter(|(present, _)| *present)
                    .map(|(_, oid)| -> Oid<'a> { oid.clone() })
                    .chain(eku.other.iter().cloned())
                    .find(|oid| self.additional_ekus.contains(&oid.to_id_string()))
            }
        }
    }
}

fn cert_hashes_from_pems_or_lines(pems: &[u8]) -> Result<Vec<String>, InvalidCertificateError> {
    let mut hashes = vec![];
    let mut inside_pem_block = false;

    for line in pems.lines().map_while(Result::ok) {
        let line = line.trim();
        if line.contains("-----BEGIN") {
            inside_pem_block = true;
        }
        if line.contains("-----END") {
            inside_pem_block = false;
            continue;
        }
        if !inside_pem_block && line.len() == 44 && base64::decode(line).is_ok() {
            hashes.push(line.to_string());
        }
    }

    for maybe_pem in Pem::iter_from_buffer(pems) {
        match maybe_pem {
            Ok(pem) => hashes.push(base64_sha256_cert_der(&pem.contents)),
            Err(e) => {
                return Err(InvalidCertificateError(e.to_string()));
            }
        }
    }

    Ok(hashes)
}

/// Return the base-64 encoded SHA-256 hash of a DER certificate, the form
/// used by allow-lists and revocation lists.
pub fn base64_sha256_cert_der(cert_der: &[u8]) -> String {
    let cert_sha256 = sha256(cert_der);
    base64::encode(&cert_sha256)
}

/// Describes errors that can be identified when evaluating a certificate's
/// trust.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum CertificateTrustError {
    /// The certificate does not chain to any configured trust anchor and is
    /// not on the end-entity allow-list.
    #[error("the certificate is not trusted")]
    CertificateNotTrusted,

    /// The certificate, or a certificate in its chain, is on the revocation
    /// list.
    #[error("the certificate or a certificate in its chain has been revoked")]
    CertificateRevoked,

    /// A certificate in the chain was outside its validity period at the
    /// signing time.
    #[error("a certificate in the chain was not valid at the signing time")]
    CertificateOutsideValidityPeriod,

    /// The certificate contains an invalid extended key usage (EKU) value.
    #[error("the certificate contains an invalid extended key usage (EKU) value")]
    InvalidEku,

    /// An error was reported by the underlying cryptography implementation.
    #[error("an error was reported by the cryptography library: {0}")]
    CryptoLibraryError(String),

    /// The certificate (or certificate chain) that was presented is invalid.
    #[error("the certificate or certificate chain is invalid")]
    InvalidCertificate,

    /// An unexpected internal error occured while evaluating the certificate.
    #[error("internal error ({0})")]
    InternalError(String),
}

/// This error can occur when adding certificates to a
/// [`CertificateTrustPolicy`].
#[derive(Debug, Eq, Error, PartialEq)]
#[error("Unable to parse certificate list: {0}")]
pub struct InvalidCertificateError(pub(crate) String);

pub(crate) static EMAIL_PROTECTION_OID: Oid<'static> = oid!(1.3.6 .1 .5 .5 .7 .3 .4);
pub(crate) static TIMESTAMPING_OID: Oid<'static> = oid!(1.3.6 .1 .5 .5 .7 .3 .8);
static SERVER_AUTH_OID: Oid<'static> = oid!(1.3.6 .1 .5 .5 .7 .3 .1);
static CLIENT_AUTH_OID: Oid<'static> = oid!(1.3.6 .1 .5 .5 .7 .3 .2);
static CODE_SIGNING_OID: Oid<'static> = oid!(1.3.6 .1 .5 .5 .7 .3 .3);
static OCSP_SIGNING_OID: Oid<'static> = oid!(1.3.6 .1 .5 .5 .7 .3 .9);
