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

use c2pa_lineage_status_tracker::{log_item, validation_codes::*, StatusTracker};
use coset::CoseSign1;
use x509_parser::{certificate::X509Certificate, prelude::FromDer};

use crate::{
    cose::{
        cert_chain_from_sign1, signing_alg_from_sign1, validate_cose_tst_info,
        CertificateTrustPolicy, CoseError, TrustAnchorType,
    },
    ec_utils::parse_ec_der_sig,
    raw_signature::{validator_for_signing_alg, SigningAlg},
    time_stamp::TstInfo,
};

/// A `Verifier` reads a COSE signature and reports on its validity,
/// recording the outcome of each check in a [`StatusTracker`].
///
/// Claim signers are evaluated against `trust_policy`; time-stamp
/// authorities against `tsa_trust_policy`.
#[derive(Clone, Copy, Debug)]
pub struct Verifier<'a> {
    trust_policy: &'a CertificateTrustPolicy,
    tsa_trust_policy: &'a CertificateTrustPolicy,
}

impl<'a> Verifier<'a> {
    /// Create a verifier over the given claim-signer and time-stamp
    /// authority trust policies.
    pub fn new(
        trust_policy: &'a CertificateTrustPolicy,
        tsa_trust_policy: &'a CertificateTrustPolicy,
    ) -> Self {
        Self {
            trust_policy,
            tsa_trust_policy,
        }
    }

    /// Evaluate the time stamp on a COSE signature without logging.
    ///
    /// Returns `None` if the signature carries no `sigTst` header.
    pub fn check_time_stamp(&self, sign1: &CoseSign1) -> Option<Result<TstInfo, CoseError>> {
        match validate_cose_tst_info(sign1, self.tsa_trust_policy) {
            Err(CoseError::NoTimeStampToken) if !super::has_time_stamp(sign1) => None,
            result => Some(result),
        }
    }

    /// Record the outcome of [`check_time_stamp`](Self::check_time_stamp).
    pub fn log_time_stamp(
        &self,
        label: &str,
        result: &Result<TstInfo, CoseError>,
        validation_log: &mut StatusTracker,
    ) {
        match result {
            Ok(tst_info) => {
                log_item!(
                    label.to_string(),
                    format!("time stamp trusted, generated at {}", tst_info.gen_time),
                    "log_time_stamp"
                )
                .validation_status(TIMESTAMP_TRUSTED)
                .success(validation_log);
            }
            Err(err) => {
                log_item!(label.to_string(), "time stamp untrusted", "log_time_stamp")
                    .validation_status(TIMESTAMP_UNTRUSTED)
                    .failure_no_throw(validation_log, err.to_string());
            }
        }
    }

    /// Check the signing certificate chain against the claim-signer trust
    /// policy.
    ///
    /// Validity periods are evaluated at the time stamp's generation time if
    /// `tst_info` is provided, or at the current time otherwise.
    pub fn verify_trust(
        &self,
        label: &str,
        sign1: &CoseSign1,
        tst_info: Option<&TstInfo>,
        validation_log: &mut StatusTracker,
    ) -> Result<TrustAnchorType, CoseError> {
        let result = cert_chain_from_sign1(sign1)
            .and_then(|certs| {
                let signing_time_epoch = tst_info.map(|tst_info| tst_info.gen_time.timestamp());

                let (end_entity_cert_der, chain_der) = certs
                    .split_first()
                    .ok_or(CoseError::MissingSigningCertificateChain)?;

                Ok(self.trust_policy.check_certificate_trust(
                    chain_der,
                    end_entity_cert_der,
                    signing_time_epoch,
                )?)
            });

        match result {
            Ok(tat) => {
                log_item!(
                    label.to_string(),
                    format!("signing certificate trusted, found in {tat:?} list"),
                    "verify_trust"
                )
                .validation_status(SIGNING_CREDENTIAL_TRUSTED)
                .success(validation_log);

                Ok(tat)
            }
            Err(err) => {
                log::debug!("signing certificate untrusted: {err}");

                log_item!(
                    label.to_string(),
                    format!("signing certificate untrusted: {err}"),
                    "verify_trust"
                )
                .validation_status(SIGNING_CREDENTIAL_UNTRUSTED)
                .failure_no_throw(validation_log, err.to_string());

                Err(err)
            }
        }
    }

    /// Verify the COSE signature over its (restored) payload with the public
    /// key of the end-entity certificate.
    pub fn verify_signature(
        &self,
        label: &str,
        sign1: &CoseSign1,
        validation_log: &mut StatusTracker,
    ) -> Result<SigningAlg, CoseError> {
        match verify_sign1(sign1) {
            Ok(alg) => {
                log_item!(label.to_string(), "claim signature valid", "verify_signature")
                    .validation_status(SIGNATURE_VALID)
                    .success(validation_log);

                Ok(alg)
            }
            Err(err) => {
                log_item!(
                    label.to_string(),
                    format!("claim signature invalid: {err}"),
                    "verify_signature"
                )
                .validation_status(SIGNATURE_INVALID)
                .failure_no_throw(validation_log, err.to_string());

                Err(err)
            }
        }
    }
}

/// Verify a COSE Sign1 structure whose payload is present.
pub(crate) fn verify_sign1(sign1: &CoseSign1) -> Result<SigningAlg, CoseError> {
    let alg = signing_alg_from_sign1(sign1)?;

    if matches!(alg, SigningAlg::Es256 | SigningAlg::Es384)
        && parse_ec_der_sig(&sign1.signature).is_ok()
    {
        // Should have been in P1363 format, not DER.
        return Err(CoseError::InvalidEcdsaSignature);
    }

    let certs = cert_chain_from_sign1(sign1)?;
    let end_entity_cert_der = certs
        .first()
        .ok_or(CoseError::MissingSigningCertificateChain)?;

    let (_rem, sign_cert) = X509Certificate::from_der(end_entity_cert_der)
        .map_err(|_| CoseError::CborParsingError("invalid X509 certificate".to_string()))?;

    let tbs = sign1.tbs_data(b"");

    let validator = validator_for_signing_alg(alg).ok_or(CoseError::UnsupportedSigningAlgorithm)?;
    validator.validate(&sign1.signature, &tbs, sign_cert.public_key().raw)?;

    Ok(alg)
}
