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

use x509_parser::{certificate::X509Certificate, prelude::FromDer, time::ASN1Time};

use super::validators::{signing_alg_for_x509_sig_alg, validator_for_signing_alg};
use crate::{
    cose::{CertificateTrustError, CertificateTrustPolicy, TrustAnchorType},
    raw_signature::RawSignatureValidationError,
};

pub(crate) fn check_certificate_trust(
    ctp: &CertificateTrustPolicy,
    chain_der: &[Vec<u8>],
    cert_der: &[u8],
    signing_time_epoch: i64,
) -> Result<TrustAnchorType, CertificateTrustError> {
    if ctp.trust_anchor_ders().count() == 0 {
        return Err(CertificateTrustError::CertificateNotTrusted);
    }

    let Ok((_rem, cert)) = X509Certificate::from_der(cert_der) else {
        return Err(CertificateTrustError::InvalidCertificate);
    };

    let Ok(Some(eku)) = cert.extended_key_usage() else {
        return Err(CertificateTrustError::InvalidEku);
    };

    let Some(_approved_oid) = ctp.has_allowed_eku(eku.value) else {
        return Err(CertificateTrustError::InvalidEku);
    };

    // Add end-entity cert to the chain if not already there.
    let full_chain = if !chain_der.is_empty() && cert_der == chain_der[0] {
        chain_der.to_vec()
    } else {
        let mut full_chain: Vec<Vec<u8>> = Vec::with_capacity(chain_der.len() + 1);
        full_chain.push(cert_der.to_vec());
        full_chain.extend_from_slice(chain_der);
        full_chain
    };

    // Make sure chain is in the correct order and valid.
    check_chain_order(&full_chain)?;

    // Every certificate in the chain must be valid at the signing time.
    let signing_time = ASN1Time::from_timestamp(signing_time_epoch)
        .map_err(|_| CertificateTrustError::CertificateNotTrusted)?;

    let parsed_chain = full_chain
        .iter()
        .map(|der| {
            X509Certificate::from_der(der)
                .map(|(_, cert)| cert)
                .map_err(|_e| CertificateTrustError::InvalidCertificate)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if parsed_chain
        .iter()
        .any(|chain_cert| !chain_cert.validity().is_valid_at(signing_time))
    {
        return Err(CertificateTrustError::CertificateOutsideValidityPeriod);
    }

    let anchors: Vec<(X509Certificate, &Vec<u8>)> = ctp
        .trust_anchor_ders()
        .filter_map(|anchor_der| {
            let (_, cert) = X509Certificate::from_der(anchor_der).ok()?;
            Some((cert, anchor_der))
        })
        .collect();

    // Work back from last cert in chain against the trust anchors.
    for chain_cert in parsed_chain.iter().rev() {
        for (anchor_cert, anchor_der) in &anchors {
            if chain_cert.issuer() != anchor_cert.subject() {
                continue;
            }

            if !anchor_cert.validity().is_valid_at(signing_time) {
                continue;
            }

            let data = chain_cert.tbs_certificate.as_ref();
            let sig = chain_cert.signature_value.as_ref();

            match verify_data(anchor_der, chain_cert, sig, data) {
                Ok(true) => return Ok(TrustAnchorType::TrustAnchor),
                Ok(false) | Err(_) => continue,
            }
        }
    }

    Err(CertificateTrustError::CertificateNotTrusted)
}

fn check_chain_order(certs: &[Vec<u8>]) -> Result<(), CertificateTrustError> {
    let chain_length = certs.len();
    if chain_length < 2 {
        return Ok(());
    }

    for i in 1..chain_length {
        let (_, current_cert) = X509Certificate::from_der(&certs[i - 1])
            .map_err(|_e| CertificateTrustError::InvalidCertificate)?;

        let issuer_der = &certs[i];
        let data = current_cert.tbs_certificate.as_ref();
        let sig = current_cert.signature_value.as_ref();

        if !verify_data(issuer_der, &current_cert, sig, data)? {
            return Err(CertificateTrustError::CertificateNotTrusted);
        }
    }

    Ok(())
}

/// Verify `sig` over `data` with the public key of `issuer_der`, using the
/// signature algorithm recorded in `signed_cert`.
fn verify_data(
    issuer_der: &[u8],
    signed_cert: &X509Certificate,
    sig: &[u8],
    data: &[u8],
) -> Result<bool, CertificateTrustError> {
    let (_, issuer) = X509Certificate::from_der(issuer_der)
        .map_err(|_e| CertificateTrustError::InvalidCertificate)?;

    let certificate_public_key = issuer.public_key();

    let signing_alg = signing_alg_for_x509_sig_alg(&signed_cert.signature_algorithm.algorithm)
        .ok_or(CertificateTrustError::InvalidCertificate)?;

    let validator =
        validator_for_signing_alg(signing_alg).ok_or(CertificateTrustError::InvalidCertificate)?;

    match validator.validate(sig, data, certificate_public_key.raw) {
        Ok(()) => Ok(true),
        Err(RawSignatureValidationError::SignatureMismatch) => Ok(false),
        Err(_err) => Err(CertificateTrustError::InvalidCertificate),
    }
}
