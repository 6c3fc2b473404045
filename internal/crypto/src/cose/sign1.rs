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

use ciborium::value::Value;
use coset::{
    iana::{self, Algorithm, EnumI64},
    CoseSign1, Label, RegisteredLabelWithPrivate, TaggedCborSerializable,
};
use serde::{Deserialize, Serialize};
use x509_parser::{certificate::X509Certificate, prelude::FromDer};

use crate::{cose::CoseError, raw_signature::SigningAlg};

/// Parse a byte slice as a tagged COSE Sign1 data structure and restore the
/// detached payload `data` into it.
///
/// This is the first step of signature verification: the claim bytes travel
/// beside the signature, not inside it.
pub fn parse_cose_sign1(cose_bytes: &[u8], data: &[u8]) -> Result<CoseSign1, CoseError> {
    let mut sign1 = <coset::CoseSign1 as TaggedCborSerializable>::from_tagged_slice(cose_bytes)
        .map_err(|coset_error| CoseError::CborParsingError(coset_error.to_string()))?;

    // Temporarily restore the payload into the signature for verification check.
    sign1.payload = Some(data.to_vec());

    Ok(sign1)
}

/// Return the [`SigningAlg`] used for this signature.
///
/// Returns `Err(CoseError::UnsupportedSigningAlgorithm)` if the algorithm is
/// missing or is not one this crate supports.
pub fn signing_alg_from_sign1(sign1: &coset::CoseSign1) -> Result<SigningAlg, CoseError> {
    let Some(ref alg) = sign1.protected.header.alg else {
        return Err(CoseError::UnsupportedSigningAlgorithm);
    };

    match alg {
        RegisteredLabelWithPrivate::PrivateUse(a) => match a {
            -35 => Ok(SigningAlg::Es384),
            -7 => Ok(SigningAlg::Es256),
            -8 => Ok(SigningAlg::Ed25519),
            _ => Err(CoseError::UnsupportedSigningAlgorithm),
        },

        RegisteredLabelWithPrivate::Assigned(a) => match a {
            Algorithm::ES384 => Ok(SigningAlg::Es384),
            Algorithm::ES256 => Ok(SigningAlg::Es256),
            Algorithm::EdDSA => Ok(SigningAlg::Ed25519),
            _ => Err(CoseError::UnsupportedSigningAlgorithm),
        },

        _ => Err(CoseError::UnsupportedSigningAlgorithm),
    }
}

/// Return the COSE algorithm identifier for a [`SigningAlg`].
pub(crate) fn cose_alg_for_signing_alg(alg: SigningAlg) -> iana::Algorithm {
    match alg {
        SigningAlg::Es256 => iana::Algorithm::ES256,
        SigningAlg::Es384 => iana::Algorithm::ES384,
        SigningAlg::Ed25519 => iana::Algorithm::EdDSA,
    }
}

/// Return the DER-encoded certificate chain, end-entity first, from the
/// signature's `x5chain` header.
pub fn cert_chain_from_sign1(sign1: &coset::CoseSign1) -> Result<Vec<Vec<u8>>, CoseError> {
    // Check the protected header first.
    let Some(value) = sign1
        .protected
        .header
        .rest
        .iter()
        .find_map(|x: &(Label, Value)| {
            if x.0 == Label::Text("x5chain".to_string())
                || x.0 == Label::Int(iana::HeaderParameter::X5Chain.to_i64())
            {
                Some(x.1.clone())
            } else {
                None
            }
        })
    else {
        // Not there: Also try unprotected header. (This was permitted in older versions
        // of C2PA.)
        return get_unprotected_header_certs(sign1);
    };

    // Certs may be in protected or unprotected header, but not both.
    if get_unprotected_header_certs(sign1).is_ok() {
        return Err(CoseError::MultipleSigningCertificateChains);
    }

    cert_chain_from_cbor_value(value)
}

fn get_unprotected_header_certs(sign1: &coset::CoseSign1) -> Result<Vec<Vec<u8>>, CoseError> {
    let Some(value) = sign1
        .unprotected
        .rest
        .iter()
        .find_map(|x: &(Label, Value)| {
            if x.0 == Label::Text("x5chain".to_string())
                || x.0 == Label::Int(iana::HeaderParameter::X5Chain.to_i64())
            {
                Some(x.1.clone())
            } else {
                None
            }
        })
    else {
        return Err(CoseError::MissingSigningCertificateChain);
    };

    cert_chain_from_cbor_value(value)
}

fn cert_chain_from_cbor_value(value: Value) -> Result<Vec<Vec<u8>>, CoseError> {
    match value {
        Value::Array(cert_chain) => {
            let certs: Vec<Vec<u8>> = cert_chain
                .into_iter()
                .filter_map(|c| {
                    if let Value::Bytes(der_bytes) = c {
                        Some(der_bytes)
                    } else {
                        None
                    }
                })
                .collect();

            if certs.is_empty() {
                Err(CoseError::MissingSigningCertificateChain)
            } else {
                Ok(certs)
            }
        }

        Value::Bytes(der_bytes) => Ok(vec![der_bytes]),

        _ => Err(CoseError::MissingSigningCertificateChain),
    }
}

/// Summary of the signing certificate, suitable for reports.
///
/// Never contains key material.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CertificateInfo {
    /// Signature algorithm.
    pub alg: Option<SigningAlg>,

    /// Organization (`O`) of the end-entity certificate subject.
    pub issuer_org: Option<String>,

    /// Common name (`CN`) of the end-entity certificate subject.
    pub common_name: Option<String>,

    /// Serial number of the end-entity certificate, in hex.
    pub cert_serial_number: Option<String>,

    /// Number of certificates in the `x5chain` header.
    pub chain_len: usize,
}

/// Describe the signer of a COSE Sign1 structure without verifying it.
pub fn certificate_info_from_sign1(sign1: &coset::CoseSign1) -> Result<CertificateInfo, CoseError> {
    let certs = cert_chain_from_sign1(sign1)?;
    let end_entity_cert_der = certs
        .first()
        .ok_or(CoseError::MissingSigningCertificateChain)?;

    let (_rem, sign_cert) = X509Certificate::from_der(end_entity_cert_der)
        .map_err(|_| CoseError::CborParsingError("invalid X509 certificate".to_string()))?;

    let subject = sign_cert.subject();

    let issuer_org = subject
        .iter_organization()
        .last()
        .and_then(|attr| attr.as_str().ok())
        .map(str::to_string);

    let common_name = subject
        .iter_common_name()
        .last()
        .and_then(|attr| attr.as_str().ok())
        .map(str::to_string);

    Ok(CertificateInfo {
        alg: signing_alg_from_sign1(sign1).ok(),
        issuer_org,
        common_name,
        cert_serial_number: Some(sign_cert.tbs_certificate.serial.to_str_radix(16)),
        chain_len: certs.len(),
    })
}
