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
    iana::{self, EnumI64},
    ContentType, CoseSign1Builder, Header, HeaderBuilder, ProtectedHeader, RegisteredLabel,
    TaggedCborSerializable,
};
use serde_bytes::ByteBuf;
use x509_parser::{certificate::X509Certificate, prelude::FromDer};

use crate::{
    cose::{add_sigtst_header, sign1::cose_alg_for_signing_alg, CoseError},
    ec_utils::{der_to_p1363, ec_curve_from_public_key_der, parse_ec_der_sig},
    raw_signature::{RawSigner, SigningAlg},
    time_stamp::TimeStampProvider,
};

/// Generate a COSE signature for a block of data which must be a valid C2PA
/// claim structure.
///
/// The payload is detached: the resulting COSE Sign1 structure does not
/// repeat `data`. If `tsa` is provided, the signature is countersigned and
/// the time stamp token is stored in the `sigTst` header.
pub fn sign(
    signer: &dyn RawSigner,
    data: &[u8],
    tsa: Option<&dyn TimeStampProvider>,
) -> Result<Vec<u8>, CoseError> {
    sign_v2_embedded(signer, data, CosePayload::Detached, None, tsa)
}

/// Describes where the payload of a COSE Sign1 structure lives.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CosePayload {
    /// The payload is carried elsewhere and restored before verification.
    Detached,

    /// The payload is embedded in the COSE Sign1 structure.
    Embedded,
}

/// Generate a COSE Sign1 structure with a detached or embedded payload and
/// an optional content type.
pub fn sign_v2_embedded(
    signer: &dyn RawSigner,
    data: &[u8],
    payload: CosePayload,
    content_type: Option<ContentType>,
    tsa: Option<&dyn TimeStampProvider>,
) -> Result<Vec<u8>, CoseError> {
    let alg = signer.alg();

    let protected_header = build_protected_header(signer, alg, content_type)?;

    // We don't use the additional data header.
    let aad: &[u8; 0] = b"";

    // Sign then generate time stamp.
    let sign1_builder = CoseSign1Builder::new()
        .protected(protected_header.header.clone())
        .payload(data.to_vec());

    let mut sign1 = sign1_builder.build();

    let tbs = coset::sig_structure_data(
        coset::SignatureContext::CoseSign1,
        sign1.protected.clone(),
        None,
        aad,
        data,
    );

    let signature = signer.sign(&tbs)?;

    // Fix up signatures that may be in the wrong format.
    sign1.signature = match alg {
        SigningAlg::Es256 | SigningAlg::Es384 => {
            if parse_ec_der_sig(&signature).is_ok() {
                let certs = signer.cert_chain()?;

                let signing_cert = certs.first().ok_or(CoseError::CborGenerationError(
                    "bad certificate chain".to_string(),
                ))?;

                let (_, cert) = X509Certificate::from_der(signing_cert).map_err(|_e| {
                    CoseError::CborGenerationError("incorrect EC signature format".to_string())
                })?;

                let curve = ec_curve_from_public_key_der(cert.public_key().raw).ok_or(
                    CoseError::CborGenerationError("incorrect EC signature format".to_string()),
                )?;

                der_to_p1363(&signature, curve.p1363_sig_len())?
            } else {
                signature
            }
        }
        _ => signature,
    };

    // If the payload is provided elsewhere, we don't need to repeat it in the
    // `Cose_Sign1` structure.
    if payload == CosePayload::Detached {
        sign1.payload = None;
    }

    if let Some(tsa) = tsa {
        let sig_data = ByteBuf::from(sign1.signature.clone());
        let mut sig_data_cbor: Vec<u8> = vec![];
        ciborium::into_writer(&sig_data, &mut sig_data_cbor)
            .map_err(|e| CoseError::CborGenerationError(e.to_string()))?;

        sign1.unprotected = build_unprotected_header(tsa, &sig_data_cbor, &protected_header)?;
    }

    sign1
        .to_tagged_vec()
        .map_err(|e| CoseError::CborGenerationError(e.to_string()))
}

fn build_protected_header(
    signer: &dyn RawSigner,
    alg: SigningAlg,
    content_type: Option<ContentType>,
) -> Result<ProtectedHeader, CoseError> {
    let mut protected_h = HeaderBuilder::new().algorithm(cose_alg_for_signing_alg(alg));

    let certs = signer.cert_chain()?;
    if certs.is_empty() {
        return Err(CoseError::MissingSigningCertificateChain);
    }

    let sc_der_array_or_bytes = match certs.len() {
        1 => Value::Bytes(certs[0].clone()),
        _ => Value::Array(certs.into_iter().map(Value::Bytes).collect()),
    };

    // Add certs to protected header.
    protected_h = protected_h.value(
        iana::HeaderParameter::X5Chain.to_i64(),
        sc_der_array_or_bytes,
    );

    // Add content type to protected header.
    match content_type {
        Some(RegisteredLabel::Assigned(n)) => {
            protected_h = protected_h.content_format(n);
        }

        Some(RegisteredLabel::Text(t)) => {
            protected_h = protected_h.content_type(t);
        }

        None => {}
    }

    Ok(ProtectedHeader {
        original_data: None,
        header: protected_h.build(),
    })
}

fn build_unprotected_header(
    tsa: &dyn TimeStampProvider,
    data: &[u8],
    p_header: &ProtectedHeader,
) -> Result<Header, CoseError> {
    let unprotected_h = add_sigtst_header(tsa, data, p_header, HeaderBuilder::new())?;
    Ok(unprotected_h.build())
}
