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

use coset::{CoseSign1, TaggedCborSerializable};

use crate::{
    cose::{
        cert_chain_from_sign1, certificate_info_from_sign1, parse_cose_sign1, sign,
        sign_v2_embedded, signing_alg_from_sign1, verify_sign1, CoseError, CosePayload,
    },
    raw_signature::{signer_from_cert_chain_and_private_key, SigningAlg},
    tests::fixtures::*,
};

const CLAIM: &[u8] = b"a claim to be signed";

fn sign_with(pub_pems: &[u8], priv_pem: &[u8], alg: SigningAlg) -> Vec<u8> {
    let signer = signer_from_cert_chain_and_private_key(pub_pems, priv_pem, alg).unwrap();
    sign(signer.as_ref(), CLAIM, None).unwrap()
}

#[test]
fn sign_and_verify_each_alg() {
    for (pub_pems, priv_pem, alg) in [
        (ED25519_PUB, ED25519_PRIV, SigningAlg::Ed25519),
        (ES256_PUB, ES256_PRIV, SigningAlg::Es256),
        (ES384_PUB, ES384_PRIV, SigningAlg::Es384),
    ] {
        let cose = sign_with(pub_pems, priv_pem, alg);
        let sign1 = parse_cose_sign1(&cose, CLAIM).unwrap();

        assert_eq!(signing_alg_from_sign1(&sign1).unwrap(), alg);
        assert_eq!(verify_sign1(&sign1).unwrap(), alg);
    }
}

#[test]
fn payload_is_detached() {
    let cose = sign_with(ED25519_PUB, ED25519_PRIV, SigningAlg::Ed25519);

    let raw = CoseSign1::from_tagged_slice(&cose).unwrap();
    assert!(raw.payload.is_none());

    let sign1 = parse_cose_sign1(&cose, CLAIM).unwrap();
    assert_eq!(sign1.payload.as_deref(), Some(CLAIM));
}

#[test]
fn embedded_payload_is_kept() {
    let signer =
        signer_from_cert_chain_and_private_key(ES256_PUB, ES256_PRIV, SigningAlg::Es256).unwrap();

    let cose = sign_v2_embedded(signer.as_ref(), CLAIM, CosePayload::Embedded, None, None).unwrap();

    let sign1 = CoseSign1::from_tagged_slice(&cose).unwrap();
    assert_eq!(sign1.payload.as_deref(), Some(CLAIM));
    verify_sign1(&sign1).unwrap();
}

#[test]
fn tampered_claim_fails() {
    let cose = sign_with(ES256_PUB, ES256_PRIV, SigningAlg::Es256);
    let sign1 = parse_cose_sign1(&cose, b"a claim to be signeD").unwrap();

    assert!(matches!(
        verify_sign1(&sign1),
        Err(CoseError::RawSignatureValidationError(_))
    ));
}

#[test]
fn tampered_signature_fails() {
    let cose = sign_with(ED25519_PUB, ED25519_PRIV, SigningAlg::Ed25519);
    let mut sign1 = parse_cose_sign1(&cose, CLAIM).unwrap();
    sign1.signature[10] ^= 0xff;

    assert!(verify_sign1(&sign1).is_err());
}

#[test]
fn certificate_chain_is_carried() {
    let cose = sign_with(ED25519_PUB, ED25519_PRIV, SigningAlg::Ed25519);
    let sign1 = parse_cose_sign1(&cose, CLAIM).unwrap();

    let chain = cert_chain_from_sign1(&sign1).unwrap();
    assert_eq!(chain, crate::tests::fixtures::ders(ED25519_PUB));
}

#[test]
fn certificate_info() {
    let cose = sign_with(ED25519_PUB, ED25519_PRIV, SigningAlg::Ed25519);
    let sign1 = parse_cose_sign1(&cose, CLAIM).unwrap();

    let info = certificate_info_from_sign1(&sign1).unwrap();
    assert_eq!(info.alg, Some(SigningAlg::Ed25519));
    assert_eq!(info.issuer_org.as_deref(), Some("C2C Lineage Test"));
    assert_eq!(info.common_name.as_deref(), Some("C2C Lineage Test Signer"));
    assert_eq!(info.chain_len, 2);
    assert!(info.cert_serial_number.is_some());
}

#[test]
fn garbage_is_not_cose() {
    assert!(matches!(
        parse_cose_sign1(b"not cbor at all", CLAIM),
        Err(CoseError::CborParsingError(_))
    ));
}
