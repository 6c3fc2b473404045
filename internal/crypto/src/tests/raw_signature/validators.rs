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

use crate::{
    raw_signature::{
        signer_from_cert_chain_and_private_key, validator_for_signing_alg,
        RawSignatureValidationError, SigningAlg,
    },
    tests::fixtures::{self, *},
};

const SAMPLE_DATA: &[u8] = b"some sample content to sign";

fn signature(cert_chain: &[u8], private_key: &[u8], alg: SigningAlg) -> Vec<u8> {
    signer_from_cert_chain_and_private_key(cert_chain, private_key, alg)
        .unwrap()
        .sign(SAMPLE_DATA)
        .unwrap()
}

#[test]
fn ed25519_bad_data() {
    let sig = signature(ED25519_PUB, ED25519_PRIV, SigningAlg::Ed25519);
    let pub_key = fixtures::leaf_public_key(ED25519_PUB);

    let mut data = SAMPLE_DATA.to_vec();
    data[10] = 0;

    let validator = validator_for_signing_alg(SigningAlg::Ed25519).unwrap();

    assert_eq!(
        validator.validate(&sig, &data, &pub_key).unwrap_err(),
        RawSignatureValidationError::SignatureMismatch
    );
}

#[test]
fn es256_bad_data() {
    let sig = signature(ES256_PUB, ES256_PRIV, SigningAlg::Es256);
    let pub_key = fixtures::leaf_public_key(ES256_PUB);

    let mut data = SAMPLE_DATA.to_vec();
    data[5] = 10;

    let validator = validator_for_signing_alg(SigningAlg::Es256).unwrap();

    assert_eq!(
        validator.validate(&sig, &data, &pub_key).unwrap_err(),
        RawSignatureValidationError::SignatureMismatch
    );
}

#[test]
fn es384_wrong_key() {
    let sig = signature(ES384_PUB, ES384_PRIV, SigningAlg::Es384);
    let other_key = fixtures::leaf_public_key(ES256_PUB);

    let validator = validator_for_signing_alg(SigningAlg::Es384).unwrap();

    // A P-384 signature can not be read against a P-256 key.
    assert!(validator.validate(&sig, SAMPLE_DATA, &other_key).is_err());
}

#[test]
fn ed25519_bad_signature() {
    let pub_key = fixtures::leaf_public_key(ED25519_PUB);
    let validator = validator_for_signing_alg(SigningAlg::Ed25519).unwrap();

    assert_eq!(
        validator.validate(&[1, 2, 3], SAMPLE_DATA, &pub_key).unwrap_err(),
        RawSignatureValidationError::InvalidSignature
    );
}

#[test]
fn ed25519_rejects_ec_key() {
    let sig = signature(ED25519_PUB, ED25519_PRIV, SigningAlg::Ed25519);
    let ec_key = fixtures::leaf_public_key(ES256_PUB);

    let validator = validator_for_signing_alg(SigningAlg::Ed25519).unwrap();

    assert_eq!(
        validator.validate(&sig, SAMPLE_DATA, &ec_key).unwrap_err(),
        RawSignatureValidationError::InvalidPublicKey
    );
}
