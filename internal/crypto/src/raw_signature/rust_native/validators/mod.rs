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

//! This module binds Rust native logic for validating raw signatures to this
//! crate's [`RawSignatureValidator`] trait.

use x509_parser::oid_registry::Oid;

use crate::raw_signature::{oids::*, RawSignatureValidator, SigningAlg};

mod ecdsa_validator;
pub(crate) use ecdsa_validator::EcdsaValidator;

mod ed25519_validator;
pub(crate) use ed25519_validator::Ed25519Validator;

/// Return a validator for the given signing algorithm.
pub(crate) fn validator_for_signing_alg(alg: SigningAlg) -> Option<Box<dyn RawSignatureValidator>> {
    match alg {
        SigningAlg::Ed25519 => Some(Box::new(Ed25519Validator {})),
        SigningAlg::Es256 => Some(Box::new(EcdsaValidator::Es256)),
        SigningAlg::Es384 => Some(Box::new(EcdsaValidator::Es384)),
    }
}

/// Return the signing algorithm matching an X.509 signature algorithm
/// identifier, if it is one this crate can verify.
pub(crate) fn signing_alg_for_x509_sig_alg(sig_alg: &Oid) -> Option<SigningAlg> {
    if *sig_alg == ECDSA_WITH_SHA256_OID {
        Some(SigningAlg::Es256)
    } else if *sig_alg == ECDSA_WITH_SHA384_OID {
        Some(SigningAlg::Es384)
    } else if *sig_alg == ED25519_OID {
        Some(SigningAlg::Ed25519)
    } else {
        None
    }
}
