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

//! This module binds Rust native logic for generating raw signatures to this
//! crate's [`RawSigner`] trait.

use x509_parser::{error::PEMError, pem::Pem};

use crate::raw_signature::{RawSigner, RawSignerError, SigningAlg};

mod ecdsa_signer;
pub(crate) use ecdsa_signer::EcdsaSigner;

mod ed25519_signer;
pub(crate) use ed25519_signer::Ed25519Signer;

/// Return a built-in [`RawSigner`] instance using the provided signing
/// certificate and private key.
pub(crate) fn signer_from_cert_chain_and_private_key(
    cert_chain: &[u8],
    private_key: &[u8],
    alg: SigningAlg,
) -> Result<Box<dyn RawSigner>, RawSignerError> {
    match alg {
        SigningAlg::Es256 | SigningAlg::Es384 => Ok(Box::new(
            EcdsaSigner::from_cert_chain_and_private_key(cert_chain, private_key, alg)?,
        )),

        SigningAlg::Ed25519 => Ok(Box::new(Ed25519Signer::from_cert_chain_and_private_key(
            cert_chain,
            private_key,
        )?)),
    }
}

/// Decode a PEM certificate bundle into DER certificates, preserving order.
pub(crate) fn cert_chain_from_pem(cert_chain: &[u8]) -> Result<Vec<Vec<u8>>, RawSignerError> {
    let cert_chain = Pem::iter_from_buffer(cert_chain)
        .map(|r| match r {
            Ok(pem) => Ok(pem.contents),
            Err(e) => Err(e),
        })
        .collect::<Result<Vec<Vec<u8>>, PEMError>>()
        .map_err(|e| RawSignerError::InvalidSigningCredentials(e.to_string()))?;

    if cert_chain.is_empty() {
        return Err(RawSignerError::InvalidSigningCredentials(
            "no certificates found in certificate chain".to_string(),
        ));
    }

    Ok(cert_chain)
}
