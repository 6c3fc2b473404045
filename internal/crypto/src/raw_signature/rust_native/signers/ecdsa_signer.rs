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

use p256::ecdsa::{
    signature::Signer, Signature as P256Signature, SigningKey as P256SigningKey,
};
use p384::ecdsa::{Signature as P384Signature, SigningKey as P384SigningKey};

use super::cert_chain_from_pem;
use crate::raw_signature::{RawSigner, RawSignerError, SigningAlg};

// Signing keys for ES256 and ES384 are different types.
enum EcdsaSigningKey {
    Es256(P256SigningKey),
    Es384(P384SigningKey),
}

/// Implements `RawSigner` trait using the `p256` and `p384` crates'
/// implementations of ECDSA.
pub(crate) struct EcdsaSigner {
    cert_chain: Vec<Vec<u8>>,

    signing_key: EcdsaSigningKey,
}

impl EcdsaSigner {
    pub(crate) fn from_cert_chain_and_private_key(
        cert_chain: &[u8],
        private_key: &[u8],
        algorithm: SigningAlg,
    ) -> Result<Self, RawSignerError> {
        use p256::pkcs8::DecodePrivateKey as _;

        let cert_chain = cert_chain_from_pem(cert_chain)?;

        let private_key_pem = std::str::from_utf8(private_key).map_err(|e| {
            RawSignerError::InvalidSigningCredentials(format!("invalid private key: {e}"))
        })?;

        let signing_key = match algorithm {
            SigningAlg::Es256 => {
                let key = P256SigningKey::from_pkcs8_pem(private_key_pem).map_err(|e| {
                    RawSignerError::InvalidSigningCredentials(format!(
                        "invalid ES256 private key: {e}"
                    ))
                })?;
                EcdsaSigningKey::Es256(key)
            }
            SigningAlg::Es384 => {
                let key = P384SigningKey::from_pkcs8_pem(private_key_pem).map_err(|e| {
                    RawSignerError::InvalidSigningCredentials(format!(
                        "invalid ES384 private key: {e}"
                    ))
                })?;
                EcdsaSigningKey::Es384(key)
            }
            _ => {
                return Err(RawSignerError::InvalidSigningCredentials(
                    "unsupported algorithm".to_string(),
                ))
            }
        };

        Ok(EcdsaSigner {
            cert_chain,
            signing_key,
        })
    }
}

impl RawSigner for EcdsaSigner {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, RawSignerError> {
        match self.signing_key {
            EcdsaSigningKey::Es256(ref key) => {
                let signature: P256Signature = key
                    .try_sign(data)
                    .map_err(|e| RawSignerError::InternalError(format!("signature error: {e}")))?;
                Ok(signature.to_bytes().to_vec())
            }
            EcdsaSigningKey::Es384(ref key) => {
                let signature: P384Signature = key
                    .try_sign(data)
                    .map_err(|e| RawSignerError::InternalError(format!("signature error: {e}")))?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }

    fn alg(&self) -> SigningAlg {
        match self.signing_key {
            EcdsaSigningKey::Es256(_) => SigningAlg::Es256,
            EcdsaSigningKey::Es384(_) => SigningAlg::Es384,
        }
    }

    fn cert_chain(&self) -> Result<Vec<Vec<u8>>, RawSignerError> {
        Ok(self.cert_chain.clone())
    }
}
