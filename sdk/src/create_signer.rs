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

//! The `create_signer` module provides a way to obtain a [`RawSigner`]
//! instance for each signing algorithm supported by this crate.

use std::path::Path;

use c2pa_lineage_crypto::raw_signature::{
    signer_from_cert_chain_and_private_key, RawSigner, SigningAlg,
};

use crate::{Error, Result};

/// Creates a [`RawSigner`] from a PEM certificate chain (end-entity
/// certificate first) and a PEM PKCS#8 private key.
///
/// # Arguments
///
/// * `signcert` - Signing certificate chain
/// * `pkey` - Private key
/// * `alg` - Signing algorithm
pub fn from_keys(signcert: &[u8], pkey: &[u8], alg: SigningAlg) -> Result<Box<dyn RawSigner>> {
    Ok(signer_from_cert_chain_and_private_key(signcert, pkey, alg)?)
}

/// Creates a [`RawSigner`] from certificate chain and private key files.
pub fn from_files<P: AsRef<Path>>(
    signcert_path: P,
    pkey_path: P,
    alg: SigningAlg,
) -> Result<Box<dyn RawSigner>> {
    let signcert = std::fs::read(signcert_path.as_ref()).map_err(|e| {
        Error::BadParam(format!(
            "can not read {}: {e}",
            signcert_path.as_ref().display()
        ))
    })?;
    let pkey = std::fs::read(pkey_path.as_ref()).map_err(|e| {
        Error::BadParam(format!("can not read {}: {e}", pkey_path.as_ref().display()))
    })?;

    from_keys(&signcert, &pkey, alg)
}
