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

#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

mod base64;
mod cose;
mod hash;
mod raw_signature;

/// Certificates and keys shared by the tests in this crate.
pub(crate) mod fixtures {
    use x509_parser::{certificate::X509Certificate, pem::Pem, prelude::FromDer};

    pub(crate) const ROOT_CA: &[u8] = include_bytes!("../../tests/fixtures/root_ca.pem");
    pub(crate) const EC_ROOT_CA: &[u8] = include_bytes!("../../tests/fixtures/ec_root_ca.pem");
    pub(crate) const TSA_ROOT_CA: &[u8] = include_bytes!("../../tests/fixtures/tsa_root_ca.pem");
    pub(crate) const OTHER_ROOT_CA: &[u8] =
        include_bytes!("../../tests/fixtures/other_root_ca.pem");

    pub(crate) const ED25519_PUB: &[u8] = include_bytes!("../../tests/fixtures/ed25519.pub");
    pub(crate) const ED25519_PRIV: &[u8] = include_bytes!("../../tests/fixtures/ed25519.priv");
    pub(crate) const ES256_PUB: &[u8] = include_bytes!("../../tests/fixtures/es256.pub");
    pub(crate) const ES256_PRIV: &[u8] = include_bytes!("../../tests/fixtures/es256.priv");
    pub(crate) const ES384_PUB: &[u8] = include_bytes!("../../tests/fixtures/es384.pub");
    pub(crate) const ES384_PRIV: &[u8] = include_bytes!("../../tests/fixtures/es384.priv");
    pub(crate) const EXPIRED_PUB: &[u8] =
        include_bytes!("../../tests/fixtures/expired_ed25519.pub");
    pub(crate) const EXPIRED_PRIV: &[u8] =
        include_bytes!("../../tests/fixtures/expired_ed25519.priv");
    pub(crate) const WRONG_EKU_PUB: &[u8] =
        include_bytes!("../../tests/fixtures/wrong_eku_ed25519.pub");
    pub(crate) const TSA_PUB: &[u8] = include_bytes!("../../tests/fixtures/tsa.pub");
    pub(crate) const TSA_PRIV: &[u8] = include_bytes!("../../tests/fixtures/tsa.priv");

    /// DER certificates of a PEM bundle, in order.
    pub(crate) fn ders(pems: &[u8]) -> Vec<Vec<u8>> {
        Pem::iter_from_buffer(pems)
            .map(|pem| pem.unwrap().contents)
            .collect()
    }

    /// DER `SubjectPublicKeyInfo` of the first certificate in a PEM bundle.
    pub(crate) fn leaf_public_key(pems: &[u8]) -> Vec<u8> {
        let ders = ders(pems);
        let (_, cert) = X509Certificate::from_der(&ders[0]).unwrap();
        cert.public_key().raw.to_vec()
    }
}
