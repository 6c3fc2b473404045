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

use c2pa_lineage_crypto::{
    cose::{
        cert_chain_from_sign1, certificate_info_from_sign1, has_time_stamp, parse_cose_sign1,
        signing_alg_from_sign1, CertificateInfo,
    },
    raw_signature::SigningAlg,
};
use coset::CoseSign1;
use serde::Serialize;

use crate::{Error, Result};

/// The decoded claim signature of a manifest: a tagged COSE_Sign1 structure
/// whose detached payload is the claim.
///
/// Decoding does not verify anything; see [`validate`](crate::validate).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSignature {
    #[serde(with = "crate::utils::base64::bytes")]
    cose_bytes: Vec<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    alg: Option<SigningAlg>,

    #[serde(with = "crate::utils::base64::bytes")]
    protected_header: Vec<u8>,

    #[serde(with = "crate::utils::base64::bytes")]
    signature: Vec<u8>,

    #[serde(with = "crate::utils::base64::bytes_list")]
    cert_chain: Vec<Vec<u8>>,

    has_time_stamp: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    certificate_info: Option<CertificateInfo>,

    #[serde(skip)]
    sign1: CoseSign1,
}

impl ClaimSignature {
    /// Decodes `cose_bytes` and restores `claim_bytes` as its payload.
    ///
    /// A structure that is not a tagged COSE_Sign1, or whose protected
    /// header does not decode, is an error. An unsupported algorithm or a
    /// missing certificate chain is not; validation reports those.
    pub fn from_cose(cose_bytes: &[u8], claim_bytes: &[u8]) -> Result<Self> {
        let sign1 = parse_cose_sign1(cose_bytes, claim_bytes)
            .map_err(|e| Error::SignatureDecoding(e.to_string()))?;

        let protected_header = sign1.protected.original_data.clone().unwrap_or_default();

        Ok(Self {
            cose_bytes: cose_bytes.to_vec(),
            alg: signing_alg_from_sign1(&sign1).ok(),
            protected_header,
            signature: sign1.signature.clone(),
            cert_chain: cert_chain_from_sign1(&sign1).unwrap_or_default(),
            has_time_stamp: has_time_stamp(&sign1),
            certificate_info: certificate_info_from_sign1(&sign1).ok(),
            sign1,
        })
    }

    /// The complete COSE_Sign1 bytes as stored in the manifest.
    pub fn cose_bytes(&self) -> &[u8] {
        &self.cose_bytes
    }

    pub fn alg(&self) -> Option<SigningAlg> {
        self.alg
    }

    /// Serialized protected header, exactly as signed.
    pub fn protected_header(&self) -> &[u8] {
        &self.protected_header
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// DER certificates, end-entity first.
    pub fn cert_chain(&self) -> &[Vec<u8>] {
        &self.cert_chain
    }

    pub fn has_time_stamp(&self) -> bool {
        self.has_time_stamp
    }

    /// Describes the signing certificate, if it can be read.
    pub fn certificate_info(&self) -> Option<&CertificateInfo> {
        self.certificate_info.as_ref()
    }

    pub(crate) fn sign1(&self) -> &CoseSign1 {
        &self.sign1
    }
}
