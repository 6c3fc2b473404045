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
        cert_chain_from_sign1, verify_sign1, CertificateTrustError, CertificateTrustPolicy,
        CoseError,
    },
    hash::sha256,
    time_stamp::{TimeStampError, TstInfo, SHA256_HASH_ALG},
};

/// Decode and verify a time stamp token over `data`.
///
/// The token must carry an embedded [`TstInfo`] whose message imprint is the
/// SHA-256 of `data`, its signature must verify, and its signing certificate
/// must be trusted by `ctp` at the token's generation time.
pub fn verify_time_stamp(
    ts: &[u8],
    data: &[u8],
    ctp: &CertificateTrustPolicy,
) -> Result<TstInfo, TimeStampError> {
    let sign1 = <CoseSign1 as TaggedCborSerializable>::from_tagged_slice(ts)
        .map_err(|e| TimeStampError::DecodeError(e.to_string()))?;

    let Some(payload) = sign1.payload.as_deref() else {
        return Err(TimeStampError::DecodeError(
            "time stamp token has no payload".to_string(),
        ));
    };

    let tst_info: TstInfo = ciborium::from_reader(payload)
        .map_err(|e| TimeStampError::DecodeError(e.to_string()))?;

    if tst_info.message_imprint.hash_alg != SHA256_HASH_ALG {
        return Err(TimeStampError::UnsupportedAlgorithm);
    }

    if tst_info.message_imprint.hashed_message.as_slice() != sha256(data).as_slice() {
        return Err(TimeStampError::InvalidData);
    }

    verify_sign1(&sign1).map_err(|err| match err {
        CoseError::UnsupportedSigningAlgorithm => TimeStampError::UnsupportedAlgorithm,
        _ => TimeStampError::SignatureInvalid,
    })?;

    let certs =
        cert_chain_from_sign1(&sign1).map_err(|e| TimeStampError::DecodeError(e.to_string()))?;

    let Some((end_entity_cert_der, chain_der)) = certs.split_first() else {
        return Err(TimeStampError::DecodeError(
            "time stamp token has no certificate".to_string(),
        ));
    };

    match ctp.check_certificate_trust(
        chain_der,
        end_entity_cert_der,
        Some(tst_info.gen_time.timestamp()),
    ) {
        Ok(_) => Ok(tst_info),
        Err(CertificateTrustError::CertificateOutsideValidityPeriod) => {
            Err(TimeStampError::ExpiredCertificate)
        }
        Err(err) => {
            log::debug!("time stamp authority untrusted: {err}");
            Err(TimeStampError::Untrusted)
        }
    }
}
