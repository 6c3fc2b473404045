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

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, SubsecRound, Utc};
use coset::ContentType;
use serde_bytes::ByteBuf;

use crate::{
    cose::{sign_v2_embedded, CosePayload},
    hash::sha256,
    raw_signature::RawSigner,
    time_stamp::{MessageImprint, TimeStampError, TimeStampProvider, TstInfo, SHA256_HASH_ALG},
};

/// Content type of the COSE structure that carries a [`TstInfo`].
pub const TST_CONTENT_TYPE: &str = "application/c2pa-tst+cbor";

/// A local time stamp authority that issues COSE-signed [`TstInfo`] tokens.
///
/// The signing certificate must carry the `id-kp-timeStamping` EKU for the
/// resulting tokens to be trusted.
pub struct CoseTimeStampAuthority {
    signer: Box<dyn RawSigner>,
    fixed_time: Option<DateTime<Utc>>,
    next_serial: AtomicU64,
}

impl CoseTimeStampAuthority {
    /// Create an authority that signs tokens with `signer` and stamps them
    /// with the current time.
    pub fn new(signer: Box<dyn RawSigner>) -> Self {
        Self {
            signer,
            fixed_time: None,
            next_serial: AtomicU64::new(1),
        }
    }

    /// Stamp every token with `time` instead of the current time.
    pub fn with_fixed_time(mut self, time: DateTime<Utc>) -> Self {
        self.fixed_time = Some(time);
        self
    }

    /// Issue a token for `message`.
    pub fn issue(&self, message: &[u8]) -> Result<Vec<u8>, TimeStampError> {
        let gen_time = self
            .fixed_time
            .unwrap_or_else(|| Utc::now().trunc_subsecs(0));

        let tst_info = TstInfo {
            gen_time,
            message_imprint: MessageImprint {
                hash_alg: SHA256_HASH_ALG.to_string(),
                hashed_message: ByteBuf::from(sha256(message)),
            },
            serial_number: self.next_serial.fetch_add(1, Ordering::Relaxed),
        };

        let mut tst_info_cbor: Vec<u8> = vec![];
        ciborium::into_writer(&tst_info, &mut tst_info_cbor)
            .map_err(|e| TimeStampError::InternalError(e.to_string()))?;

        sign_v2_embedded(
            self.signer.as_ref(),
            &tst_info_cbor,
            CosePayload::Embedded,
            Some(ContentType::Text(TST_CONTENT_TYPE.to_string())),
            None,
        )
        .map_err(|e| TimeStampError::InternalError(e.to_string()))
    }
}

impl TimeStampProvider for CoseTimeStampAuthority {
    fn send_time_stamp_request(&self, message: &[u8]) -> Option<Result<Vec<u8>, TimeStampError>> {
        Some(self.issue(message))
    }
}
