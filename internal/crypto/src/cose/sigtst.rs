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

use ciborium::value::Value;
use coset::{sig_structure_data, HeaderBuilder, Label, ProtectedHeader, SignatureContext};
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use crate::{
    cose::{CertificateTrustPolicy, CoseError},
    time_stamp::{verify_time_stamp, TimeStampProvider, TstInfo},
};

/// Header label under which time-stamp tokens are stored.
pub const SIG_TST_LABEL: &str = "sigTst";

/// Return `true` if the COSE signature carries a `sigTst` header.
pub fn has_time_stamp(sign1: &coset::CoseSign1) -> bool {
    sigtst_value(sign1).is_some()
}

fn sigtst_value(sign1: &coset::CoseSign1) -> Option<&Value> {
    sign1
        .unprotected
        .rest
        .iter()
        .find_map(|x: &(Label, Value)| {
            if x.0 == Label::Text(SIG_TST_LABEL.to_string()) {
                Some(&x.1)
            } else {
                None
            }
        })
}

/// Given a COSE signature, retrieve the `sigTst` header from it and validate
/// the first time stamp token that binds to the signature and chains to a
/// time-stamp authority trusted by `ctp`.
///
/// Returns `Err(CoseError::NoTimeStampToken)` if the header is absent.
pub fn validate_cose_tst_info(
    sign1: &coset::CoseSign1,
    ctp: &CertificateTrustPolicy,
) -> Result<TstInfo, CoseError> {
    let Some(sigtst) = sigtst_value(sign1) else {
        return Err(CoseError::NoTimeStampToken);
    };

    // The countersignature covers the claim signature, not the claim.
    let sig_data = ByteBuf::from(sign1.signature.clone());
    let mut sig_data_cbor: Vec<u8> = vec![];
    ciborium::into_writer(&sig_data, &mut sig_data_cbor)
        .map_err(|e| CoseError::CborGenerationError(e.to_string()))?;

    let tst_container: TstContainer = sigtst
        .deserialized()
        .map_err(|err| CoseError::CborParsingError(err.to_string()))?;

    let tbs = cose_countersign_data(&sig_data_cbor, &sign1.protected);

    let mut last_err = CoseError::NoTimeStampToken;

    for token in &tst_container.tst_tokens {
        match verify_time_stamp(&token.val, &tbs, ctp) {
            Ok(tst_info) => return Ok(tst_info),
            Err(err) => {
                log::debug!("time stamp token rejected: {err}");
                last_err = err.into();
            }
        }
    }

    Err(last_err)
}

/// Return the data a time-stamp authority countersigns for `data` under the
/// given protected header.
pub fn cose_countersign_data(data: &[u8], p_header: &ProtectedHeader) -> Vec<u8> {
    let aad: Vec<u8> = vec![];

    sig_structure_data(
        SignatureContext::CounterSignature,
        p_header.clone(),
        None,
        &aad,
        data,
    )
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct TstToken {
    #[serde(with = "serde_bytes")]
    pub val: Vec<u8>,
}

#[derive(Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct TstContainer {
    #[serde(rename = "tstTokens")]
    pub(crate) tst_tokens: Vec<TstToken>,
}

impl TstContainer {
    pub(crate) fn add_token(&mut self, token: TstToken) {
        self.tst_tokens.push(token);
    }
}

/// Request a time stamp over `data` from `ts_provider` and, if one is
/// returned, add it to `header_builder` as a `sigTst` header.
pub(crate) fn add_sigtst_header(
    ts_provider: &dyn TimeStampProvider,
    data: &[u8],
    p_header: &ProtectedHeader,
    mut header_builder: HeaderBuilder,
) -> Result<HeaderBuilder, CoseError> {
    let sd = cose_countersign_data(data, p_header);

    if let Some(cts) = ts_provider.send_time_stamp_request(&sd) {
        let cts = cts?;
        let cts = make_cose_timestamp(&cts);

        let sigtst_cbor = Value::serialized(&cts)
            .map_err(|e| CoseError::CborGenerationError(e.to_string()))?;

        header_builder = header_builder.text_value(SIG_TST_LABEL.to_string(), sigtst_cbor);
    }

    Ok(header_builder)
}

// Wrap a time stamp token in a COSE sigTst object.
fn make_cose_timestamp(ts_data: &[u8]) -> TstContainer {
    let token = TstToken {
        val: ts_data.to_vec(),
    };

    let mut container = TstContainer::default();
    container.add_token(token);

    container
}
