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

//! This module provides functions for working with [COSE] signatures.
//!
//! [COSE]: https://datatracker.ietf.org/doc/rfc9052/

mod certificate_trust_policy;
pub use certificate_trust_policy::{
    base64_sha256_cert_der, CertificateTrustError, CertificateTrustPolicy, EkuPurpose,
    InvalidCertificateError, TrustAnchorType,
};

mod error;
pub use error::CoseError;

mod sign;
pub use sign::{sign, sign_v2_embedded, CosePayload};

mod sign1;
pub use sign1::{
    cert_chain_from_sign1, certificate_info_from_sign1, parse_cose_sign1, signing_alg_from_sign1,
    CertificateInfo,
};

mod sigtst;
pub(crate) use sigtst::add_sigtst_header;
pub use sigtst::{cose_countersign_data, has_time_stamp, validate_cose_tst_info, SIG_TST_LABEL};

mod verifier;
pub(crate) use verifier::verify_sign1;
pub use verifier::Verifier;
