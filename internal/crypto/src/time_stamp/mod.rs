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

//! Functions for issuing and verifying time stamp tokens.
//!
//! A token is a COSE Sign1 structure with an embedded CBOR [`TstInfo`]
//! payload, signed by a time stamp authority whose certificate carries the
//! `id-kp-timeStamping` EKU. Tokens are stored in the `sigTst` header of
//! the claim signature and countersign the claim signature bytes.

mod authority;
pub use authority::{CoseTimeStampAuthority, TST_CONTENT_TYPE};

mod error;
pub use error::TimeStampError;

mod provider;
pub use provider::TimeStampProvider;

mod tst_info;
pub use tst_info::{MessageImprint, TstInfo, SHA256_HASH_ALG};

mod verify;
pub use verify::verify_time_stamp;
