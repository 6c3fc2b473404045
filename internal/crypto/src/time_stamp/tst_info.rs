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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

/// Hash algorithm name recorded in a [`MessageImprint`].
pub const SHA256_HASH_ALG: &str = "sha256";

/// The hash of the countersigned data.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MessageImprint {
    /// Name of the hash algorithm. Only `sha256` is produced or accepted.
    #[serde(rename = "hashAlg")]
    pub hash_alg: String,

    /// Digest of the countersigned data.
    #[serde(rename = "hashedMessage")]
    pub hashed_message: ByteBuf,
}

/// The payload of a time stamp token: a statement by a time stamp authority
/// that the data with the given imprint existed at `gen_time`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TstInfo {
    /// Time at which the token was generated.
    #[serde(rename = "genTime")]
    pub gen_time: DateTime<Utc>,

    /// Hash of the countersigned data.
    #[serde(rename = "messageImprint")]
    pub message_imprint: MessageImprint,

    /// Serial number assigned by the authority.
    #[serde(rename = "serialNumber")]
    pub serial_number: u64,
}
