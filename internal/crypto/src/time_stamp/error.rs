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

use thiserror::Error;

/// Describes errors that can occur when requesting or verifying a time
/// stamp.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimeStampError {
    /// The time stamp uses a certificate that was not valid at the time of
    /// signing.
    #[error("time stamp has an expired certificate")]
    ExpiredCertificate,

    /// The time stamp's message imprint does not match the countersigned
    /// data.
    #[error("time stamp does not match data")]
    InvalidData,

    /// The time stamp uses an unsupported signing or hash algorithm.
    #[error("time stamp contains an unsupported algorithm")]
    UnsupportedAlgorithm,

    /// The signature on the time stamp token does not verify.
    #[error("time stamp signature is invalid")]
    SignatureInvalid,

    /// The time stamp authority is not trusted.
    #[error("time stamp authority is untrusted")]
    Untrusted,

    /// An error was encountered when decoding the time stamp token.
    #[error("decode error ({0})")]
    DecodeError(String),

    /// An unexpected internal error occured while requesting the time stamp
    /// response.
    #[error("internal error ({0})")]
    InternalError(String),
}
