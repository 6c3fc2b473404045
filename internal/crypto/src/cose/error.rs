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

use crate::{
    cose::CertificateTrustError,
    raw_signature::{RawSignatureValidationError, RawSignerError},
    time_stamp::TimeStampError,
};

/// Describes errors that can occur when processing or generating [COSE]
/// signatures.
///
/// [COSE]: https://datatracker.ietf.org/doc/rfc9052/
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoseError {
    /// No signing certificate chain was found.
    #[error("missing signing certificate chain")]
    MissingSigningCertificateChain,

    /// Signing certificates appeared in both protected and unprotected
    /// headers.
    #[error("multiple signing certificate chains detected")]
    MultipleSigningCertificateChains,

    /// No time stamp token found.
    #[error("no time stamp token found in sigTst header")]
    NoTimeStampToken,

    /// The COSE signature uses an algorithm that is not supported by this
    /// crate.
    #[error("the COSE signature uses an unsupported algorithm")]
    UnsupportedSigningAlgorithm,

    /// An ECDSA signature was encoded as DER rather than P1363.
    #[error("invalid ECDSA signature format")]
    InvalidEcdsaSignature,

    /// An error occurred when parsing CBOR.
    #[error("error while parsing CBOR ({0})")]
    CborParsingError(String),

    /// An error occurred when generating CBOR.
    #[error("error while generating CBOR ({0})")]
    CborGenerationError(String),

    /// An error occurred when interpreting a time stamp.
    #[error(transparent)]
    TimeStampError(#[from] TimeStampError),

    /// The signing certificate is not trusted.
    #[error(transparent)]
    CertificateTrustError(#[from] CertificateTrustError),

    /// An error occurred while generating a raw signature.
    #[error(transparent)]
    RawSignerError(#[from] RawSignerError),

    /// An error occurred while validating a raw signature.
    #[error(transparent)]
    RawSignatureValidationError(#[from] RawSignatureValidationError),

    /// An unexpected internal error occured while requesting the time stamp
    /// response.
    #[error("internal error ({0})")]
    InternalError(String),
}
