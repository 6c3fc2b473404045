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

use crate::http::HttpResolverError;

/// Machine-readable code for malformed containers and manifests.
pub const INVALID_STRUCTURE: &str = "INVALID_STRUCTURE";
/// Machine-readable code for references that can not be interpreted.
pub const INVALID_REFERENCE: &str = "INVALID_REFERENCE";
/// Machine-readable code for remote URLs rejected by the network boundary.
pub const URL_DISALLOWED: &str = "URL_DISALLOWED";
/// Machine-readable code for remote fetches that did not produce a body.
pub const FETCH_FAILED: &str = "FETCH_FAILED";
/// Machine-readable code for derivatives whose parent does not validate.
pub const UNTRUSTED_PARENT: &str = "UNTRUSTED_PARENT";
/// Machine-readable code for failures while building or signing a manifest.
pub const SIGNING_FAILED: &str = "SIGNING_FAILED";
/// Machine-readable code for settings that fail to load or validate.
pub const INVALID_SETTINGS: &str = "INVALID_SETTINGS";
/// Machine-readable code for invalid caller input not covered elsewhere.
pub const BAD_PARAM: &str = "BAD_PARAM";
/// Machine-readable code for unexpected internal failures.
pub const INTERNAL: &str = "INTERNAL";

/// `Error` enumerates errors returned by manifest parsing, construction,
/// and the engine operations.
///
/// A manifest that parses but fails one or more trust checks is not an
/// error: validation reports it through
/// [`ValidationStatus`](crate::ValidationStatus).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The manifest store or a manifest in it is malformed.
    #[error("invalid manifest structure: {0}")]
    InvalidStructure(String),

    #[error(transparent)]
    JumbfParseError(#[from] crate::jumbf::boxes::JumbfParseError),

    /// The manifest store exceeds the configured size limit.
    #[error("manifest store of {size} bytes exceeds the limit of {limit} bytes")]
    ManifestTooLarge { size: usize, limit: usize },

    /// The claim could not be decoded.
    #[error("claim could not be decoded: {0}")]
    ClaimDecoding(String),

    /// The claim signature could not be decoded.
    #[error("claim signature could not be decoded: {0}")]
    SignatureDecoding(String),

    /// A manifest reference could not be interpreted.
    #[error("invalid manifest reference: {0}")]
    InvalidReference(String),

    /// A route pattern could not be interpreted.
    #[error("invalid route pattern \"{0}\"")]
    InvalidRoutePattern(String),

    /// A remote URL was rejected before any network I/O.
    #[error("remote URL \"{url}\" is not permitted: {reason}")]
    UrlDisallowed { url: String, reason: String },

    /// A remote fetch failed.
    #[error("could not fetch \"{url}\": {reason}")]
    FetchFailed { url: String, reason: String },

    /// A remote fetch did not complete in time.
    #[error("fetch of \"{url}\" timed out after {timeout_ms} ms")]
    FetchTimeout { url: String, timeout_ms: u64 },

    /// The parent of a derivative did not validate.
    ///
    /// `codes` holds the parent's validation status codes.
    #[error("parent manifest {manifest_hash} is not trustworthy")]
    UntrustedParent {
        manifest_hash: String,
        codes: Vec<String>,
    },

    /// An assertion could not be encoded.
    #[error("assertion {label} could not be encoded: {reason}")]
    AssertionEncoding { label: String, reason: String },

    /// An assertion label was used twice in one manifest.
    #[error("duplicate assertion label {0}")]
    DuplicateAssertion(String),

    /// A redaction names an assertion that is not part of the manifest.
    #[error("cannot redact {0}: no such assertion")]
    AssertionRedactionNotFound(String),

    /// Signing the claim failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Settings could not be loaded or are inconsistent.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("bad parameter: {0}")]
    BadParam(String),

    #[error(transparent)]
    HttpResolverError(#[from] HttpResolverError),

    #[error(transparent)]
    CoseError(#[from] c2pa_lineage_crypto::cose::CoseError),

    #[error(transparent)]
    RawSignerError(#[from] c2pa_lineage_crypto::raw_signature::RawSignerError),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidStructure(_)
            | Self::JumbfParseError(_)
            | Self::ManifestTooLarge { .. }
            | Self::ClaimDecoding(_)
            | Self::SignatureDecoding(_)
            | Self::JsonError(_) => INVALID_STRUCTURE,

            Self::InvalidReference(_) | Self::InvalidRoutePattern(_) => INVALID_REFERENCE,

            Self::UrlDisallowed { .. }
            | Self::HttpResolverError(HttpResolverError::UriDisallowed { .. }) => URL_DISALLOWED,

            Self::FetchFailed { .. } | Self::FetchTimeout { .. } | Self::HttpResolverError(_) => {
                FETCH_FAILED
            }

            Self::UntrustedParent { .. } => UNTRUSTED_PARENT,

            Self::AssertionEncoding { .. }
            | Self::DuplicateAssertion(_)
            | Self::AssertionRedactionNotFound(_)
            | Self::SigningFailed(_)
            | Self::CoseError(_)
            | Self::RawSignerError(_) => SIGNING_FAILED,

            Self::InvalidSettings(_) => INVALID_SETTINGS,

            Self::BadParam(_) => BAD_PARAM,

            Self::IoError(_) => INTERNAL,
        }
    }

    /// Returns the clause this error is reported against, for transcripts.
    pub fn spec_reference(&self) -> &'static str {
        match self.code() {
            INVALID_STRUCTURE => "C2PA 2.1 Manifest Store: JUMBF container layout",
            INVALID_REFERENCE => "Manifest references: inline, asset, sidecar, manifest URL",
            URL_DISALLOWED => "Remote fetch boundary: https only, public hosts, allow-list",
            FETCH_FAILED => "Remote fetch boundary: per-fetch timeout and status",
            UNTRUSTED_PARENT => "C2PA 2.1 Validation: ingredient manifests must validate",
            SIGNING_FAILED => "C2PA 2.1 Claim Signature: COSE_Sign1",
            INVALID_SETTINGS => "Settings: trust, lineage, network, diff, core",
            _ => "c2pa-lineage",
        }
    }

    /// Returns `true` if the error was caused by the caller's input rather
    /// than by the network or the environment.
    pub fn is_structural(&self) -> bool {
        matches!(
            self.code(),
            INVALID_STRUCTURE | INVALID_REFERENCE | URL_DISALLOWED | BAD_PARAM
        )
    }
}

/// A specialized `Result` type for manifest operations.
pub type Result<T> = std::result::Result<T, Error>;
