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

//! The closed vocabulary of validation status codes.
//!
//! Callers and tests may match on these exact strings. The C2PA codes follow
//! [§15.2.1, “Standard Status Codes.”]; the `lineage.*` codes are emitted by
//! lineage reconstruction only.
//!
//! [§15.2.1, “Standard Status Codes.”]: https://c2pa.org/specifications/specifications/2.1/specs/C2PA_Specification.html#_standard_status_codes

use crate::LogKind;

// -- success codes --

/// The manifest store and the manifest have every mandatory part.
///
/// Any corresponding URL should point to a C2PA manifest box.
pub const MANIFEST_STRUCTURE_VALID: &str = "manifest.structureValid";

/// The signing credential chains to a trust anchor, is inside its validity
/// period at signing time, and has not been revoked.
///
/// Any corresponding URL should point to a C2PA claim signature box.
pub const SIGNING_CREDENTIAL_TRUSTED: &str = "signingCredential.trusted";

/// The claim signature verified over the claim bytes.
///
/// Any corresponding URL should point to a C2PA claim signature box.
pub const SIGNATURE_VALID: &str = "signature.valid";

/// The time-stamp countersignature verified and chains to a trusted
/// time-stamp authority.
///
/// Any corresponding URL should point to a C2PA claim signature box.
pub const TIMESTAMP_TRUSTED: &str = "timestamp.trusted";

/// The hash of the referenced assertion matches the corresponding hash in
/// the assertion's hashed URI in the claim.
///
/// Any corresponding URL should point to a C2PA assertion.
pub const ASSERTION_HASHEDURI_MATCH: &str = "assertion.hashedURI.match";

/// The claim signature copied into the ingredient assertion is identical to
/// the signature of the ingredient's own manifest.
///
/// Any corresponding URL should point to a C2PA assertion.
pub const INGREDIENT_CLAIM_SIGNATURE_MATCH: &str = "ingredient.claimSignature.match";

// -- informational codes --

/// The manifest referenced by an ingredient could not be resolved.
///
/// Any corresponding URL should point to a C2PA assertion.
pub const INGREDIENT_MANIFEST_MISSING: &str = "ingredient.manifestMissing";

/// Lineage reconstruction reached a manifest already on the current path and
/// stopped following that branch.
pub const LINEAGE_CYCLE_DETECTED: &str = "lineage.cycleDetected";

/// Lineage reconstruction reached the configured depth limit and stopped
/// following that branch.
pub const LINEAGE_DEPTH_EXCEEDED: &str = "lineage.depthExceeded";

// -- failure codes --

/// The manifest store or the manifest is missing a mandatory part or is
/// internally inconsistent.
///
/// Any corresponding URL should point to a C2PA manifest box.
pub const MANIFEST_STRUCTURE_INVALID: &str = "manifest.structureInvalid";

/// The signing credential does not chain to a trust anchor, was outside its
/// validity period at signing time, was revoked, or is not allowed to sign
/// claims.
///
/// Any corresponding URL should point to a C2PA claim signature box.
pub const SIGNING_CREDENTIAL_UNTRUSTED: &str = "signingCredential.untrusted";

/// The claim signature did not verify.
///
/// Any corresponding URL should point to a C2PA claim signature box.
pub const SIGNATURE_INVALID: &str = "signature.invalid";

/// A time-stamp countersignature was present but did not verify, did not
/// bind to the claim signature, or does not chain to a trusted time-stamp
/// authority.
///
/// Any corresponding URL should point to a C2PA claim signature box.
pub const TIMESTAMP_UNTRUSTED: &str = "timestamp.untrusted";

/// The hash of the referenced assertion does not match the corresponding hash
/// in the assertion's hashed URI in the claim.
///
/// Any corresponding URL should point to a C2PA assertion.
pub const ASSERTION_HASHEDURI_MISMATCH: &str = "assertion.hashedURI.mismatch";

/// The claim signature copied into the ingredient assertion differs from the
/// signature of the ingredient's own manifest.
///
/// Any corresponding URL should point to a C2PA assertion.
pub const INGREDIENT_CLAIM_SIGNATURE_MISMATCH: &str = "ingredient.claimSignature.mismatch";

/// Every code in the vocabulary, in the order in which validation emits
/// them.
pub const ALL_CODES: &[&str] = &[
    MANIFEST_STRUCTURE_VALID,
    MANIFEST_STRUCTURE_INVALID,
    SIGNING_CREDENTIAL_TRUSTED,
    SIGNING_CREDENTIAL_UNTRUSTED,
    SIGNATURE_VALID,
    SIGNATURE_INVALID,
    TIMESTAMP_TRUSTED,
    TIMESTAMP_UNTRUSTED,
    ASSERTION_HASHEDURI_MATCH,
    ASSERTION_HASHEDURI_MISMATCH,
    INGREDIENT_CLAIM_SIGNATURE_MATCH,
    INGREDIENT_CLAIM_SIGNATURE_MISMATCH,
    INGREDIENT_MANIFEST_MISSING,
    LINEAGE_CYCLE_DETECTED,
    LINEAGE_DEPTH_EXCEEDED,
];

/// Returns `true` if the status code is a known success status code.
///
/// Returns `false` if the status code is a failure or informational code or
/// is unknown.
///
/// ## Examples
///
/// ```
/// use c2pa_lineage_status_tracker::validation_codes::*;
///
/// assert!(is_success(SIGNATURE_VALID));
/// assert!(!is_success(SIGNING_CREDENTIAL_UNTRUSTED));
/// assert!(!is_success(INGREDIENT_MANIFEST_MISSING));
/// ```
pub fn is_success(status_code: &str) -> bool {
    matches!(log_kind(status_code), LogKind::Success)
}

/// Returns the [`LogKind`] for a given status code.
///
/// Unknown codes are treated as failures.
pub fn log_kind(status_code: &str) -> LogKind {
    match status_code {
        MANIFEST_STRUCTURE_VALID
        | SIGNING_CREDENTIAL_TRUSTED
        | SIGNATURE_VALID
        | TIMESTAMP_TRUSTED
        | ASSERTION_HASHEDURI_MATCH
        | INGREDIENT_CLAIM_SIGNATURE_MATCH => LogKind::Success,
        INGREDIENT_MANIFEST_MISSING | LINEAGE_CYCLE_DETECTED | LINEAGE_DEPTH_EXCEEDED => {
            LogKind::Informational
        }
        _ => LogKind::Failure,
    }
}

/// Returns the clause reference for a status code, suitable for archival
/// transcripts.
///
/// Returns `None` for codes outside the vocabulary.
pub fn clause_reference(status_code: &str) -> Option<&'static str> {
    Some(match status_code {
        MANIFEST_STRUCTURE_VALID | MANIFEST_STRUCTURE_INVALID => {
            "C2PA 2.1 Validation: Manifest Structure"
        }
        SIGNING_CREDENTIAL_TRUSTED | SIGNING_CREDENTIAL_UNTRUSTED => {
            "C2PA 2.1 Trust Model: Signing Credentials"
        }
        SIGNATURE_VALID | SIGNATURE_INVALID => "C2PA 2.1 Validation: Claim Signature",
        TIMESTAMP_TRUSTED | TIMESTAMP_UNTRUSTED => "C2PA 2.1 Trust Model: Time-Stamps",
        ASSERTION_HASHEDURI_MATCH | ASSERTION_HASHEDURI_MISMATCH => {
            "C2PA 2.1 Validation: Assertions"
        }
        INGREDIENT_CLAIM_SIGNATURE_MATCH
        | INGREDIENT_CLAIM_SIGNATURE_MISMATCH
        | INGREDIENT_MANIFEST_MISSING => "C2PA 2.1 Validation: Ingredients",
        LINEAGE_CYCLE_DETECTED | LINEAGE_DEPTH_EXCEEDED => {
            "Lineage reconstruction: bounded breadth-first traversal"
        }
        _ => return None,
    })
}
