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

//! Evidence bundles: everything needed to archive the verification of a
//! pair of manifests.

use std::fmt;

use c2pa_lineage_status_tracker::{validation_codes::*, LogKind};
use serde::{Deserialize, Serialize};

use crate::{
    diff::SemanticDiff,
    lineage::LineageGraph,
    manifest::Manifest,
    validation_status::{ValidationCode, ValidationStatus},
};

/// Transcript step for the base manifest's validation.
pub const STEP_VALIDATE_BASE: &str = "validate.base";
/// Transcript step for the target manifest's validation.
pub const STEP_VALIDATE_TARGET: &str = "validate.target";
/// Transcript step for the validation of the target's ancestors.
pub const STEP_LINEAGE: &str = "lineage";

/// Overall outcome of an evidence export.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Verdict {
    /// Every check passed.
    Verified,
    /// The manifests verify, but a time-stamp, an ancestor or the lineage
    /// walk reported a problem.
    VerifiedWithWarnings,
    /// The base or target manifest failed a check.
    Unverified,
    /// An ingredient manifest could not be resolved.
    Unresolved,
}

impl Verdict {
    /// Process exit code for command line front ends.
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Verified => 0,
            Verdict::VerifiedWithWarnings => 2,
            Verdict::Unverified => 3,
            Verdict::Unresolved => 4,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Verified => "verified",
            Verdict::VerifiedWithWarnings => "verified with warnings",
            Verdict::Unverified => "unverified",
            Verdict::Unresolved => "unresolved",
        })
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepResult {
    Pass,
    Warning,
    Fail,
}

/// One line of a verification transcript.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub step: String,
    pub code: String,
    pub result: StepResult,
    pub spec_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TranscriptEntry {
    fn from_code(step: &str, code: &ValidationCode) -> Self {
        let result = match code.kind() {
            LogKind::Success => StepResult::Pass,
            LogKind::Informational => StepResult::Warning,
            LogKind::Failure if step == STEP_LINEAGE || code.code() == TIMESTAMP_UNTRUSTED => {
                StepResult::Warning
            }
            LogKind::Failure => StepResult::Fail,
        };

        Self {
            step: step.to_string(),
            code: code.code().to_string(),
            result,
            spec_reference: code.clause_reference().to_string(),
            url: code.url().map(str::to_owned),
        }
    }
}

/// Builds the ordered transcript: base validation, target validation, then
/// each ancestor of the target in manifest hash order.
pub fn transcript(
    base: &ValidationStatus,
    target: &ValidationStatus,
    lineage: &LineageGraph,
) -> Vec<TranscriptEntry> {
    let mut entries: Vec<TranscriptEntry> = base
        .codes()
        .iter()
        .map(|c| TranscriptEntry::from_code(STEP_VALIDATE_BASE, c))
        .chain(
            target
                .codes()
                .iter()
                .map(|c| TranscriptEntry::from_code(STEP_VALIDATE_TARGET, c)),
        )
        .collect();

    for hash in lineage.ancestors() {
        if let Some(node) = lineage.node(&hash) {
            entries.extend(
                node.validation
                    .codes()
                    .iter()
                    .map(|c| TranscriptEntry::from_code(STEP_LINEAGE, c)),
            );
        }
    }

    entries
}

/// Derives the verdict of a transcript.
///
/// An unresolved ingredient manifest makes the verdict
/// [`Verdict::Unresolved`] even when other checks failed.
pub fn verdict(transcript: &[TranscriptEntry]) -> Verdict {
    if transcript
        .iter()
        .any(|e| e.code == INGREDIENT_MANIFEST_MISSING)
    {
        Verdict::Unresolved
    } else if transcript.iter().any(|e| e.result == StepResult::Fail) {
        Verdict::Unverified
    } else if transcript.iter().any(|e| e.result == StepResult::Warning) {
        Verdict::VerifiedWithWarnings
    } else {
        Verdict::Verified
    }
}

/// The archived verification of a base and a target manifest.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvidenceBundle {
    pub base: Manifest,
    pub target: Manifest,
    pub semantic_diff: SemanticDiff,
    pub lineage: LineageGraph,
    pub transcript: Vec<TranscriptEntry>,
    pub verdict: Verdict,
    pub exit_code: i32,
}
