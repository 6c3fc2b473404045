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

//! Validation results for a manifest.

#![deny(missing_docs)]

pub use c2pa_lineage_status_tracker::validation_codes::*;
use c2pa_lineage_status_tracker::{LogItem, LogKind, StatusTracker};
use serde::{Serialize, Serializer};

/// One entry of a validation result: a code from the closed vocabulary in
/// [`validation_codes`](c2pa_lineage_status_tracker::validation_codes) and
/// what it was reported against.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ValidationCode {
    code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,

    #[serde(serialize_with = "serialize_kind")]
    kind: LogKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    ingredient_uri: Option<String>,
}

fn serialize_kind<S: Serializer>(kind: &LogKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(match kind {
        LogKind::Success => "success",
        LogKind::Informational => "informational",
        LogKind::Failure => "failure",
    })
}

impl ValidationCode {
    /// Creates an entry for `code`, classified by the vocabulary.
    pub fn new<S: Into<String>>(code: S) -> Self {
        let code = code.into();
        Self {
            kind: log_kind(&code),
            code,
            url: None,
            explanation: None,
            ingredient_uri: None,
        }
    }

    /// Returns the validation status code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the JUMBF URI of the entity that was validated.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns a human-readable description of the check.
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Returns whether this entry is a success, informational, or failure.
    pub fn kind(&self) -> LogKind {
        self.kind
    }

    /// Returns the hashed URI of the ingredient manifest being examined,
    /// if the check was made on behalf of an ingredient.
    pub fn ingredient_uri(&self) -> Option<&str> {
        self.ingredient_uri.as_deref()
    }

    /// Sets the JUMBF URI of the entity that was validated.
    pub fn set_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the human-readable description of the check.
    pub fn set_explanation<S: Into<String>>(mut self, explanation: S) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Returns `true` if this entry is not a failure.
    pub fn passed(&self) -> bool {
        self.kind != LogKind::Failure
    }

    /// Returns the clause this code is defined by.
    pub fn clause_reference(&self) -> &'static str {
        clause_reference(&self.code).unwrap_or("C2PA 2.1 Validation")
    }

    /// Creates an entry from a log item, if the item carries a validation
    /// status code.
    pub(crate) fn from_log_item(item: &LogItem) -> Option<Self> {
        let code = item.validation_status.as_ref()?;
        let explanation = match &item.err_val {
            Some(err) => format!("{}: {err}", item.description),
            None => item.description.to_string(),
        };
        Some(Self {
            code: code.to_string(),
            url: Some(item.label.to_string()).filter(|l| !l.is_empty()),
            explanation: Some(explanation),
            kind: item.kind,
            ingredient_uri: item.ingredient_uri.as_ref().map(|u| u.to_string()),
        })
    }
}

/// The outcome of validating one manifest.
///
/// `codes` lists one entry per independent check, in the order the checks
/// ran. `valid` is `true` only if no entry is a failure.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ValidationStatus {
    valid: bool,
    codes: Vec<ValidationCode>,
}

impl ValidationStatus {
    /// Builds a result from every coded item in a status tracker.
    pub fn from_tracker(tracker: &StatusTracker) -> Self {
        Self::from_codes(
            tracker
                .logged_items()
                .iter()
                .filter_map(ValidationCode::from_log_item)
                .collect(),
        )
    }

    /// Builds a result from a list of entries.
    pub fn from_codes(codes: Vec<ValidationCode>) -> Self {
        Self {
            valid: codes.iter().all(ValidationCode::passed),
            codes,
        }
    }

    /// Returns `true` if no check failed.
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Returns every entry in check order.
    pub fn codes(&self) -> &[ValidationCode] {
        &self.codes
    }

    /// Returns the code strings in check order.
    pub fn code_strings(&self) -> Vec<&str> {
        self.codes.iter().map(ValidationCode::code).collect()
    }

    /// Returns `true` if any entry has the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c.code == code)
    }

    /// Returns the entries reported against the given JUMBF URI.
    pub fn codes_for<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a ValidationCode> {
        self.codes.iter().filter(move |c| c.url() == Some(url))
    }

    /// Returns the failing entries.
    pub fn failures(&self) -> impl Iterator<Item = &ValidationCode> {
        self.codes.iter().filter(|c| !c.passed())
    }
}
