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

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    assertion::{Assertion, AssertionBase, AssertionJson},
    assertions::labels,
    error::Result,
};

const CW_AUTHOR: &str = "author";

/// A schema.org `CreativeWork` assertion.
///
/// Fields other than the ones with accessors are kept as-is.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CreativeWork(Map<String, Value>);

impl CreativeWork {
    /// Label prefix for a creative work assertion.
    pub const LABEL: &'static str = labels::CREATIVE_WORK;

    pub fn new() -> Self {
        let mut fields = Map::new();
        fields.insert("@context".to_string(), "http://schema.org/".into());
        fields.insert("@type".to_string(), "CreativeWork".into());
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert<S: Into<String>, T: Serialize>(mut self, key: S, value: T) -> Result<Self> {
        self.0.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Names of the `author` entries that carry one.
    pub fn author_names(&self) -> Vec<&str> {
        match self.get(CW_AUTHOR) {
            Some(Value::Array(authors)) => authors
                .iter()
                .filter_map(|a| a.get("name").and_then(Value::as_str))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn add_author(self, name: &str) -> Result<Self> {
        let mut authors = match self.get(CW_AUTHOR) {
            Some(Value::Array(authors)) => authors.clone(),
            _ => Vec::new(),
        };
        authors.push(serde_json::json!({"@type": "Person", "name": name}));
        self.insert(CW_AUTHOR, authors)
    }
}

impl Default for CreativeWork {
    fn default() -> Self {
        Self::new()
    }
}

impl AssertionJson for CreativeWork {}

impl AssertionBase for CreativeWork {
    const LABEL: &'static str = labels::CREATIVE_WORK;

    fn to_assertion(&self) -> Result<Assertion> {
        Self::to_json_assertion(self)
    }

    fn from_assertion(assertion: &Assertion) -> Result<Self> {
        Self::from_json_assertion(assertion)
    }
}
