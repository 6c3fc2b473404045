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

use std::fmt;

use log::warn;
use serde::{de::DeserializeOwned, Serialize, Serializer};
use serde_json::Value;

use crate::{
    assertions::{labels, Actions, CreativeWork, IngredientAssertion},
    canonical::{canonicalize, canonicalize_serializable, hash_bytes},
    error::{Error, Result},
    jumbf::labels::to_relative_assertion_uri,
    HashedUri,
};

/// The core required trait for all typed assertions.
///
/// This defines the label for the assertion and supplies the to/from
/// converters for the C2PA assertion format.
pub trait AssertionBase
where
    Self: Sized,
{
    const LABEL: &'static str;

    /// Returns a label for this assertion.
    fn label(&self) -> &str {
        Self::LABEL
    }

    /// Returns an Assertion upon success or Error otherwise.
    fn to_assertion(&self) -> Result<Assertion>;

    /// Returns Self from an assertion of either encoding.
    fn from_assertion(assertion: &Assertion) -> Result<Self>;
}

/// Trait to handle default CBOR encoding of assertions.
pub trait AssertionCbor: Serialize + DeserializeOwned + AssertionBase {
    fn to_cbor_assertion(&self) -> Result<Assertion> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).map_err(|e| Error::AssertionEncoding {
            label: self.label().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Assertion::new(self.label(), ContentKind::Cbor, buf))
    }

    fn from_cbor_assertion(assertion: &Assertion) -> Result<Self> {
        assertion.decode()
    }
}

/// Trait to handle default JSON encoding of assertions.
///
/// JSON assertions are written in canonical form.
pub trait AssertionJson: Serialize + DeserializeOwned + AssertionBase {
    fn to_json_assertion(&self) -> Result<Assertion> {
        let json = canonicalize_serializable(self).map_err(|e| Error::AssertionEncoding {
            label: self.label().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Assertion::new(self.label(), ContentKind::Json, json))
    }

    fn from_json_assertion(assertion: &Assertion) -> Result<Self> {
        assertion.decode()
    }
}

/// Encoding of an assertion's content box.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ContentKind {
    Json,
    Cbor,
    /// Any other content box, identified by its box type.
    Other([u8; 4]),
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Cbor => f.write_str("cbor"),
            Self::Other(box_type) => write!(f, "{}", String::from_utf8_lossy(box_type)),
        }
    }
}

impl Serialize for ContentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Assertion payload, decoded according to the assertion's label.
///
/// Labels this crate knows decode to typed variants. Other labels with
/// JSON or CBOR content decode to [`AssertionData::Untyped`]. Anything else,
/// including a known label whose content does not match its schema, is
/// [`AssertionData::Opaque`]; the raw bytes are always kept on the
/// [`Assertion`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum AssertionData {
    Actions(Actions),
    Ingredient(IngredientAssertion),
    CreativeWork(CreativeWork),
    Untyped(Value),
    Opaque,
}

impl AssertionData {
    fn decode(label: &str, kind: ContentKind, raw: &[u8]) -> Self {
        let Some(value) = decode_value(kind, raw) else {
            return Self::Opaque;
        };

        let root = labels::label_root(label);
        let typed = match root {
            labels::ACTIONS => serde_json::from_value(value.clone()).map(Self::Actions),
            labels::INGREDIENT => serde_json::from_value(value.clone()).map(Self::Ingredient),
            labels::CREATIVE_WORK => serde_json::from_value(value.clone()).map(Self::CreativeWork),
            _ => return Self::Untyped(value),
        };

        typed.unwrap_or_else(|err| {
            warn!("assertion {label} does not match its schema: {err}");
            Self::Opaque
        })
    }
}

fn decode_value(kind: ContentKind, raw: &[u8]) -> Option<Value> {
    match kind {
        ContentKind::Json => serde_json::from_slice(raw).ok(),
        ContentKind::Cbor => ciborium::from_reader(raw).ok(),
        ContentKind::Other(_) => None,
    }
}

/// An assertion as recorded in a claim.
///
/// `hashed_uri` is the hash the claim records for this assertion, not a
/// hash recomputed from `raw`; validation compares the two. A redacted
/// assertion has no content at all.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    label: String,
    hashed_uri: HashedUri,
    content_kind: ContentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<AssertionData>,
    redacted: bool,
    #[serde(with = "crate::utils::base64::bytes")]
    raw: Vec<u8>,
}

impl Assertion {
    /// Creates an assertion from its content; the hashed URI is computed
    /// from `raw`.
    pub fn new(label: &str, content_kind: ContentKind, raw: Vec<u8>) -> Self {
        let hashed_uri = hash_bytes(&raw);
        Self::from_parts(label, hashed_uri, content_kind, raw)
    }

    /// Creates an assertion whose claimed hash may differ from its content.
    pub(crate) fn from_parts(
        label: &str,
        hashed_uri: HashedUri,
        content_kind: ContentKind,
        raw: Vec<u8>,
    ) -> Self {
        Self {
            label: label.to_owned(),
            hashed_uri,
            content_kind,
            data: Some(AssertionData::decode(label, content_kind, &raw)),
            redacted: false,
            raw,
        }
    }

    /// Creates a placeholder for an assertion the claim lists as redacted.
    pub(crate) fn redacted(label: &str, hashed_uri: HashedUri) -> Self {
        Self {
            label: label.to_owned(),
            hashed_uri,
            content_kind: ContentKind::Other(*b"    "),
            data: None,
            redacted: true,
            raw: Vec::new(),
        }
    }

    /// Creates a JSON assertion with an arbitrary label from a JSON value.
    ///
    /// The content is written in canonical form.
    pub fn from_json_value(label: &str, value: &Value) -> Self {
        Self::new(label, ContentKind::Json, canonicalize(value))
    }

    /// Creates a CBOR assertion with an arbitrary label from any
    /// serializable value.
    pub fn from_cbor<T: Serialize>(label: &str, value: &T) -> Result<Self> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf).map_err(|e| Error::AssertionEncoding {
            label: label.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(label, ContentKind::Cbor, buf))
    }

    pub(crate) fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the label without its instance suffix.
    pub fn label_root(&self) -> &str {
        labels::label_root(&self.label)
    }

    /// The hash of this assertion as recorded in the claim.
    pub fn hashed_uri(&self) -> &HashedUri {
        &self.hashed_uri
    }

    /// JUMBF URI of this assertion relative to its manifest.
    pub fn url(&self) -> String {
        to_relative_assertion_uri(&self.label)
    }

    pub fn content_kind(&self) -> ContentKind {
        self.content_kind
    }

    /// Decoded content, or `None` if the assertion is redacted.
    pub fn data(&self) -> Option<&AssertionData> {
        self.data.as_ref()
    }

    pub fn is_redacted(&self) -> bool {
        self.redacted
    }

    /// Raw bytes of the content box, exactly as stored.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Returns `true` if the hash of the raw content equals the hash the
    /// claim records.
    pub fn hash_matches(&self) -> bool {
        !self.redacted && hash_bytes(&self.raw) == self.hashed_uri
    }

    /// Content as a JSON value, if it is JSON or CBOR.
    pub fn value(&self) -> Option<Value> {
        if self.redacted {
            return None;
        }
        decode_value(self.content_kind, &self.raw)
    }

    /// Bytes used to decide whether two assertions carry the same content:
    /// the canonical JSON encoding for structured content, otherwise the
    /// raw bytes.
    pub fn comparison_bytes(&self) -> Vec<u8> {
        match self.value() {
            Some(value) => canonicalize(&value),
            None => self.raw.clone(),
        }
    }

    /// Decodes JSON or CBOR content into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let decode_err = |reason: String| {
            Error::InvalidStructure(format!("assertion {} can not be decoded: {reason}", self.label))
        };
        match self.content_kind {
            _ if self.redacted => Err(decode_err("assertion is redacted".to_string())),
            ContentKind::Json => {
                serde_json::from_slice(&self.raw).map_err(|e| decode_err(e.to_string()))
            }
            ContentKind::Cbor => {
                ciborium::from_reader(self.raw.as_slice()).map_err(|e| decode_err(e.to_string()))
            }
            ContentKind::Other(_) => Err(decode_err(format!(
                "content box {} is not JSON or CBOR",
                self.content_kind
            ))),
        }
    }
}

#[cfg(test)]
pub mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::assertions::{c2pa_action, Action};

    #[test]
    fn typed_data_by_label() {
        let actions = Actions::new().add_action(Action::new(c2pa_action::CREATED));
        let assertion = actions.to_assertion().unwrap();
        assert!(matches!(assertion.data(), Some(AssertionData::Actions(a)) if a == &actions));

        let policy = Assertion::from_json_value("com.c2c.policy.v1", &json!({"license": "CC-BY"}));
        assert_eq!(
            policy.data(),
            Some(&AssertionData::Untyped(json!({"license": "CC-BY"})))
        );
        assert_eq!(policy.raw(), br#"{"license":"CC-BY"}"#);
    }

    #[test]
    fn known_label_with_wrong_schema_is_opaque() {
        let assertion = Assertion::from_json_value(labels::ACTIONS, &json!({"actions": 3}));
        assert_eq!(assertion.data(), Some(&AssertionData::Opaque));
        assert_eq!(assertion.value(), Some(json!({"actions": 3})));
    }

    #[test]
    fn unknown_content_is_opaque() {
        let assertion = Assertion::new("c2pa.thumbnail.claim.jpeg", ContentKind::Other(*b"bidb"), vec![0xff, 0xd8]);
        assert_eq!(assertion.data(), Some(&AssertionData::Opaque));
        assert_eq!(assertion.value(), None);
        assert_eq!(assertion.comparison_bytes(), vec![0xff, 0xd8]);
        assert!(assertion.hash_matches());
    }

    #[test]
    fn hash_binding() {
        let original = Assertion::from_json_value("com.c2c.policy.v1", &json!({"a": 1}));
        let mut raw = original.raw().to_vec();
        raw[5] ^= 0x01;

        let tampered = Assertion::from_parts(
            original.label(),
            *original.hashed_uri(),
            ContentKind::Json,
            raw.clone(),
        );
        assert!(!tampered.hash_matches());
        assert_ne!(hash_bytes(&raw), *original.hashed_uri());

        // relabelling does not change the content hash
        let renamed = original.clone().with_label("com.c2c.policy.v2");
        assert_eq!(renamed.hashed_uri(), original.hashed_uri());
    }

    #[test]
    fn same_value_in_either_encoding_compares_equal() {
        let value = json!({"b": [1, 2], "a": "x"});
        let json = Assertion::from_json_value("com.c2c.policy.v1", &value);
        let cbor = Assertion::from_cbor("com.c2c.policy.v1", &value).unwrap();
        assert_ne!(json.hashed_uri(), cbor.hashed_uri());
        assert_eq!(json.comparison_bytes(), cbor.comparison_bytes());
    }

    #[test]
    fn redacted_placeholder() {
        let assertion = Assertion::redacted("c2pa.location", hash_bytes(b"x"));
        assert!(assertion.is_redacted());
        assert!(assertion.data().is_none());
        assert!(assertion.value().is_none());
        assert!(!assertion.hash_matches());
        assert!(assertion.decode::<Value>().is_err());
        assert_eq!(assertion.url(), "self#jumbf=c2pa.assertions/c2pa.location");
    }
}
