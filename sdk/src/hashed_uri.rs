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

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const NI_SHA256_PREFIX: &str = "ni:///sha-256;";

/// A content-addressed reference of the form `ni:///sha-256;<hex>`
/// ([RFC 6920]).
///
/// Two `HashedUri`s are equal exactly when their digests are equal; nothing
/// about the referenced content is compared.
///
/// [RFC 6920]: https://datatracker.ietf.org/doc/html/rfc6920
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct HashedUri {
    hash: [u8; 32],
}

impl HashedUri {
    /// Wraps an existing SHA-256 digest.
    pub fn from_digest(hash: [u8; 32]) -> Self {
        Self { hash }
    }

    pub fn digest(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Lowercase hex form of the digest.
    pub fn hex(&self) -> String {
        hex::encode(self.hash)
    }
}

impl fmt::Display for HashedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NI_SHA256_PREFIX}{}", self.hex())
    }
}

impl fmt::Debug for HashedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashedUri({self})")
    }
}

/// The string is not a `ni:///sha-256;` URI with a 32-byte digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a sha-256 hashed URI: {0:?}")]
pub struct InvalidHashedUri(pub String);

impl FromStr for HashedUri {
    type Err = InvalidHashedUri;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_digest = s
            .strip_prefix(NI_SHA256_PREFIX)
            .ok_or_else(|| InvalidHashedUri(s.to_string()))?;

        let mut hash = [0u8; 32];
        hex::decode_to_slice(hex_digest, &mut hash).map_err(|_| InvalidHashedUri(s.to_string()))?;

        Ok(Self { hash })
    }
}

impl Serialize for HashedUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HashedUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const EMPTY: &str =
        "ni:///sha-256;e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn parse_and_display() {
        let uri: HashedUri = EMPTY.parse().unwrap();
        assert_eq!(uri.to_string(), EMPTY);
        assert_eq!(uri.digest()[0], 0xe3);
        assert_eq!(&uri.hex(), &EMPTY[14..]);
    }

    #[test]
    fn rejects_other_forms() {
        assert!("ni:///sha-384;e3b0".parse::<HashedUri>().is_err());
        assert!("ni:///sha-256;e3b0".parse::<HashedUri>().is_err());
        assert!("ni:///sha-256;zz".parse::<HashedUri>().is_err());
        assert!(EMPTY[14..].parse::<HashedUri>().is_err());
    }

    #[test]
    fn serde_as_string() {
        let uri: HashedUri = EMPTY.parse().unwrap();
        let json = serde_json::to_string(&uri).unwrap();
        assert_eq!(json, format!("\"{EMPTY}\""));
        assert_eq!(serde_json::from_str::<HashedUri>(&json).unwrap(), uri);
    }

    #[test]
    fn equality_is_digest_equality() {
        let a = HashedUri::from_digest([1; 32]);
        let b = HashedUri::from_digest([1; 32]);
        let c = HashedUri::from_digest([2; 32]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
    }
}
