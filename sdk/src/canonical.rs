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

//! Canonical JSON encoding and SHA-256 hashed URIs.
//!
//! The canonical form is byte exact: object keys sorted by their UTF-8 bytes
//! at every level, arrays in order, no insignificant whitespace, minimal
//! string escaping with non-ASCII text emitted as-is, and ECMAScript-style
//! shortest number formatting. Every hash in a manifest is computed over
//! this form or over raw content-box bytes, never over a library's default
//! serialization.

use serde::Serialize;
use serde_json::{Number, Value};
use sha2::{Digest, Sha256};

use crate::{HashedUri, Result};

// Largest integer that survives a round trip through an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Returns the canonical encoding of `value`.
pub fn canonicalize(value: &Value) -> Vec<u8> {
    let mut out = Vec::with_capacity(128);
    write_value(&mut out, value);
    out
}

/// Converts `value` to JSON and returns its canonical encoding.
pub fn canonicalize_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(canonicalize(&serde_json::to_value(value)?))
}

/// Re-encodes a JSON document in canonical form.
pub fn canonicalize_json_bytes(json: &[u8]) -> Result<Vec<u8>> {
    let value: Value = serde_json::from_slice(json)?;
    Ok(canonicalize(&value))
}

/// Returns the hashed URI of the canonical encoding of `value`.
pub fn hash_uri(value: &Value) -> HashedUri {
    hash_bytes(&canonicalize(value))
}

/// Returns the hashed URI of raw bytes.
pub fn hash_bytes(bytes: &[u8]) -> HashedUri {
    HashedUri::from_digest(Sha256::digest(bytes).into())
}

fn write_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(out, item);
            }
            out.push(b']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push(b'{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_string(out, key);
                out.push(b':');
                write_value(out, item);
            }
            out.push(b'}');
        }
    }
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    out.push(b'"');
    for c in s.chars() {
        match c {
            '"' => out.extend_from_slice(b"\\\""),
            '\\' => out.extend_from_slice(b"\\\\"),
            '\u{08}' => out.extend_from_slice(b"\\b"),
            '\u{0c}' => out.extend_from_slice(b"\\f"),
            '\n' => out.extend_from_slice(b"\\n"),
            '\r' => out.extend_from_slice(b"\\r"),
            '\t' => out.extend_from_slice(b"\\t"),
            c if (c as u32) < 0x20 => {
                out.extend_from_slice(format!("\\u{:04x}", c as u32).as_bytes());
            }
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    out.push(b'"');
}

fn write_number(out: &mut Vec<u8>, n: &Number) {
    if let Some(u) = n.as_u64() {
        out.extend_from_slice(u.to_string().as_bytes());
    } else if let Some(i) = n.as_i64() {
        out.extend_from_slice(i.to_string().as_bytes());
    } else if let Some(f) = n.as_f64() {
        out.extend_from_slice(format_float(f).as_bytes());
    } else {
        out.extend_from_slice(n.to_string().as_bytes());
    }
}

/// Formats a finite float the way ECMAScript's `Number.prototype.toString`
/// does, except that exponents carry no `+` sign.
fn format_float(f: f64) -> String {
    if f == f.trunc() && f.abs() < MAX_SAFE_INTEGER {
        return format!("{}", f as i64);
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.2345e-7".
    let sci = format!("{:e}", f.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let k = digits.len() as i32;
    let n = exp + 1;
    let sign = if f < 0.0 { "-" } else { "" };

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{int_part}.{frac_part}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{}", n - 1)
        } else {
            format!("{first}.{rest}e{}", n - 1)
        }
    };

    format!("{sign}{body}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    fn canon_str(json: &str) -> String {
        String::from_utf8(canonicalize_json_bytes(json.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn golden_vector() {
        let input = r#"{"foo":"bar","nested":{"b":1,"a":0},"array":[{"z":1,"a":2},3]}"#;
        assert_eq!(
            canon_str(input),
            r#"{"array":[{"a":2,"z":1},3],"foo":"bar","nested":{"a":0,"b":1}}"#
        );
        assert_eq!(
            hash_uri(&serde_json::from_str(input).unwrap()).hex(),
            "6fe977160e4b69b0e706824d01e5653e6364618462844011116323999146cbbd"
        );
    }

    #[test]
    fn strings_numbers_and_key_order() {
        let input = "{\"b\":[1.5,1.0,1e21,1e-7,0.000001,123456789012345680000],\
                     \"a\":\"\u{e9}\\u0001\\n\\\"\",\"A\":null,\"\u{e9}\":true}";
        let expected = "{\"A\":null,\"a\":\"\u{e9}\\u0001\\n\\\"\",\
                        \"b\":[1.5,1,1e21,1e-7,0.000001,123456789012345680000],\"\u{e9}\":true}";
        assert_eq!(canon_str(input), expected);
        assert_eq!(
            hash_bytes(expected.as_bytes()).hex(),
            "9c989a68e7b3725617026433f9f59885f534a1e33815689a642a512664a5c8f9"
        );
    }

    #[test]
    fn whitespace_is_dropped() {
        assert_eq!(canon_str(" { \"a\" : [ 1 , 2 ] ,\n\"b\":{} } "), r#"{"a":[1,2],"b":{}}"#);
    }

    #[test]
    fn control_characters() {
        let value = json!("\u{08}\u{0c}\r\t\u{1f}\\");
        assert_eq!(
            String::from_utf8(canonicalize(&value)).unwrap(),
            r#""\b\f\r\t\u001f\\""#
        );
    }

    #[test]
    fn float_formatting() {
        for (f, expected) in [
            (0.0, "0"),
            (-0.0, "0"),
            (-2.0, "-2"),
            (0.1, "0.1"),
            (-1.25, "-1.25"),
            (123.456, "123.456"),
            (1e20, "100000000000000000000"),
            (1e21, "1e21"),
            (1.5e300, "1.5e300"),
            (1e-6, "0.000001"),
            (1.5e-7, "1.5e-7"),
            (9007199254740993.0, "9007199254740992"),
        ] {
            assert_eq!(format_float(f), expected, "{f}");
        }
    }

    #[test]
    fn deterministic_across_key_order() {
        let a = json!({"x": {"q": 1, "p": [true, null]}, "y": "z"});
        let b: Value = serde_json::from_str(r#"{"y":"z","x":{"p":[true,null],"q":1}}"#).unwrap();
        assert_eq!(canonicalize(&a), canonicalize(&b));
        assert_eq!(hash_uri(&a), hash_uri(&b));
    }

    #[test]
    fn hash_changes_with_content() {
        let a = json!({"actions": [{"action": "c2pa.edited"}]});
        let b = json!({"actions": [{"action": "c2pa.cropped"}]});
        assert_ne!(hash_uri(&a), hash_uri(&b));
    }

    #[test]
    fn empty_input() {
        assert_eq!(
            hash_bytes(b"").to_string(),
            "ni:///sha-256;e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_uri(&json!({})).hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }
}
