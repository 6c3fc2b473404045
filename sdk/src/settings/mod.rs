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

//! Settings for trust, lineage reconstruction, the network boundary, diffs
//! and manifest construction.
//!
//! Settings are plain values owned by the caller; nothing here is global.
//! They load from TOML or JSON through the [`config`] crate, overlaying the
//! defaults, and are validated before use.

use std::path::Path;

use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{http::restricted::HostPattern, Error, Result};

const VERSION: u32 = 1;

/// Default maximum size of a manifest store, in bytes.
pub const DEFAULT_MAX_MANIFEST_SIZE: usize = 16 * 1024 * 1024;

// trait used to validate user input to make sure user supplied configurations are valid
pub(crate) trait SettingsValidate {
    // returns error if settings are invalid
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Settings to configure the trust lists.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Trust {
    /// Trust anchor root certificates for claim signers, as a PEM bundle.
    pub trust_anchors: Option<String>,
    /// Trust anchor root certificates for time-stamp authorities, as a PEM
    /// bundle.
    pub tsa_trust_anchors: Option<String>,
    /// Explicitly allowed end-entity certificates, as a PEM bundle or as
    /// base64 SHA-256 hashes of the DER certificates, one per line.
    pub allowed_list: Option<String>,
    /// Revoked certificates, as base64 SHA-256 hashes of the DER
    /// certificates (one per line) or as a PEM bundle.
    pub revoked: Option<String>,
    /// Additional extended key usage (EKU) OIDs accepted for claim signers,
    /// one per line.
    pub trust_config: Option<String>,
}

impl Trust {
    // load PEMs
    fn load_trust_from_data(trust_data: &[u8]) -> Result<Vec<Vec<u8>>> {
        let mut certs = Vec::new();

        // allow for JSON-encoded PEMs with \n
        let trust_data = String::from_utf8_lossy(trust_data)
            .replace("\\n", "\n")
            .into_bytes();
        for pem_result in x509_parser::pem::Pem::iter_from_buffer(&trust_data) {
            let pem = pem_result
                .map_err(|e| Error::InvalidSettings(format!("invalid PEM certificate: {e}")))?;
            certs.push(pem.contents);
        }
        Ok(certs)
    }

    // a bundle of certificates, or lines of base64 certificate hashes
    fn test_load_hashes(field: &str, data: &str) -> Result<()> {
        if let Ok(certs) = Self::load_trust_from_data(data.as_bytes()) {
            if !certs.is_empty() {
                return Ok(());
            }
        }

        let mut found_der_hash = false;
        for line in data.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if crate::utils::base64::decode(line).is_err() {
                return Err(Error::InvalidSettings(format!(
                    "trust.{field}: {line:?} is neither a PEM certificate nor a base64 hash"
                )));
            }
            found_der_hash = true;
        }

        if found_der_hash {
            Ok(())
        } else {
            Err(Error::InvalidSettings(format!(
                "trust.{field} contains no certificates"
            )))
        }
    }

    fn test_load_anchors(field: &str, data: &str) -> Result<()> {
        let certs = Self::load_trust_from_data(data.as_bytes())?;
        if certs.is_empty() {
            return Err(Error::InvalidSettings(format!(
                "trust.{field} contains no certificates"
            )));
        }
        Ok(())
    }
}

impl SettingsValidate for Trust {
    fn validate(&self) -> Result<()> {
        if let Some(ta) = &self.trust_anchors {
            Self::test_load_anchors("trust_anchors", ta)?;
        }

        if let Some(tsa) = &self.tsa_trust_anchors {
            Self::test_load_anchors("tsa_trust_anchors", tsa)?;
        }

        if let Some(al) = &self.allowed_list {
            Self::test_load_hashes("allowed_list", al)?;
        }

        if let Some(revoked) = &self.revoked {
            Self::test_load_hashes("revoked", revoked)?;
        }

        Ok(())
    }
}

/// Settings to configure lineage reconstruction.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Lineage {
    /// Number of generations followed from the starting manifest.
    ///
    /// The default value is 10.
    pub max_depth: usize,
    /// Number of ingredient manifests fetched concurrently at one depth.
    ///
    /// The default value is 4.
    pub fan_out: usize,
    /// Timeout for one remote fetch, in milliseconds.
    ///
    /// The default value is 10000.
    pub fetch_timeout_ms: u64,
}

impl Default for Lineage {
    fn default() -> Self {
        Self {
            max_depth: 10,
            fan_out: 4,
            fetch_timeout_ms: 10_000,
        }
    }
}

impl SettingsValidate for Lineage {
    fn validate(&self) -> Result<()> {
        if self.fan_out == 0 {
            return Err(Error::InvalidSettings(
                "lineage.fan_out must be at least 1".into(),
            ));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(Error::InvalidSettings(
                "lineage.fetch_timeout_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Settings to configure the network boundary.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Network {
    /// Host patterns remote URLs must match, such as `*.example.com` or
    /// `https://cdn.example.com`. An empty list allows every public host.
    pub allowed_hosts: Vec<HostPattern>,
}

impl SettingsValidate for Network {}

/// Settings to configure manifest diffs.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Diff {
    /// Whether a change of claim generator is reported.
    ///
    /// The default value is false.
    pub compare_generator: bool,
}

impl SettingsValidate for Diff {}

/// Settings to configure core features.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Core {
    /// Largest manifest store accepted by the parser, in bytes.
    ///
    /// The default value is 16 MiB.
    pub max_manifest_size: usize,
    /// Claim generator name recorded in manifests built by this crate.
    pub claim_generator: String,
}

impl Default for Core {
    fn default() -> Self {
        Self {
            max_manifest_size: DEFAULT_MAX_MANIFEST_SIZE,
            claim_generator: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

impl SettingsValidate for Core {
    fn validate(&self) -> Result<()> {
        if self.max_manifest_size == 0 {
            return Err(Error::InvalidSettings(
                "core.max_manifest_size must be at least 1".into(),
            ));
        }
        if self.claim_generator.trim().is_empty() {
            return Err(Error::InvalidSettings(
                "core.claim_generator must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Settings for configuring all aspects of c2pa-lineage.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Version of the configuration.
    pub version: u32,
    /// Settings for configuring the trust lists.
    pub trust: Trust,
    /// Settings for configuring lineage reconstruction.
    pub lineage: Lineage,
    /// Settings for configuring the network boundary.
    pub network: Network,
    /// Settings for configuring diffs.
    pub diff: Diff,
    /// Settings for configuring core features.
    pub core: Core,
}

impl Settings {
    /// Creates default settings.
    ///
    /// This is the starting point for the builder pattern. Use with
    /// `.with_json()`, `.with_toml()`, or `.with_value()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use c2pa_lineage::settings::Settings;
    /// # fn main() -> c2pa_lineage::Result<()> {
    /// let settings = Settings::new().with_json(r#"{"lineage": {"max_depth": 3}}"#)?;
    /// assert_eq!(settings.lineage.max_depth, 3);
    /// assert_eq!(settings.lineage.fan_out, 4);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays a JSON configuration on top of these settings.
    pub fn with_json(self, json: &str) -> Result<Self> {
        self.with_string(json, "json")
    }

    /// Overlays a TOML configuration on top of these settings.
    ///
    /// # Examples
    ///
    /// ```
    /// # use c2pa_lineage::settings::Settings;
    /// # fn main() -> c2pa_lineage::Result<()> {
    /// let settings = Settings::new().with_toml(
    ///     r#"
    ///         [network]
    ///         allowed_hosts = ["*.example.com"]
    ///
    ///         [diff]
    ///         compare_generator = true
    ///     "#,
    /// )?;
    /// assert!(settings.diff.compare_generator);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_toml(self, toml: &str) -> Result<Self> {
        self.with_string(toml, "toml")
    }

    /// Overlays a configuration file on top of these settings.
    ///
    /// The file format (JSON or TOML) is inferred from the file extension.
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("toml"))
            .ok_or_else(|| {
                Error::InvalidSettings("settings file must have json or toml extension".into())
            })?;
        let setting_buf = std::fs::read(path)?;
        self.with_string(&String::from_utf8_lossy(&setting_buf), ext)
    }

    fn with_string(self, settings_str: &str, format: &str) -> Result<Self> {
        let f = match format.to_lowercase().as_str() {
            "json" => FileFormat::Json,
            "toml" => FileFormat::Toml,
            _ => {
                return Err(Error::InvalidSettings(format!(
                    "unsupported settings format {format:?}"
                )))
            }
        };

        let current_config =
            Config::try_from(&self).map_err(|e| Error::InvalidSettings(e.to_string()))?;

        // merge overrides, allows for partial changes
        let updated_config = Config::builder()
            .add_source(current_config)
            .add_source(config::File::from_str(settings_str, f))
            .build()
            .map_err(|e| Error::InvalidSettings(format!("could not parse configuration: {e}")))?;

        let settings = updated_config
            .try_deserialize::<Settings>()
            .map_err(|e| Error::InvalidSettings(e.to_string()))?;

        settings.validate()?;

        Ok(settings)
    }

    /// Sets a single value, addressed with dot notation such as
    /// `lineage.max_depth`.
    pub fn with_value<T: Into<config::Value>>(self, path: &str, value: T) -> Result<Self> {
        let config = Config::try_from(&self).map_err(|e| Error::InvalidSettings(e.to_string()))?;

        let updated_config = Config::builder()
            .add_source(config)
            .set_override(path, value)
            .map_err(|e| Error::InvalidSettings(format!("cannot set '{path}': {e}")))?
            .build()
            .map_err(|e| Error::InvalidSettings(e.to_string()))?;

        let settings = updated_config
            .try_deserialize::<Settings>()
            .map_err(|e| Error::InvalidSettings(e.to_string()))?;

        settings.validate()?;

        Ok(settings)
    }

    /// Reads a single value, addressed with dot notation.
    pub fn get_value<'de, T: serde::de::Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let config = Config::try_from(self).map_err(|e| Error::InvalidSettings(e.to_string()))?;

        config
            .get::<T>(path)
            .map_err(|e| Error::InvalidSettings(format!("failed to get value at '{path}': {e}")))
    }

    /// Serializes these settings into a pretty (formatted) TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::InvalidSettings(e.to_string()))
    }

    /// Checks that every section is consistent.
    pub fn validate(&self) -> Result<()> {
        SettingsValidate::validate(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: VERSION,
            trust: Default::default(),
            lineage: Default::default(),
            network: Default::default(),
            diff: Default::default(),
            core: Default::default(),
        }
    }
}

impl SettingsValidate for Settings {
    fn validate(&self) -> Result<()> {
        if self.version > VERSION {
            return Err(Error::InvalidSettings("settings version too new".into()));
        }
        self.trust.validate()?;
        self.lineage.validate()?;
        self.network.validate()?;
        self.diff.validate()?;
        self.core.validate()
    }
}
