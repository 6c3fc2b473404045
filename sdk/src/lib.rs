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

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]

//! This library verifies, diffs and traces the lineage of C2PA manifests.
//!
//! A manifest store is decoded with [`parse`], validated against a set of
//! [`TrustAnchors`] with [`validate`], compared with another manifest with
//! [`diff::diff`] and followed through its ingredients with
//! [`lineage::build_lineage`]. The [`Engine`] runs the same operations over
//! [`ManifestReference`]s, fetching remote manifests through a
//! [`ManifestResolver`](resolver::ManifestResolver) restricted to the
//! configured network boundary.
//!
//! # Example: Validating a manifest store
//!
//! ```no_run
//! use c2pa_lineage::{parse, validate, TrustAnchors};
//!
//! # fn main() -> c2pa_lineage::Result<()> {
//! let manifest = parse(&std::fs::read("video.c2pa")?)?;
//! let anchors = TrustAnchors::from_pem(&std::fs::read("anchors.pem")?)?;
//!
//! let status = validate(&manifest, &anchors);
//! for code in status.codes() {
//!     println!("{} {}", code.code(), code.url().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Creating a derivative
//!
//! ```no_run
//! use c2pa_lineage::{
//!     create_signer,
//!     variant::{create_derivative, DerivativeAction, DerivativeActionKind, DerivativeRequest},
//!     parse, SigningAlg, TrustAnchors,
//! };
//!
//! # fn main() -> c2pa_lineage::Result<()> {
//! let parent = parse(&std::fs::read("parent.c2pa")?)?;
//! let anchors = TrustAnchors::from_pem(&std::fs::read("anchors.pem")?)?;
//! let signer = create_signer::from_files("es256.pub", "es256.priv", SigningAlg::Es256)?;
//!
//! let request = DerivativeRequest {
//!     manifest_url: "https://manifests.example.com/child.c2pa".into(),
//!     actions: vec![DerivativeAction::new(DerivativeActionKind::Transcode)],
//!     ..Default::default()
//! };
//! let derivative = create_derivative(&parent, &request, signer.as_ref(), &anchors)?;
//! std::fs::write("child.c2pa", &derivative.child_bytes)?;
//! println!("Link: {}", derivative.discovery_link);
//! # Ok(())
//! # }
//! ```

pub use assertion::{
    Assertion, AssertionBase, AssertionCbor, AssertionData, AssertionJson, ContentKind,
};
pub mod assertions;

mod builder;
pub use builder::{ManifestBuilder, SignedManifest};

pub mod canonical;

mod claim;
pub use claim::{AssertionReference, Claim};

mod claim_generator_info;
pub use claim_generator_info::ClaimGeneratorInfo;

mod claim_signature;
pub use claim_signature::ClaimSignature;

pub mod create_signer;
pub mod diff;

mod engine;
pub use engine::{DiffReport, DiffValidation, Engine, LineageReport};

pub mod error;
pub use error::{Error, Result};

pub mod evidence;

mod hashed_uri;
pub use hashed_uri::HashedUri;

pub mod http;

mod ingredient;
pub use ingredient::Ingredient;

pub mod jumbf;
pub mod lineage;

mod manifest;
pub use manifest::{Manifest, ManifestIdentity};

mod parser;
pub use parser::{parse, parse_store, parse_store_with_limit, parse_with_limit, ManifestStore};

mod reference;
pub use reference::{resolve_reference, ManifestReference};

pub mod rendition;
pub mod resolver;
pub mod settings;

mod trust_anchors;
pub use trust_anchors::TrustAnchors;

pub mod validation_status;
pub use validation_status::{ValidationCode, ValidationStatus};

mod validator;
pub use validator::{validate, validate_with_known};

pub mod variant;

pub use c2pa_lineage_crypto::{
    raw_signature::{RawSigner, SigningAlg},
    time_stamp::{CoseTimeStampAuthority, TimeStampProvider},
};

/// crate private declarations
pub(crate) mod assertion;
pub(crate) mod utils;

/// The internal name of this crate
pub const NAME: &str = "c2pa-lineage";
/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
