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

//! The engine facade: manifest operations over manifest references.

use c2pa_lineage_crypto::raw_signature::RawSigner;
use futures::try_join;
use log::info;
use serde::Serialize;

use crate::{
    diff::{self, DiffFormat, DiffOptions, DiffResult},
    evidence::{self, EvidenceBundle},
    http::AsyncGenericResolver,
    lineage::{build_lineage, LineageDelta, LineageGraph, LineageOptions},
    manifest::{Manifest, ManifestIdentity},
    reference::{resolve_reference, ManifestReference},
    rendition::{register_rendition_with_hosts, RenditionStore},
    resolver::{HttpManifestResolver, ManifestResolver},
    settings::Settings,
    trust_anchors::TrustAnchors,
    validation_status::ValidationStatus,
    validator::validate,
    variant::{create_derivative, Derivative, DerivativeRequest},
    ClaimGeneratorInfo, Result,
};

/// Validation of both sides of a diff.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiffValidation {
    pub base: ValidationStatus,
    pub target: ValidationStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiffReport {
    #[serde(flatten)]
    pub diff: DiffResult,
    pub validation: DiffValidation,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineageReport {
    pub graph: LineageGraph,
    /// Validation of the starting manifest, with its resolved ingredients.
    pub validation: ValidationStatus,
    pub identity: ManifestIdentity,
}

/// Runs manifest operations with one configuration, trust anchor set and
/// resolver.
///
/// Every operation is request-scoped: the engine keeps no state between
/// calls.
pub struct Engine<R = HttpManifestResolver<AsyncGenericResolver>> {
    settings: Settings,
    trust_anchors: TrustAnchors,
    resolver: R,
}

impl Engine {
    /// Creates an engine fetching over HTTP, with trust anchors loaded from
    /// `settings`.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let trust_anchors = TrustAnchors::from_settings(&settings.trust)?;
        let resolver = HttpManifestResolver::from_settings(AsyncGenericResolver::new(), &settings);
        Ok(Self::with_resolver(settings, trust_anchors, resolver))
    }
}

impl<R: ManifestResolver> Engine<R> {
    pub fn with_resolver(settings: Settings, trust_anchors: TrustAnchors, resolver: R) -> Self {
        Self {
            settings,
            trust_anchors,
            resolver,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn trust_anchors(&self) -> &TrustAnchors {
        &self.trust_anchors
    }

    /// Resolves a reference to its active manifest.
    pub async fn resolve(&self, reference: &ManifestReference) -> Result<Manifest> {
        resolve_reference(reference, &self.resolver, &self.settings).await
    }

    /// Resolves and validates both references and computes the requested
    /// formats of their diff.
    pub async fn diff(
        &self,
        base: &ManifestReference,
        target: &ManifestReference,
        formats: &[DiffFormat],
    ) -> Result<DiffReport> {
        let (base, target) = try_join!(self.resolve(base), self.resolve(target))?;

        let options = DiffOptions::from_settings(&self.settings);
        let mut result = diff::diff(&base, &target, formats, &options);

        if formats.contains(&DiffFormat::Lineage) {
            let (base_graph, target_graph) =
                futures::join!(self.lineage_of(&base, None), self.lineage_of(&target, None));
            result.lineage = Some(LineageDelta::new(&base_graph, &target_graph));
        }

        Ok(DiffReport {
            diff: result,
            validation: DiffValidation {
                base: validate(&base, &self.trust_anchors),
                target: validate(&target, &self.trust_anchors),
            },
        })
    }

    /// Reconstructs the lineage of the referenced manifest.
    ///
    /// `max_depth` overrides the configured depth limit.
    pub async fn lineage(
        &self,
        reference: &ManifestReference,
        max_depth: Option<usize>,
    ) -> Result<LineageReport> {
        let manifest = self.resolve(reference).await?;
        let graph = self.lineage_of(&manifest, max_depth).await;

        let validation = graph
            .root_node()
            .map(|node| node.validation.clone())
            .unwrap_or_else(|| validate(&manifest, &self.trust_anchors));

        Ok(LineageReport {
            graph,
            validation,
            identity: manifest.identity(),
        })
    }

    /// Exports the decoded manifests, their semantic diff, the target's
    /// lineage and a verification transcript with its verdict.
    pub async fn evidence(
        &self,
        base: &ManifestReference,
        target: &ManifestReference,
    ) -> Result<EvidenceBundle> {
        let (base, target) = try_join!(self.resolve(base), self.resolve(target))?;

        let semantic_diff = diff::diff(
            &base,
            &target,
            &[DiffFormat::Semantic],
            &DiffOptions::from_settings(&self.settings),
        )
        .semantic
        .unwrap_or_default();

        let lineage = self.lineage_of(&target, None).await;
        let base_status = validate(&base, &self.trust_anchors);
        let target_status = lineage
            .root_node()
            .map(|node| node.validation.clone())
            .unwrap_or_else(|| validate(&target, &self.trust_anchors));

        let transcript = evidence::transcript(&base_status, &target_status, &lineage);
        let verdict = evidence::verdict(&transcript);
        info!(
            "evidence for {} against {}: {verdict}",
            target.manifest_hash(),
            base.manifest_hash()
        );

        Ok(EvidenceBundle {
            base,
            target,
            semantic_diff,
            lineage,
            transcript,
            verdict,
            exit_code: verdict.exit_code(),
        })
    }

    /// Creates a derivative of the referenced parent, signed by `signer`.
    ///
    /// Without a claim generator in the request, the configured one is used.
    pub async fn create_derivative(
        &self,
        parent: &ManifestReference,
        request: &DerivativeRequest,
        signer: &dyn RawSigner,
    ) -> Result<Derivative> {
        let parent = self.resolve(parent).await?;

        let mut request = request.clone();
        if request.claim_generator.is_none() {
            let mut info = ClaimGeneratorInfo::new(self.settings.core.claim_generator.clone());
            info.set_version(env!("CARGO_PKG_VERSION"));
            request.claim_generator = Some(info);
        }

        create_derivative(&parent, &request, signer, &self.trust_anchors)
    }

    /// Registers rendition routes, checking the manifest URL against the
    /// configured network boundary.
    pub fn register_rendition(
        &self,
        store: &mut dyn RenditionStore,
        asset_id: &str,
        manifest_url: &str,
        routes: &[&str],
    ) -> Result<usize> {
        register_rendition_with_hosts(
            store,
            asset_id,
            manifest_url,
            routes,
            &self.settings.network.allowed_hosts,
        )
    }

    async fn lineage_of(&self, manifest: &Manifest, max_depth: Option<usize>) -> LineageGraph {
        let mut options = LineageOptions::from_settings(&self.settings);
        if let Some(max_depth) = max_depth {
            options = options.with_max_depth(max_depth);
        }
        build_lineage(manifest, &self.trust_anchors, &self.resolver, &options).await
    }
}

#[cfg(test)]
pub mod tests {
    #![allow(clippy::unwrap_used)]

    use c2pa_lineage_status_tracker::validation_codes::*;
    use serde_json::json;

    use super::*;
    use crate::{
        evidence::Verdict,
        rendition::InMemoryRenditionStore,
        resolver::tests::StaticHttp,
        utils::test::{derived_manifest, es256_signer, expired_signer, sample_manifest, sample_manifest_signed_by, test_trust_anchors},
        variant::{DerivativeAction, DerivativeActionKind},
    };

    fn engine(http: StaticHttp) -> Engine<HttpManifestResolver<StaticHttp>> {
        let settings = Settings::default();
        let resolver = HttpManifestResolver::from_settings(http, &settings);
        Engine::with_resolver(settings, test_trust_anchors(), resolver)
    }

    #[tokio::test]
    async fn diff_report() {
        let (parent, child) = derived_manifest();
        let engine = engine(
            StaticHttp::default().serve("https://cdn.example.com/child.c2pa", &child.bytes),
        );

        let report = engine
            .diff(
                &ManifestReference::Inline(parent.bytes.clone()),
                &ManifestReference::SidecarUrl("https://cdn.example.com/child.c2pa".into()),
                &DiffFormat::ALL,
            )
            .await
            .unwrap();

        assert!(report.validation.base.valid());
        assert!(report.validation.target.valid());
        let semantic = report.diff.semantic.as_ref().unwrap();
        assert_eq!(semantic.ingredients.added.len(), 1);
        assert!(!report.diff.json_patch.as_ref().unwrap().is_empty());

        let lineage = report.diff.lineage.as_ref().unwrap();
        assert!(lineage.only_in_base.is_empty());
        assert_eq!(
            lineage.only_in_target[0].manifest_hash,
            *parent.manifest.manifest_hash()
        );

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("semantic").is_some());
        assert!(value["validation"]["target"]["valid"].as_bool().unwrap());
    }

    #[tokio::test]
    async fn unreachable_reference_is_an_error() {
        let engine = engine(StaticHttp::default());
        let err = engine
            .diff(
                &ManifestReference::Inline(sample_manifest().bytes),
                &ManifestReference::ManifestUrl("https://cdn.example.com/missing.c2pa".into()),
                &[DiffFormat::Semantic],
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), crate::error::FETCH_FAILED);
    }

    #[tokio::test]
    async fn lineage_report() {
        let (parent, child) = derived_manifest();
        let engine = engine(StaticHttp::default());

        let report = engine
            .lineage(&ManifestReference::Inline(child.bytes.clone()), None)
            .await
            .unwrap();
        assert_eq!(report.identity, child.manifest.identity());
        assert_eq!(report.graph.nodes.len(), 2);
        assert!(report.validation.has_code(INGREDIENT_CLAIM_SIGNATURE_MATCH));

        let report = engine
            .lineage(&ManifestReference::Inline(child.bytes.clone()), Some(0))
            .await
            .unwrap();
        assert_eq!(report.graph.nodes.len(), 1);
        assert!(report.validation.has_code(LINEAGE_DEPTH_EXCEEDED));
        assert!(report.graph.node(parent.manifest.manifest_hash()).is_none());
    }

    #[tokio::test]
    async fn evidence_verdicts() {
        let (parent, child) = derived_manifest();
        let engine = engine(StaticHttp::default());

        let bundle = engine
            .evidence(
                &ManifestReference::Inline(parent.bytes.clone()),
                &ManifestReference::Inline(child.bytes.clone()),
            )
            .await
            .unwrap();
        assert_eq!(bundle.verdict, Verdict::Verified, "{:?}", bundle.transcript);
        assert_eq!(bundle.exit_code, 0);
        assert_eq!(bundle.base, parent.manifest);
        assert_eq!(bundle.semantic_diff.ingredients.added.len(), 1);
        assert!(bundle.transcript.iter().any(|e| e.step == "lineage"));

        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(value["verdict"], json!("Verified"));
        assert_eq!(value["transcript"][0]["result"], json!("pass"));

        let expired = sample_manifest_signed_by(expired_signer().as_ref());
        let bundle = engine
            .evidence(
                &ManifestReference::Inline(parent.bytes.clone()),
                &ManifestReference::Inline(expired.bytes.clone()),
            )
            .await
            .unwrap();
        assert_eq!(bundle.verdict, Verdict::Unverified);
        assert_eq!(bundle.exit_code, 3);
    }

    #[tokio::test]
    async fn derivative_through_engine() {
        let parent = sample_manifest();
        let engine = engine(
            StaticHttp::default().serve("https://cdn.example.com/parent.c2pa", &parent.bytes),
        );
        let request = DerivativeRequest {
            manifest_url: "https://manifests.example.com/child.c2pa".into(),
            parent_asset_url: Some("https://cdn.example.com/parent.c2pa".into()),
            actions: vec![DerivativeAction::new(DerivativeActionKind::Transcode)],
            claim_generator: None,
        };

        let derivative = engine
            .create_derivative(
                &ManifestReference::ManifestUrl("https://cdn.example.com/parent.c2pa".into()),
                &request,
                es256_signer().as_ref(),
            )
            .await
            .unwrap();

        let generator = derivative.child_manifest.claim_generator().unwrap();
        assert_eq!(generator.name, engine.settings().core.claim_generator);
        assert_eq!(
            derivative.child_manifest.ingredients()[0].active_manifest(),
            parent.manifest.manifest_hash()
        );
    }

    #[test]
    fn renditions_use_the_configured_boundary() {
        let settings = Settings::new()
            .with_json(r#"{"network": {"allowed_hosts": ["*.example.com"]}}"#)
            .unwrap();
        let resolver = HttpManifestResolver::from_settings(StaticHttp::default(), &settings);
        let engine = Engine::with_resolver(settings, test_trust_anchors(), resolver);
        let mut store = InMemoryRenditionStore::new();

        let count = engine
            .register_rendition(
                &mut store,
                "asset-1",
                "https://manifests.example.com/asset-1.c2pa",
                &["https://cdn.example.com/asset-1/*"],
            )
            .unwrap();
        assert_eq!(count, 1);

        let err = engine
            .register_rendition(
                &mut store,
                "asset-1",
                "https://manifests.example.org/asset-1.c2pa",
                &["https://cdn.example.com/asset-1/*"],
            )
            .unwrap_err();
        assert_eq!(err.code(), crate::error::URL_DISALLOWED);
    }
}
