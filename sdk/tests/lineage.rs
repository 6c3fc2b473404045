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

mod common;

use c2pa_lineage::{
    assertions::Relationship,
    diff::DiffFormat,
    evidence::{StepResult, Verdict, STEP_LINEAGE},
    lineage::{build_lineage, LineageOptions},
    parse,
    rendition::{InMemoryRenditionStore, RenditionStore},
    settings::Settings,
    validation_status::*,
    variant::{create_derivative, DerivativeAction, DerivativeActionKind, DerivativeRequest},
    ClaimGeneratorInfo, Engine, ManifestBuilder, ManifestReference, SignedManifest,
};
use common::{es256_signer, pipeline_manifest, trust_anchors, MemoryResolver};

const GRANDPARENT_ASSET: &str = "https://assets.example.com/master.mp4";
const GRANDPARENT_MANIFEST: &str = "https://assets.example.com/manifests/master.c2pa";
const CHILD_MANIFEST: &str = "https://manifests.example.com/child.c2pa";

fn edit_request() -> DerivativeRequest {
    DerivativeRequest {
        manifest_url: CHILD_MANIFEST.into(),
        parent_asset_url: Some("https://assets.example.com/cut.mp4".into()),
        actions: vec![DerivativeAction::new(DerivativeActionKind::Edit)],
        claim_generator: Some(ClaimGeneratorInfo::new("c2c-editor")),
    }
}

/// A grandparent published behind a `Link` header, a parent citing it
/// remotely, and a derivative of the parent.
fn three_generations() -> (SignedManifest, SignedManifest, SignedManifest) {
    let grandparent = pipeline_manifest(es256_signer().as_ref());

    let mut builder = ManifestBuilder::new(ClaimGeneratorInfo::new("c2c-transcoder"));
    builder
        .add_remote_ingredient(
            &grandparent.manifest,
            Relationship::ParentOf,
            GRANDPARENT_ASSET,
        )
        .unwrap();
    let parent = builder.sign(es256_signer().as_ref(), None).unwrap();

    let derivative = create_derivative(
        &parent.manifest,
        &edit_request(),
        es256_signer().as_ref(),
        &trust_anchors(),
    )
    .unwrap();
    let child = SignedManifest {
        manifest: derivative.child_manifest,
        bytes: derivative.child_bytes,
    };

    (grandparent, parent, child)
}

fn publishing(grandparent: &SignedManifest, child: &SignedManifest) -> MemoryResolver {
    MemoryResolver::default()
        .serve_with_link(GRANDPARENT_ASSET, "manifests/master.c2pa", b"not a manifest")
        .serve(GRANDPARENT_MANIFEST, &grandparent.bytes)
        .serve(CHILD_MANIFEST, &child.bytes)
}

fn engine(resolver: MemoryResolver) -> Engine<MemoryResolver> {
    Engine::with_resolver(Settings::default(), trust_anchors(), resolver)
}

#[tokio::test]
async fn derivative_resolves_its_parent() {
    let parent = pipeline_manifest(es256_signer().as_ref());
    let derivative = create_derivative(
        &parent.manifest,
        &edit_request(),
        es256_signer().as_ref(),
        &trust_anchors(),
    )
    .unwrap();

    assert_eq!(
        derivative.discovery_link,
        format!("<{CHILD_MANIFEST}>; rel=\"c2pa-manifest\"")
    );

    let child = parse(&derivative.child_bytes).unwrap();
    assert_eq!(child.ingredients().len(), 1);
    assert_eq!(child.ingredients()[0].relationship(), Relationship::ParentOf);

    let graph = build_lineage(
        &child,
        &trust_anchors(),
        &MemoryResolver::default(),
        &LineageOptions::default(),
    )
    .await;

    let ancestors = graph.ancestors();
    assert_eq!(ancestors.len(), 1);
    assert!(ancestors.contains(parent.manifest.manifest_hash()));
    assert!(graph.root_node().unwrap().validation.valid());
}

#[tokio::test]
async fn lineage_follows_manifest_links() {
    let (grandparent, parent, child) = three_generations();
    let engine = engine(publishing(&grandparent, &child));

    let report = engine
        .lineage(&ManifestReference::ManifestUrl(CHILD_MANIFEST.into()), None)
        .await
        .unwrap();

    assert_eq!(report.identity.manifest_hash, *child.manifest.manifest_hash());
    assert_eq!(report.graph.nodes.len(), 3);
    assert_eq!(report.graph.derivatives.len(), 2);
    assert!(report.validation.has_code(INGREDIENT_CLAIM_SIGNATURE_MATCH));

    let node = report.graph.node(grandparent.manifest.manifest_hash()).unwrap();
    assert_eq!(node.depth, 2);
    assert!(node.validation.valid());

    let edge = report
        .graph
        .edges_from(parent.manifest.manifest_hash())
        .next()
        .unwrap();
    assert_eq!(edge.to, *grandparent.manifest.manifest_hash());
    assert_eq!(edge.relationship, Relationship::ParentOf);

    // a shallower walk stops at the parent
    let report = engine
        .lineage(&ManifestReference::ManifestUrl(CHILD_MANIFEST.into()), Some(1))
        .await
        .unwrap();
    assert_eq!(report.graph.nodes.len(), 2);
    let parent_node = report.graph.node(parent.manifest.manifest_hash()).unwrap();
    assert!(parent_node.validation.has_code(LINEAGE_DEPTH_EXCEEDED));
}

#[tokio::test]
async fn evidence_verdicts() {
    let (grandparent, _, child) = three_generations();
    let base = ManifestReference::Inline(grandparent.bytes.clone());
    let target = ManifestReference::SidecarUrl(CHILD_MANIFEST.into());

    let bundle = engine(publishing(&grandparent, &child))
        .evidence(&base, &target)
        .await
        .unwrap();
    assert_eq!(bundle.verdict, Verdict::Verified);
    assert_eq!(bundle.exit_code, 0);
    assert_eq!(bundle.lineage.ancestors().len(), 2);
    assert!(bundle.transcript.iter().all(|e| e.result == StepResult::Pass));
    assert!(bundle.transcript.iter().any(|e| e.step == STEP_LINEAGE));
    assert_eq!(bundle.semantic_diff.ingredients.added.len(), 1);

    // without the grandparent's manifest the chain cannot be resolved
    let resolver = MemoryResolver::default().serve(CHILD_MANIFEST, &child.bytes);
    let bundle = engine(resolver).evidence(&base, &target).await.unwrap();
    assert_eq!(bundle.verdict, Verdict::Unresolved);
    assert_eq!(bundle.exit_code, 4);
    assert!(bundle.lineage.has_code(INGREDIENT_MANIFEST_MISSING));

    let json = serde_json::to_value(&bundle).unwrap();
    assert_eq!(json["verdict"], "Unresolved");
    assert!(json["transcript"][0]["spec_reference"].is_string());
}

#[tokio::test]
async fn diff_reports_lineage_delta() {
    let (grandparent, parent, child) = three_generations();
    let engine = engine(publishing(&grandparent, &child));

    let report = engine
        .diff(
            &ManifestReference::Inline(parent.bytes.clone()),
            &ManifestReference::ManifestUrl(CHILD_MANIFEST.into()),
            &[DiffFormat::Semantic, DiffFormat::Lineage],
        )
        .await
        .unwrap();

    assert!(report.diff.json_patch.is_none());
    let delta = report.diff.lineage.unwrap();
    assert!(delta.only_in_base.is_empty());
    assert_eq!(delta.only_in_target.len(), 1);
    assert_eq!(
        delta.only_in_target[0].manifest_hash,
        *parent.manifest.manifest_hash()
    );
}

#[test]
fn renditions_route_to_manifests() {
    let engine = engine(MemoryResolver::default());
    let mut store = InMemoryRenditionStore::new();

    let count = engine
        .register_rendition(
            &mut store,
            "asset-42",
            CHILD_MANIFEST,
            &[
                "https://cdn.example.com/asset-42/*",
                "https://cdn.example.com/asset-42/1080p/*",
            ],
        )
        .unwrap();
    assert_eq!(count, 2);

    let route = store
        .resolve("https://cdn.example.com/asset-42/1080p/seg-1.m4s")
        .unwrap();
    assert_eq!(route.pattern.as_str(), "https://cdn.example.com/asset-42/1080p/*");
    assert_eq!(route.manifest_url, CHILD_MANIFEST);
    assert!(store.resolve("https://cdn.example.com/asset-7/a.m4s").is_none());
    assert_eq!(store.routes_for("asset-42").len(), 2);

    let err = engine
        .register_rendition(&mut store, "asset-42", "http://10.0.0.1/m.c2pa", &["https://cdn.example.com/*"])
        .unwrap_err();
    assert_eq!(err.code(), c2pa_lineage::error::URL_DISALLOWED);
}
