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

//! Reconstruction of the provenance graph of a manifest.
//!
//! Lineage is a breadth-first walk over `parentOf` and `renditionOf`
//! ingredients. Ingredient manifests are looked up among the manifests
//! embedded in any store parsed so far, then in a cache scoped to one
//! call, then fetched from the ingredient's `asset_url`. Fetches at one
//! depth run concurrently, bounded by [`LineageOptions::fan_out`], and are
//! merged in manifest hash order so the resulting graph does not depend on
//! network timing.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use c2pa_lineage_status_tracker::{log_item, validation_codes::*, StatusTracker};
use futures::{stream, StreamExt};
use log::{debug, warn};
use serde::Serialize;

use crate::{
    assertions::Relationship,
    http::restricted::HostPattern,
    ingredient::Ingredient,
    manifest::{Manifest, ManifestIdentity},
    reference::{resolve_with_policy, FetchPolicy, ManifestReference},
    resolver::ManifestResolver,
    settings::Settings,
    trust_anchors::TrustAnchors,
    validation_status::ValidationStatus,
    validator::verify_manifest,
    HashedUri, Result,
};

/// Limits of one lineage reconstruction.
#[derive(Clone, Debug)]
pub struct LineageOptions {
    /// Generations followed from the starting manifest.
    pub max_depth: usize,
    /// Concurrent fetches at one depth.
    pub fan_out: usize,
    pub fetch_timeout_ms: u64,
    /// Hosts ingredient `asset_url`s may point at. Empty allows every
    /// public host.
    pub allowed_hosts: Vec<HostPattern>,
    pub max_manifest_size: usize,
}

impl Default for LineageOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl LineageOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_depth: settings.lineage.max_depth,
            fan_out: settings.lineage.fan_out,
            fetch_timeout_ms: settings.lineage.fetch_timeout_ms,
            allowed_hosts: settings.network.allowed_hosts.clone(),
            max_manifest_size: settings.core.max_manifest_size,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            allowed_hosts: self.allowed_hosts.clone(),
            timeout_ms: self.fetch_timeout_ms,
            max_size: self.max_manifest_size,
        }
    }
}

/// A manifest reached by lineage reconstruction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineageNode {
    pub identity: ManifestIdentity,
    /// Generations between this manifest and the starting manifest.
    pub depth: usize,
    /// Validation of this manifest, followed by any lineage codes for
    /// branches that ended here.
    pub validation: ValidationStatus,
}

/// A `parentOf` or `renditionOf` link from a manifest to the manifest it
/// cites.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct LineageEdge {
    pub from: HashedUri,
    pub to: HashedUri,
    pub relationship: Relationship,
    /// Hashed URI of the ingredient assertion that makes the link.
    pub ingredient: HashedUri,
}

/// The provenance graph of a manifest: every manifest reachable from `root`
/// through resolvable ingredients.
///
/// The graph is acyclic. Branches that could not be followed are reported
/// as lineage codes on the node they start from, so the graph may be a
/// partial chain.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineageGraph {
    pub root: HashedUri,
    pub nodes: BTreeMap<HashedUri, LineageNode>,
    pub derivatives: Vec<LineageEdge>,
    pub renditions: Vec<LineageEdge>,
}

impl LineageGraph {
    pub fn node(&self, manifest_hash: &HashedUri) -> Option<&LineageNode> {
        self.nodes.get(manifest_hash)
    }

    pub fn root_node(&self) -> Option<&LineageNode> {
        self.nodes.get(&self.root)
    }

    /// Hashes of every node except the root.
    pub fn ancestors(&self) -> BTreeSet<HashedUri> {
        self.nodes
            .keys()
            .filter(|hash| **hash != self.root)
            .copied()
            .collect()
    }

    /// Edges leaving `manifest_hash`, derivatives first.
    pub fn edges_from<'a>(
        &'a self,
        manifest_hash: &'a HashedUri,
    ) -> impl Iterator<Item = &'a LineageEdge> {
        self.derivatives
            .iter()
            .chain(&self.renditions)
            .filter(move |edge| edge.from == *manifest_hash)
    }

    /// Returns `true` if any node reports `code`.
    pub fn has_code(&self, code: &str) -> bool {
        self.nodes
            .values()
            .any(|node| node.validation.has_code(code))
    }
}

/// Ancestors present in only one of two lineage graphs.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LineageDelta {
    pub only_in_base: Vec<ManifestIdentity>,
    pub only_in_target: Vec<ManifestIdentity>,
}

impl LineageDelta {
    pub fn new(base: &LineageGraph, target: &LineageGraph) -> Self {
        let base_ancestors = base.ancestors();
        let target_ancestors = target.ancestors();

        let only = |graph: &LineageGraph,
                    mine: &BTreeSet<HashedUri>,
                    theirs: &BTreeSet<HashedUri>| {
            mine.difference(theirs)
                .filter_map(|hash| graph.node(hash))
                .map(|node| node.identity.clone())
                .collect()
        };

        Self {
            only_in_base: only(base, &base_ancestors, &target_ancestors),
            only_in_target: only(target, &target_ancestors, &base_ancestors),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.only_in_base.is_empty() && self.only_in_target.is_empty()
    }
}

// A manifest waiting to have its ingredients followed.
struct Visit {
    hash: HashedUri,
    depth: usize,
    path: Vec<HashedUri>,
}

// A lineage code for a branch that could not be followed.
struct Termination {
    code: &'static str,
    url: String,
    description: String,
}

#[derive(Default)]
struct Reconstruction {
    // manifests embedded in any parsed store
    pool: HashMap<HashedUri, Manifest>,
    // fetch outcomes by declared hash
    cache: HashMap<HashedUri, Option<Manifest>>,
    nodes: BTreeMap<HashedUri, (Manifest, usize)>,
    derivatives: Vec<LineageEdge>,
    renditions: Vec<LineageEdge>,
    terminations: HashMap<HashedUri, Vec<Termination>>,
}

impl Reconstruction {
    fn add_to_pool(&mut self, manifest: &Manifest) {
        for embedded in manifest.embedded_manifests() {
            self.pool
                .entry(*embedded.manifest_hash())
                .or_insert_with(|| embedded.clone());
        }
    }

    fn lookup(&self, hash: &HashedUri) -> Option<&Manifest> {
        self.pool
            .get(hash)
            .or_else(|| self.cache.get(hash).and_then(Option::as_ref))
    }

    fn terminate(
        &mut self,
        visit: &Visit,
        manifest: &Manifest,
        ingredient: &Ingredient,
        code: &'static str,
        description: String,
    ) {
        debug!("lineage branch from {} ends: {description}", visit.hash);
        self.terminations
            .entry(visit.hash)
            .or_default()
            .push(Termination {
                code,
                url: manifest.assertion_uri(ingredient.label()),
                description,
            });
    }

    fn add_edge(&mut self, edge: LineageEdge) {
        let edges = match edge.relationship {
            Relationship::RenditionOf => &mut self.renditions,
            _ => &mut self.derivatives,
        };
        if !edges.contains(&edge) {
            edges.push(edge);
        }
    }

    // whether `to` can be reached from `from` over the recorded edges
    fn reaches(&self, from: &HashedUri, to: &HashedUri) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![*from];
        while let Some(hash) = stack.pop() {
            if hash == *to {
                return true;
            }
            if !seen.insert(hash) {
                continue;
            }
            stack.extend(
                self.derivatives
                    .iter()
                    .chain(&self.renditions)
                    .filter(|edge| edge.from == hash)
                    .map(|edge| edge.to),
            );
        }
        false
    }
}

fn followed(ingredient: &Ingredient) -> bool {
    matches!(
        ingredient.relationship(),
        Relationship::ParentOf | Relationship::RenditionOf
    )
}

/// Reconstructs the lineage of `manifest`.
///
/// Every manifest reached is validated against `trust_anchors`, with the
/// ingredient manifests resolved during reconstruction available to the
/// ingredient checks. Fetch failures end their branch with
/// `ingredient.manifestMissing` and never fail the call.
pub async fn build_lineage(
    manifest: &Manifest,
    trust_anchors: &TrustAnchors,
    resolver: &dyn ManifestResolver,
    options: &LineageOptions,
) -> LineageGraph {
    let policy = options.fetch_policy();
    let root = *manifest.manifest_hash();

    let mut state = Reconstruction::default();
    state.add_to_pool(manifest);
    state.nodes.insert(root, (manifest.clone(), 0));

    let mut frontier = vec![Visit {
        hash: root,
        depth: 0,
        path: vec![root],
    }];

    while !frontier.is_empty() {
        frontier.sort_by(|a, b| a.hash.cmp(&b.hash));

        // Branches that need a manifest we do not have yet.
        let mut wanted: BTreeMap<HashedUri, String> = BTreeMap::new();
        for visit in &frontier {
            let Some((manifest, _)) = state.nodes.get(&visit.hash) else {
                continue;
            };
            if visit.depth >= options.max_depth {
                continue;
            }
            for ingredient in manifest.ingredients().iter().filter(|i| followed(i)) {
                let target = ingredient.active_manifest();
                if visit.path.contains(target) || state.lookup(target).is_some() {
                    continue;
                }
                if state.cache.contains_key(target) {
                    continue;
                }
                if let Some(url) = ingredient.asset_url() {
                    wanted.entry(*target).or_insert_with(|| url.to_string());
                }
            }
        }

        if !wanted.is_empty() {
            let fetched: BTreeMap<HashedUri, Option<Manifest>> = stream::iter(wanted)
                .map(|(target, url)| {
                    let policy = &policy;
                    async move {
                        let result = fetch_ingredient(resolver, &url, &target, policy).await;
                        (target, result)
                    }
                })
                .buffer_unordered(options.fan_out.max(1))
                .map(|(target, result)| {
                    let manifest = match result {
                        Ok(manifest) => Some(manifest),
                        Err(err) => {
                            warn!("could not resolve ingredient manifest {target}: {err}");
                            None
                        }
                    };
                    (target, manifest)
                })
                .collect()
                .await;

            for (target, manifest) in fetched {
                if let Some(manifest) = &manifest {
                    state.add_to_pool(manifest);
                }
                state.cache.insert(target, manifest);
            }
        }

        let mut next = Vec::new();
        for visit in &frontier {
            let Some((manifest, _)) = state.nodes.get(&visit.hash) else {
                continue;
            };
            let manifest = manifest.clone();

            for ingredient in manifest.ingredients().iter().filter(|i| followed(i)) {
                let target = *ingredient.active_manifest();

                if visit.path.contains(&target) {
                    state.terminate(
                        visit,
                        &manifest,
                        ingredient,
                        LINEAGE_CYCLE_DETECTED,
                        format!("ingredient manifest {target} is already on this path"),
                    );
                    continue;
                }
                if visit.depth >= options.max_depth {
                    state.terminate(
                        visit,
                        &manifest,
                        ingredient,
                        LINEAGE_DEPTH_EXCEEDED,
                        format!("maximum depth of {} reached", options.max_depth),
                    );
                    continue;
                }

                let Some(ancestor) = state.lookup(&target).cloned() else {
                    state.terminate(
                        visit,
                        &manifest,
                        ingredient,
                        INGREDIENT_MANIFEST_MISSING,
                        format!("ingredient manifest {target} could not be resolved"),
                    );
                    continue;
                };

                // a merge must not close a loop through another branch
                if state.nodes.contains_key(&target) && state.reaches(&target, &visit.hash) {
                    state.terminate(
                        visit,
                        &manifest,
                        ingredient,
                        LINEAGE_CYCLE_DETECTED,
                        format!("ingredient manifest {target} already derives from {}", visit.hash),
                    );
                    continue;
                }

                state.add_edge(LineageEdge {
                    from: visit.hash,
                    to: target,
                    relationship: ingredient.relationship(),
                    ingredient: *ingredient.hashed_uri(),
                });

                // a manifest reached along a second path is merged
                if state.nodes.contains_key(&target) {
                    continue;
                }
                state.nodes.insert(target, (ancestor, visit.depth + 1));

                let mut path = visit.path.clone();
                path.push(target);
                next.push(Visit {
                    hash: target,
                    depth: visit.depth + 1,
                    path,
                });
            }
        }

        frontier = next;
    }

    finish(root, state, trust_anchors)
}

async fn fetch_ingredient(
    resolver: &dyn ManifestResolver,
    url: &str,
    target: &HashedUri,
    policy: &FetchPolicy,
) -> Result<Manifest> {
    let reference = ManifestReference::AssetUrl(url.to_string());
    let manifest = resolve_with_policy(&reference, resolver, policy).await?;

    if manifest.manifest_hash() == target {
        return Ok(manifest);
    }
    manifest
        .embedded_manifests()
        .iter()
        .find(|m| m.manifest_hash() == target)
        .cloned()
        .ok_or_else(|| crate::Error::FetchFailed {
            url: url.to_string(),
            reason: format!("manifest store does not contain {target}"),
        })
}

// Validates every node, with its resolved ingredients as known manifests.
fn finish(
    root: HashedUri,
    mut state: Reconstruction,
    trust_anchors: &TrustAnchors,
) -> LineageGraph {
    let mut nodes = BTreeMap::new();

    for (hash, (manifest, depth)) in &state.nodes {
        let known: Vec<Manifest> = manifest
            .ingredients()
            .iter()
            .filter_map(|i| state.lookup(i.active_manifest()).cloned())
            .collect();

        let mut log = StatusTracker::default();
        verify_manifest(manifest, trust_anchors, &known, &mut log);

        for termination in state.terminations.remove(hash).unwrap_or_default() {
            // validation already reports ingredients it could not find
            let reported = log.logged_items().iter().any(|item| {
                item.label == termination.url
                    && item.validation_status.as_deref() == Some(termination.code)
            });
            if reported {
                continue;
            }
            log_item!(termination.url, termination.description, "build_lineage")
                .validation_status(termination.code)
                .informational(&mut log);
        }

        nodes.insert(
            *hash,
            LineageNode {
                identity: manifest.identity(),
                depth: *depth,
                validation: ValidationStatus::from_tracker(&log),
            },
        );
    }

    debug!(
        "lineage of {root}: {} nodes, {} derivative and {} rendition edges",
        nodes.len(),
        state.derivatives.len(),
        state.renditions.len()
    );

    LineageGraph {
        root,
        nodes,
        derivatives: state.derivatives,
        renditions: state.renditions,
    }
}
