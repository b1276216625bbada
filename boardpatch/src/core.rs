//! Core synthesis logic shared by library users and the CLI.
//! No storage or transport dependencies.

use tracing::{debug, warn};

use crate::cache::{CacheKey, SuggestionCache};
use crate::geometry::{analyze_net, unconnected_nets, GeometryIndex, GeometrySnapshot, Net};
use crate::obstacles::ObstacleSet;
use crate::patch::{Patch, PatchError, PatchSynthesizer};
use crate::placement::{PlacementOptimizer, DEFAULT_MIN_SPACING_MM};
use crate::router::{Router, DEFAULT_NODE_CAP, DEFAULT_RESOLUTION_MM};
use crate::store::StoreError;

/// Cap on unconnected nets routed in one pass, bounding cost on large
/// boards.
pub const DEFAULT_MAX_NETS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("patch error: {0}")]
    Patch(#[from] PatchError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Other(String),
}

/// Options for one synthesis run (CLI or library).
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Grid resolution for pathfinding (mm).
    pub resolution: f64,
    /// Minimum footprint center-to-center spacing (mm).
    pub min_spacing: f64,
    /// Cap on unconnected nets routed per pass.
    pub max_nets: usize,
    /// Explored-node cap per path search.
    pub node_cap: usize,
    /// Emit patches for degraded (obstacle-ignoring) routes instead of
    /// dropping them.
    pub include_degraded: bool,
    /// Patch metadata author.
    pub author: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION_MM,
            min_spacing: DEFAULT_MIN_SPACING_MM,
            max_nets: DEFAULT_MAX_NETS,
            node_cap: DEFAULT_NODE_CAP,
            include_degraded: false,
            author: "boardpatch".to_string(),
        }
    }
}

/// Counters from one routing pass.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RoutingStats {
    pub nets_considered: usize,
    pub routed: usize,
    pub degraded: usize,
    pub skipped: usize,
}

/// One routing pass: the synthesized patches plus counters.
#[derive(Debug, Clone)]
pub struct RoutingReport {
    pub patches: Vec<Patch>,
    pub stats: RoutingStats,
}

/// One net's routing result before reporting.
struct RoutedNet {
    patch: Patch,
    degraded: bool,
}

/// Core synthesis API. Stateless across calls: each invocation reads one
/// snapshot and produces fresh patch values, so independent calls may run
/// in parallel.
pub struct BoardPatchCore;

impl BoardPatchCore {
    /// Route one net by id. Returns `Ok(None)` when the net is unknown,
    /// already connected, has nothing to route, or the board has
    /// insufficient geometry.
    pub fn route_net(
        snapshot: &GeometrySnapshot,
        net_id: u32,
        options: &EngineOptions,
    ) -> Result<Option<Patch>, EngineError> {
        if !snapshot.has_routable_geometry() {
            warn!(artifact = %snapshot.artifact_id, "insufficient geometry, nothing to route");
            return Ok(None);
        }
        let index = GeometryIndex::build(snapshot);
        let net = match index.net_by_id(net_id) {
            Some(net) => net,
            None => {
                warn!(net_id, "unknown net");
                return Ok(None);
            }
        };
        let obstacles = ObstacleSet::from_snapshot(snapshot, Some(net_id));
        Ok(route_one(snapshot, &index, net, &obstacles, options)?.map(|r| r.patch))
    }

    /// Route every unconnected net, one patch per net, capped at
    /// `options.max_nets`. An optional caller-supplied cache short-circuits
    /// repeat requests against the same snapshot input.
    pub fn route_unconnected_nets(
        snapshot: &GeometrySnapshot,
        options: &EngineOptions,
        mut cache: Option<&mut SuggestionCache>,
    ) -> Result<RoutingReport, EngineError> {
        let mut stats = RoutingStats::default();
        let mut patches = Vec::new();

        if !snapshot.has_routable_geometry() {
            warn!(artifact = %snapshot.artifact_id, "insufficient geometry, nothing to route");
            return Ok(RoutingReport { patches, stats });
        }

        let index = GeometryIndex::build(snapshot);
        let mut pending = unconnected_nets(&index);
        if pending.len() > options.max_nets {
            debug!(
                total = pending.len(),
                cap = options.max_nets,
                "capping routed nets for this pass"
            );
            pending.truncate(options.max_nets);
        }
        stats.nets_considered = pending.len();

        for net_id in pending {
            let net = match index.net_by_id(net_id) {
                Some(net) => net,
                None => continue,
            };
            let obstacles = ObstacleSet::from_snapshot(snapshot, Some(net_id));
            let key = CacheKey::for_request(
                &snapshot.artifact_id,
                snapshot.version,
                Some(net_id),
                &obstacles,
            );

            if let Some(cache) = cache.as_deref_mut() {
                if let Some(cached) = cache.get(&key) {
                    stats.routed += cached.len();
                    patches.extend(cached.iter().cloned());
                    continue;
                }
            }

            match route_one(snapshot, &index, net, &obstacles, options)? {
                Some(routed) => {
                    stats.routed += 1;
                    if routed.degraded {
                        stats.degraded += 1;
                    }
                    if let Some(cache) = cache.as_deref_mut() {
                        cache.insert(key, vec![routed.patch.clone()]);
                    }
                    patches.push(routed.patch);
                }
                None => {
                    stats.skipped += 1;
                    if let Some(cache) = cache.as_deref_mut() {
                        cache.insert(key, Vec::new());
                    }
                }
            }
        }

        Ok(RoutingReport { patches, stats })
    }

    /// Scan footprint spacing and wrap the proposed moves into one patch.
    /// Returns `Ok(None)` when spacing is already satisfied or geometry is
    /// insufficient.
    pub fn optimize_placement(
        snapshot: &GeometrySnapshot,
        options: &EngineOptions,
    ) -> Result<Option<Patch>, EngineError> {
        if !snapshot.has_routable_geometry() {
            warn!(artifact = %snapshot.artifact_id, "insufficient geometry, nothing to optimize");
            return Ok(None);
        }
        let optimizer = PlacementOptimizer::new(options.min_spacing);
        let directives = optimizer.optimize_spacing(snapshot);
        let synthesizer = PatchSynthesizer::new(options.author.clone());
        Ok(synthesizer.placement_patch(snapshot, &directives)?)
    }
}

fn route_one(
    snapshot: &GeometrySnapshot,
    index: &GeometryIndex<'_>,
    net: &Net,
    obstacles: &ObstacleSet,
    options: &EngineOptions,
) -> Result<Option<RoutedNet>, EngineError> {
    let connectivity = analyze_net(index, net.id);
    let (start, end) = match connectivity.route_endpoints() {
        Some(endpoints) => endpoints,
        None => {
            debug!(net = %net.name, "net already connected or nothing to route");
            return Ok(None);
        }
    };

    let router = Router::new(options.resolution).with_node_cap(options.node_cap);
    let outcome = router.find_path(start, end, obstacles, snapshot.outline_bounds());
    if outcome.degraded && !options.include_degraded {
        warn!(net = %net.name, "dropping degraded route");
        return Ok(None);
    }

    let synthesizer = PatchSynthesizer::new(options.author.clone());
    Ok(synthesizer
        .route_patch(snapshot, net, &outcome)?
        .map(|patch| RoutedNet {
            patch,
            degraded: outcome.degraded,
        }))
}
