//! Net Connectivity Analysis
//!
//! Groups the pads of a net into electrically connected clusters by
//! union-find over pad positions, track endpoints, and vias. A net whose
//! pads fall into more than one cluster still needs routing; the router is
//! pointed at the closest pad pair between the two largest clusters.

use petgraph::unionfind::UnionFind;

use super::index::GeometryIndex;
use super::schema::Point;

/// Tolerance for treating two endpoints as electrically coincident (mm).
pub const COORD_TOLERANCE_MM: f64 = 0.01;

/// Connectivity state of one net.
#[derive(Debug, Clone)]
pub struct NetConnectivity {
    pub net_id: u32,
    /// Pad positions grouped by electrical cluster, largest cluster first.
    pub pad_clusters: Vec<Vec<Point>>,
}

impl NetConnectivity {
    /// A net is fully connected when all of its pads share one cluster.
    /// Nets with fewer than two pads have nothing to route.
    pub fn is_fully_connected(&self) -> bool {
        self.pad_clusters.len() <= 1
    }

    /// Closest pad pair between the two largest clusters, as a routing
    /// request `(start, end)`. `None` when the net is already connected.
    pub fn route_endpoints(&self) -> Option<(Point, Point)> {
        if self.pad_clusters.len() < 2 {
            return None;
        }
        let (a, b) = (&self.pad_clusters[0], &self.pad_clusters[1]);
        let mut best: Option<(Point, Point, f64)> = None;
        for pa in a {
            for pb in b {
                let d = pa.distance_to(pb);
                if best.map(|(_, _, bd)| d < bd).unwrap_or(true) {
                    best = Some((*pa, *pb, d));
                }
            }
        }
        best.map(|(s, e, _)| (s, e))
    }
}

/// Analyze connectivity of one net from the snapshot index.
pub fn analyze_net(index: &GeometryIndex<'_>, net_id: u32) -> NetConnectivity {
    let pads = index.pads_of_net(net_id);
    let tracks = index.tracks_of_net(net_id);
    let vias = index.vias_of_net(net_id);

    // Node layout: pads, then one node per track endpoint, then vias.
    let pad_count = pads.len();
    let track_base = pad_count;
    let via_base = track_base + tracks.len() * 2;
    let node_count = via_base + vias.len();

    let mut positions: Vec<Point> = Vec::with_capacity(node_count);
    positions.extend(pads.iter().map(|(_, pad)| pad.position));
    for track in &tracks {
        positions.push(track.start);
        positions.push(track.end);
    }
    positions.extend(vias.iter().map(|via| via.position));

    let mut uf = UnionFind::<usize>::new(node_count);

    // A track electrically joins its own two endpoints.
    for ti in 0..tracks.len() {
        uf.union(track_base + ti * 2, track_base + ti * 2 + 1);
    }

    // Join any two nodes whose positions coincide.
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            if positions[i].distance_to(&positions[j]) <= COORD_TOLERANCE_MM {
                uf.union(i, j);
            }
        }
    }

    // Group pads by union-find root in first-seen order, so equal-size
    // clusters keep a deterministic order across runs.
    let mut clusters: Vec<(usize, Vec<Point>)> = Vec::new();
    for (pi, (_, pad)) in pads.iter().enumerate() {
        let root = uf.find(pi);
        match clusters.iter_mut().find(|(r, _)| *r == root) {
            Some((_, points)) => points.push(pad.position),
            None => clusters.push((root, vec![pad.position])),
        }
    }

    let mut pad_clusters: Vec<Vec<Point>> = clusters.into_iter().map(|(_, points)| points).collect();
    pad_clusters.sort_by(|a, b| b.len().cmp(&a.len()));

    NetConnectivity {
        net_id,
        pad_clusters,
    }
}

/// Ids of all nets that still need routing, in snapshot net order.
pub fn unconnected_nets(index: &GeometryIndex<'_>) -> Vec<u32> {
    index
        .snapshot()
        .nets
        .iter()
        .filter(|net| !analyze_net(index, net.id).is_fully_connected())
        .map(|net| net.id)
        .collect()
}
