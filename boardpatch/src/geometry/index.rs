//! Snapshot Lookup Index
//!
//! Id-to-element lookup tables built once per snapshot read. Patch
//! synthesis resolves footprints, tracks, and nets through these tables
//! rather than scanning the snapshot per lookup.

use std::collections::HashMap;

use super::schema::{Footprint, GeometrySnapshot, Net, Pad, Track, Via};

/// Borrowing index over one `GeometrySnapshot`.
pub struct GeometryIndex<'a> {
    snapshot: &'a GeometrySnapshot,
    footprints_by_id: HashMap<&'a str, usize>,
    footprints_by_reference: HashMap<&'a str, usize>,
    tracks_by_id: HashMap<&'a str, usize>,
    vias_by_id: HashMap<&'a str, usize>,
    nets_by_id: HashMap<u32, usize>,
    nets_by_name: HashMap<&'a str, usize>,
    /// Net id -> (footprint index, pad index) for every pad on that net.
    pads_by_net: HashMap<u32, Vec<(usize, usize)>>,
}

impl<'a> GeometryIndex<'a> {
    pub fn build(snapshot: &'a GeometrySnapshot) -> Self {
        let mut footprints_by_id = HashMap::new();
        let mut footprints_by_reference = HashMap::new();
        let mut pads_by_net: HashMap<u32, Vec<(usize, usize)>> = HashMap::new();

        for (fi, footprint) in snapshot.footprints.iter().enumerate() {
            footprints_by_id.insert(footprint.id.as_str(), fi);
            footprints_by_reference.insert(footprint.reference.as_str(), fi);
            for (pi, pad) in footprint.pads.iter().enumerate() {
                if let Some(net) = pad.net {
                    pads_by_net.entry(net).or_default().push((fi, pi));
                }
            }
        }

        let tracks_by_id = snapshot
            .tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();
        let vias_by_id = snapshot
            .vias
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id.as_str(), i))
            .collect();
        let nets_by_id = snapshot
            .nets
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();
        let nets_by_name = snapshot
            .nets
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name.as_str(), i))
            .collect();

        Self {
            snapshot,
            footprints_by_id,
            footprints_by_reference,
            tracks_by_id,
            vias_by_id,
            nets_by_id,
            nets_by_name,
            pads_by_net,
        }
    }

    pub fn snapshot(&self) -> &'a GeometrySnapshot {
        self.snapshot
    }

    pub fn footprint_by_id(&self, id: &str) -> Option<&'a Footprint> {
        self.footprints_by_id
            .get(id)
            .map(|&i| &self.snapshot.footprints[i])
    }

    pub fn footprint_by_reference(&self, reference: &str) -> Option<&'a Footprint> {
        self.footprints_by_reference
            .get(reference)
            .map(|&i| &self.snapshot.footprints[i])
    }

    pub fn track_by_id(&self, id: &str) -> Option<&'a Track> {
        self.tracks_by_id.get(id).map(|&i| &self.snapshot.tracks[i])
    }

    pub fn via_by_id(&self, id: &str) -> Option<&'a Via> {
        self.vias_by_id.get(id).map(|&i| &self.snapshot.vias[i])
    }

    pub fn net_by_id(&self, id: u32) -> Option<&'a Net> {
        self.nets_by_id.get(&id).map(|&i| &self.snapshot.nets[i])
    }

    pub fn net_by_name(&self, name: &str) -> Option<&'a Net> {
        self.nets_by_name.get(name).map(|&i| &self.snapshot.nets[i])
    }

    /// All pads on a net, with their owning footprints.
    pub fn pads_of_net(&self, net: u32) -> Vec<(&'a Footprint, &'a Pad)> {
        self.pads_by_net
            .get(&net)
            .map(|entries| {
                entries
                    .iter()
                    .map(|&(fi, pi)| {
                        let footprint = &self.snapshot.footprints[fi];
                        (footprint, &footprint.pads[pi])
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn tracks_of_net(&self, net: u32) -> Vec<&'a Track> {
        self.snapshot
            .tracks
            .iter()
            .filter(|t| t.net == Some(net))
            .collect()
    }

    pub fn vias_of_net(&self, net: u32) -> Vec<&'a Via> {
        self.snapshot
            .vias
            .iter()
            .filter(|v| v.net == Some(net))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::schema::*;

    fn sample_snapshot() -> GeometrySnapshot {
        GeometrySnapshot {
            artifact_id: "board-1".to_string(),
            version: 1,
            outline: vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 40.0),
                Point::new(0.0, 40.0),
            ],
            layers: vec![Layer {
                name: "F.Cu".to_string(),
                kind: LayerKind::Signal,
            }],
            setup: BoardSetup::default(),
            nets: vec![Net {
                id: 1,
                name: "N1".to_string(),
            }],
            footprints: vec![Footprint {
                id: "fp-1".to_string(),
                reference: "R1".to_string(),
                value: "10k".to_string(),
                layer: "F.Cu".to_string(),
                position: Point::new(10.0, 10.0),
                rotation: 0.0,
                pads: vec![Pad {
                    number: "1".to_string(),
                    position: Point::new(9.0, 10.0),
                    size: Size {
                        width: 1.0,
                        height: 1.0,
                    },
                    drill: None,
                    net: Some(1),
                }],
            }],
            tracks: vec![],
            vias: vec![],
        }
    }

    #[test]
    fn test_lookup_by_reference_and_id() {
        let snapshot = sample_snapshot();
        let index = GeometryIndex::build(&snapshot);
        assert_eq!(index.footprint_by_reference("R1").unwrap().id, "fp-1");
        assert_eq!(index.footprint_by_id("fp-1").unwrap().reference, "R1");
        assert!(index.footprint_by_reference("R2").is_none());
    }

    #[test]
    fn test_pads_of_net() {
        let snapshot = sample_snapshot();
        let index = GeometryIndex::build(&snapshot);
        let pads = index.pads_of_net(1);
        assert_eq!(pads.len(), 1);
        assert_eq!(pads[0].1.number, "1");
        assert!(index.pads_of_net(2).is_empty());
    }
}
