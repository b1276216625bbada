//! Board Geometry Schema
//!
//! Data structures describing one versioned snapshot of a board design:
//! outline, layers, nets, tracks, vias, and footprints with their pads.
//! A snapshot is read-only input for one synthesis call; the engine never
//! mutates it in place and only produces new `Patch` values against it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A point in board-local millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point in mm.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle covering all points, or `None` for an empty set.
    pub fn from_points<'a, I>(points: I) -> Option<Rect>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Rect::new(*first, *first);
        for p in iter {
            rect.include(p);
        }
        Some(rect)
    }

    /// Grow the rectangle to cover `p`.
    pub fn include(&mut self, p: &Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Rectangle expanded by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Rect {
        Rect::new(
            Point::new(self.min.x - margin, self.min.y - margin),
            Point::new(self.max.x + margin, self.max.y + margin),
        )
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let mut rect = *self;
        rect.include(&other.min);
        rect.include(&other.max);
        rect
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Clamp a point into the rectangle.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// One versioned state of a board, identified by `(artifact_id, version)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometrySnapshot {
    pub artifact_id: String,
    pub version: u64,
    /// Board outline polygon (closed, board-local mm).
    #[serde(default)]
    pub outline: Vec<Point>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub setup: BoardSetup,
    #[serde(default)]
    pub nets: Vec<Net>,
    #[serde(default)]
    pub footprints: Vec<Footprint>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub vias: Vec<Via>,
}

impl GeometrySnapshot {
    /// A snapshot with no outline or no layers cannot be routed against.
    pub fn has_routable_geometry(&self) -> bool {
        !self.outline.is_empty() && !self.layers.is_empty()
    }

    /// Bounding box of the board outline, if any.
    pub fn outline_bounds(&self) -> Option<Rect> {
        Rect::from_points(&self.outline)
    }
}

/// Board-level design parameters (subset relevant to patch synthesis).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSetup {
    pub clearance: f64,           // Default clearance (mm)
    pub track_width: f64,         // Default track width (mm)
    pub via_size: f64,            // Default via pad size (mm)
    pub via_drill: f64,           // Default via drill (mm)
    /// Per-netclass track widths, keyed by netclass name.
    #[serde(default)]
    pub netclass_widths: HashMap<String, f64>,
}

impl Default for BoardSetup {
    fn default() -> Self {
        Self {
            clearance: 0.2,
            track_width: 0.25,
            via_size: 0.8,
            via_drill: 0.4,
            netclass_widths: HashMap::new(),
        }
    }
}

/// Copper layer definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,             // e.g., "F.Cu", "B.Cu", "In1.Cu"
    pub kind: LayerKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LayerKind {
    Signal,
    Power,
    Mixed,
    Unknown,
}

impl Default for LayerKind {
    fn default() -> Self {
        LayerKind::Signal
    }
}

/// Electrical net. Membership is by id reference from pads/tracks/vias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    pub id: u32,
    pub name: String,
}

/// Footprint (component) placed on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footprint {
    pub id: String,
    pub reference: String,        // e.g., "U3", "C12"
    #[serde(default)]
    pub value: String,
    pub layer: String,
    pub position: Point,          // Footprint center (mm)
    #[serde(default)]
    pub rotation: f64,            // Degrees
    #[serde(default)]
    pub pads: Vec<Pad>,
}

/// Pad on a footprint. Positions are absolute board coordinates, not
/// footprint-relative. A pad with no net is legal (unconnected).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pad {
    pub number: String,
    pub position: Point,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub drill: Option<f64>,       // Drill diameter for through-hole pads (mm)
    #[serde(default)]
    pub net: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Track segment (one straight copper segment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub start: Point,
    pub end: Point,
    pub width: f64,               // Track width (mm)
    pub layer: String,
    #[serde(default)]
    pub net: Option<u32>,
}

impl Track {
    /// Segment length in mm.
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// Via (vertical interconnect).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub id: String,
    pub position: Point,
    pub size: f64,                // Via pad size (mm)
    pub drill: f64,               // Drill diameter (mm)
    pub layers: (String, String), // Start and end layers
    #[serde(default)]
    pub net: Option<u32>,
}
