//! Perimeter geometry for the platform and its optional corner extension.
//!
//! Plan coordinates are meters: `x` runs along the platform length, `y`
//! along its width. The front edge lies on `y = 0` and the extension, when
//! present, projects to negative `y` at the left end of the front edge.
//!
//! ```text
//!   (0,W) ┌───────── back ─────────┐ (L,W)
//!         │                        │
//!    left │                        │ right
//!         │                        │
//!   (0,0) ├──────┬──── front ──────┘ (L,0)
//!         │ ext  │
//!         └──────┘ (3.0,-1.4)
//! ```
//!
//! Perimeter math is done in integer millimeters and converted to meters at
//! the boundary so the published figures stay exact.

use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::constants::{extension, MM_PER_M};

pub fn mm_to_m(mm: u64) -> f64 {
    mm as f64 / MM_PER_M as f64
}

/// Perimeter in millimeters, including the extension's net gain.
pub fn perimeter_mm(length_mm: u32, width_mm: u32, has_corner_stair: bool) -> u64 {
    let base = 2 * (length_mm as u64 + width_mm as u64);
    if has_corner_stair {
        base + extension::perimeter_gain_mm() as u64
    } else {
        base
    }
}

/// Perimeter in meters, including the extension's net gain.
pub fn perimeter(length_mm: u32, width_mm: u32, has_corner_stair: bool) -> f64 {
    mm_to_m(perimeter_mm(length_mm, width_mm, has_corner_stair))
}

/// Net perimeter added by the extension, m.
pub fn extension_perimeter_gain() -> f64 {
    mm_to_m(extension::perimeter_gain_mm() as u64)
}

/// Floor area of the extension, m².
pub fn extension_area() -> f64 {
    extension::area_mm2() as f64 / 1e6
}

/// Floor area in m², including the extension when present.
pub fn floor_area(length_mm: u32, width_mm: u32, has_corner_stair: bool) -> f64 {
    let mut mm2 = length_mm as u64 * width_mm as u64;
    if has_corner_stair {
        mm2 += extension::area_mm2();
    }
    mm2 as f64 / 1e6
}

/// Perimeter edge identifiers, in walk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeId {
    ExtensionLeft,
    /// Earmarked for the corner stair; railings never render here.
    ExtensionFront,
    ExtensionRight,
    Front,
    Right,
    Back,
    Left,
}

/// A straight edge of the walkable perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerimeterEdge {
    pub id: EdgeId,
    pub start: [f64; 2],
    pub end: [f64; 2],
}

impl PerimeterEdge {
    pub fn new(id: EdgeId, start: [f64; 2], end: [f64; 2]) -> Self {
        Self { id, start, end }
    }

    pub fn length(&self) -> f64 {
        let dx = self.end[0] - self.start[0];
        let dy = self.end[1] - self.start[1];
        (dx * dx + dy * dy).sqrt()
    }

    /// Plan point at `offset` meters from the edge start.
    pub fn point_at(&self, offset: f64) -> [f64; 2] {
        let len = self.length();
        if len <= 0.0 {
            return self.start;
        }
        let t = (offset / len).clamp(0.0, 1.0);
        [
            self.start[0] + (self.end[0] - self.start[0]) * t,
            self.start[1] + (self.end[1] - self.start[1]) * t,
        ]
    }
}

/// Ordered, counter-clockwise edge list: extension edges first when present,
/// then the front remainder, right, back and left. Zero-length edges are
/// dropped.
pub fn perimeter_edges(length_mm: u32, width_mm: u32, has_extension: bool) -> Vec<PerimeterEdge> {
    let l = mm_to_m(length_mm as u64);
    let w = mm_to_m(width_mm as u64);
    let mut edges = Vec::with_capacity(7);

    let front_start = if has_extension {
        let ew = mm_to_m(extension::WIDTH_MM as u64).min(l);
        let ed = mm_to_m(extension::DEPTH_MM as u64);
        edges.push(PerimeterEdge::new(EdgeId::ExtensionLeft, [0.0, 0.0], [0.0, -ed]));
        edges.push(PerimeterEdge::new(EdgeId::ExtensionFront, [0.0, -ed], [ew, -ed]));
        edges.push(PerimeterEdge::new(EdgeId::ExtensionRight, [ew, -ed], [ew, 0.0]));
        ew
    } else {
        0.0
    };

    edges.push(PerimeterEdge::new(EdgeId::Front, [front_start, 0.0], [l, 0.0]));
    edges.push(PerimeterEdge::new(EdgeId::Right, [l, 0.0], [l, w]));
    edges.push(PerimeterEdge::new(EdgeId::Back, [l, w], [0.0, w]));
    edges.push(PerimeterEdge::new(EdgeId::Left, [0.0, w], [0.0, 0.0]));

    edges.retain(|e| e.length() > 0.0);
    edges
}

/// Edge list for a configuration.
pub fn edges_for(config: &Configuration) -> Vec<PerimeterEdge> {
    perimeter_edges(config.length(), config.width(), config.has_corner_stair())
}
