//! Railing placement — walk the perimeter and emit railing segments.
//!
//! A single cursor travels the ordered edge list from
//! [`crate::geometry::perimeter_edges`]. The extension's front edge belongs
//! to the corner stair and is skipped whole; on the front edge the cursor
//! jumps over stair and gate openings. Everywhere else it lays down chunks
//! of at most [`MAX_RAILING_CHUNK_M`] meters, never crossing into an
//! upcoming opening.
//!
//! The walk stops when the requested length is placed, after one full lap
//! (nothing left to place on), or when [`MAX_WALK_STEPS`] is reached. The
//! last two return a truncated layout with [`RailingLayout::exhaustion`] set.

use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::constants::walker::{EPSILON_M, MAX_RAILING_CHUNK_M, MAX_WALK_STEPS};
use crate::geometry::{edges_for, EdgeId, PerimeterEdge};
use crate::occupancy::front_openings;

/// One railing segment for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub edge: EdgeId,
    /// Offset of the segment center from the edge start, m.
    pub center: f64,
    pub length: f64,
}

impl Placement {
    pub fn start(&self) -> f64 {
        self.center - self.length / 2.0
    }

    pub fn end(&self) -> f64 {
        self.center + self.length / 2.0
    }
}

/// Why a walk ended before the requested length was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exhaustion {
    /// A full lap was travelled; every free stretch is already used.
    NoFreeSpace,
    /// The iteration cap was hit.
    StepLimit,
}

/// Result of a walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailingLayout {
    pub placements: Vec<Placement>,
    /// Length the walk tried to place, after capping at the loop length.
    pub requested: f64,
    /// Part of `requested` that could not be placed.
    pub unplaced: f64,
    pub exhaustion: Option<Exhaustion>,
    pub steps: usize,
}

impl RailingLayout {
    pub fn placed(&self) -> f64 {
        self.placements.iter().map(|p| p.length).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.exhaustion.is_none()
    }
}

/// Reserved stretch on the front edge, as offsets from the edge start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReservedRange {
    pub start: f64,
    pub end: f64,
}

/// Cursor walk over an edge loop with reserved front-edge ranges.
#[derive(Debug, Clone)]
pub struct PerimeterWalker<'a> {
    edges: &'a [PerimeterEdge],
    reserved: Vec<ReservedRange>,
    start: f64,
}

impl<'a> PerimeterWalker<'a> {
    pub fn new(edges: &'a [PerimeterEdge], mut reserved: Vec<ReservedRange>) -> Self {
        reserved.retain(|r| r.end > r.start);
        reserved.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self {
            edges,
            reserved,
            start: 0.0,
        }
    }

    /// Begin the walk `offset` meters into the loop instead of at its origin.
    pub fn starting_at(mut self, offset: f64) -> Self {
        self.start = offset;
        self
    }

    /// Length of the whole edge loop, m.
    pub fn loop_length(&self) -> f64 {
        self.edges.iter().map(PerimeterEdge::length).sum()
    }

    /// Edge index and offset within it for a cursor position on the loop.
    fn locate(&self, cursor: f64) -> (usize, f64) {
        let mut acc = 0.0;
        for (idx, edge) in self.edges.iter().enumerate() {
            let len = edge.length();
            if cursor < acc + len - EPSILON_M {
                return (idx, (cursor - acc).max(0.0));
            }
            acc += len;
        }
        // Only reachable through rounding at the very end of the loop.
        (0, 0.0)
    }

    fn reserved_at(&self, offset: f64) -> Option<&ReservedRange> {
        self.reserved
            .iter()
            .find(|r| offset + EPSILON_M >= r.start && offset < r.end - EPSILON_M)
    }

    fn next_reserved_start(&self, offset: f64) -> Option<f64> {
        self.reserved
            .iter()
            .map(|r| r.start)
            .find(|&s| s > offset + EPSILON_M)
    }

    /// Place `requested` meters of railing.
    pub fn walk(&self, requested: f64) -> RailingLayout {
        let total = self.loop_length();
        let requested = requested.max(0.0).min(total);
        let mut remaining = requested;
        let mut placements = Vec::new();
        let mut cursor = if total > 0.0 {
            self.start.rem_euclid(total)
        } else {
            0.0
        };
        let mut travelled = 0.0;
        let mut steps = 0;

        let exhaustion = loop {
            if remaining <= EPSILON_M {
                break None;
            }
            if travelled >= total - EPSILON_M {
                break Some(Exhaustion::NoFreeSpace);
            }
            if steps >= MAX_WALK_STEPS {
                break Some(Exhaustion::StepLimit);
            }
            steps += 1;

            let (idx, offset) = self.locate(cursor);
            let edge = &self.edges[idx];
            let edge_left = (edge.length() - offset).max(0.0);

            // (distance to advance, railing laid down on the way)
            let (advance, chunk) = match edge.id {
                // Corner stair landing.
                EdgeId::ExtensionFront => (edge_left, 0.0),
                EdgeId::Front => match self.reserved_at(offset) {
                    Some(range) => ((range.end - offset).min(edge_left), 0.0),
                    None => {
                        let room = self
                            .next_reserved_start(offset)
                            .map_or(edge_left, |s| (s - offset).min(edge_left));
                        let chunk = MAX_RAILING_CHUNK_M.min(room).min(remaining);
                        (chunk, chunk)
                    }
                },
                _ => {
                    let chunk = MAX_RAILING_CHUNK_M.min(edge_left).min(remaining);
                    (chunk, chunk)
                }
            };

            if chunk > EPSILON_M {
                placements.push(Placement {
                    edge: edge.id,
                    center: offset + chunk / 2.0,
                    length: chunk,
                });
                remaining -= chunk;
            }

            // Never stall: an empty step moves on to the next edge boundary.
            let advance = if advance <= EPSILON_M { edge_left } else { advance };
            if advance <= EPSILON_M {
                break Some(Exhaustion::NoFreeSpace);
            }
            travelled += advance;
            cursor += advance;
            if cursor >= total - EPSILON_M {
                cursor = 0.0;
            }
        };

        let unplaced = remaining.max(0.0);
        if let Some(reason) = exhaustion {
            log::warn!(
                "railing placement stopped early ({:?}): {:.2} m of {:.2} m unplaced after {} steps",
                reason,
                unplaced,
                requested,
                steps
            );
        }

        RailingLayout {
            placements,
            requested,
            unplaced,
            exhaustion,
            steps,
        }
    }
}

/// Front-edge openings of a configuration as walker reservations.
pub fn reserved_ranges(config: &Configuration, edges: &[PerimeterEdge]) -> Vec<ReservedRange> {
    let Some(front) = edges.iter().find(|e| e.id == EdgeId::Front) else {
        return Vec::new();
    };
    let origin = front.start[0];
    front_openings(config)
        .into_iter()
        .map(|o| ReservedRange {
            start: o.start - origin,
            end: o.end - origin,
        })
        .collect()
}

/// Railing segments for every railing accessory, in walk order.
pub fn compute_railing_placements(config: &Configuration) -> RailingLayout {
    let edges = edges_for(config);
    let reserved = reserved_ranges(config, &edges);
    let requested = config.railing_meters() as f64;
    log::debug!(
        "placing {} m of railing over {} edges, {} reserved ranges",
        requested,
        edges.len(),
        reserved.len()
    );
    PerimeterWalker::new(&edges, reserved).walk(requested)
}
