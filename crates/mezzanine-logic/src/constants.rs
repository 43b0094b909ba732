//! Fixed layout constants — extension platform, stairs, openings, walker.
//!
//! Lengths are integer millimeters unless the name ends in `_M`. None of
//! these are user-configurable; commercial figures live in
//! [`crate::pricing::PriceList`].

pub const MM_PER_M: u32 = 1000;

/// The corner platform that appears whenever a corner stair is configured.
pub mod extension {
    /// Width of the platform along the structure's front edge.
    pub const WIDTH_MM: u32 = 3000;
    /// Depth of the platform, projecting outward from the front edge.
    pub const DEPTH_MM: u32 = 1400;

    /// Net perimeter the extension adds: both depth edges plus its own front.
    pub const fn perimeter_gain_mm() -> u32 {
        2 * DEPTH_MM + WIDTH_MM
    }

    /// Floor area of the extension in mm².
    pub const fn area_mm2() -> u64 {
        WIDTH_MM as u64 * DEPTH_MM as u64
    }
}

pub mod stairs {
    /// Front-edge width taken by one straight stair unit.
    pub const STRAIGHT_WIDTH_MM: u32 = 1000;
    /// Occupancy charged for a corner stair. The stair itself descends from
    /// the extension's front edge; the two side edges stay open for railings.
    pub const CORNER_OCCUPANCY_MM: u32 = super::extension::DEPTH_MM;
}

pub mod openings {
    /// Clear distance before the first opening and between neighbours.
    pub const GAP_MM: u32 = 500;
}

pub mod railing {
    /// Smallest per-unit segment auto-fit may leave behind, in whole meters.
    pub const MIN_SEGMENT_M: u32 = 1;
}

pub mod walker {
    /// Longest single railing segment emitted for rendering.
    pub const MAX_RAILING_CHUNK_M: f64 = 2.5;
    /// Hard cap on walker iterations. Not configurable.
    pub const MAX_WALK_STEPS: usize = 1024;
    /// Tolerance for cursor comparisons.
    pub const EPSILON_M: f64 = 1e-9;
}

/// Ranges offered by the configuration form. The engine computes with any
/// positive value; [`crate::config::validate_config`] reports the rest.
pub mod limits {
    pub const LENGTH_MIN_MM: u32 = 2000;
    pub const LENGTH_MAX_MM: u32 = 20000;
    pub const WIDTH_MIN_MM: u32 = 2000;
    pub const WIDTH_MAX_MM: u32 = 20000;
    pub const HEIGHT_MIN_MM: u32 = 2000;
    pub const HEIGHT_MAX_MM: u32 = 6000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_figures_match_declared_dimensions() {
        assert_eq!(extension::perimeter_gain_mm(), 5800);
        assert_eq!(extension::area_mm2(), 4_200_000);
    }

    #[test]
    fn corner_stair_occupies_extension_depth() {
        assert_eq!(stairs::CORNER_OCCUPANCY_MM, extension::DEPTH_MM);
    }
}
