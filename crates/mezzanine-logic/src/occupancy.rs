//! Perimeter occupancy — how much boundary stairs and gates consume, and
//! how much is left for railings.
//!
//! Occupancy is always recomputed from the accessory list; nothing here is
//! cached between calls.

use serde::{Deserialize, Serialize};

use crate::accessory::{Accessory, AccessoryId, AccessoryKind};
use crate::config::Configuration;
use crate::constants::{extension, openings, stairs, MM_PER_M};
use crate::geometry::{mm_to_m, perimeter_mm};

/// Stair occupancy in millimeters.
pub fn stair_occupancy_mm(accessories: &[Accessory]) -> u64 {
    accessories
        .iter()
        .map(|a| match a.kind {
            AccessoryKind::Stair { variant } if variant.is_corner() => {
                a.quantity as u64 * stairs::CORNER_OCCUPANCY_MM as u64
            }
            AccessoryKind::Stair { .. } => a.quantity as u64 * stairs::STRAIGHT_WIDTH_MM as u64,
            _ => 0,
        })
        .sum()
}

/// Linear meters consumed by stairs.
pub fn stair_occupancy(accessories: &[Accessory]) -> f64 {
    mm_to_m(stair_occupancy_mm(accessories))
}

/// Gate occupancy in millimeters.
pub fn gate_occupancy_mm(accessories: &[Accessory]) -> u64 {
    accessories
        .iter()
        .map(|a| match a.kind {
            AccessoryKind::PalletGate { opening_width } => {
                a.quantity as u64 * opening_width.millimeters() as u64
            }
            _ => 0,
        })
        .sum()
}

/// Linear meters consumed by pallet gates.
pub fn gate_occupancy(accessories: &[Accessory]) -> f64 {
    mm_to_m(gate_occupancy_mm(accessories))
}

/// Perimeter left for railings, in millimeters.
///
/// With a corner stair the answer is the full perimeter rounded down to the
/// meter: the stair's footprint is already part of the extension geometry,
/// so occupancy is not subtracted.
pub fn available_perimeter_mm(config: &Configuration) -> u64 {
    let corner = config.has_corner_stair();
    let total = perimeter_mm(config.length(), config.width(), corner);
    if corner {
        let m = MM_PER_M as u64;
        return total / m * m;
    }
    let occupied = stair_occupancy_mm(config.accessories()) + gate_occupancy_mm(config.accessories());
    let available = total.saturating_sub(occupied);
    log::debug!(
        "available perimeter: {} mm of {} mm ({} mm occupied)",
        available,
        total,
        occupied
    );
    available
}

/// Perimeter left for railings, in meters. Never negative.
pub fn available_perimeter(config: &Configuration) -> f64 {
    mm_to_m(available_perimeter_mm(config))
}

/// One stair or gate unit reserved on the front edge.
///
/// `start`/`end` are plan `x` coordinates in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub accessory: AccessoryId,
    /// Unit index within the accessory's quantity.
    pub unit: u32,
    pub start: f64,
    pub end: f64,
}

impl Opening {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Lay out straight stairs and pallet gates along the front edge.
///
/// Units go in accessory order, one gap before the first and between each.
/// A unit that would run past the platform's right end is not laid out; it
/// still counts toward occupancy.
pub fn front_openings(config: &Configuration) -> Vec<Opening> {
    let front_start = if config.has_corner_stair() {
        extension::WIDTH_MM.min(config.length())
    } else {
        0
    };
    let front_end = config.length() as u64;
    let mut cursor = front_start as u64 + openings::GAP_MM as u64;
    let mut result = Vec::new();

    for a in config.accessories() {
        let width = match a.kind {
            AccessoryKind::Stair { variant } if !variant.is_corner() => stairs::STRAIGHT_WIDTH_MM,
            AccessoryKind::PalletGate { opening_width } => opening_width.millimeters(),
            _ => continue,
        } as u64;
        for unit in 0..a.quantity {
            let end = cursor + width;
            if end > front_end {
                log::debug!(
                    "accessory {} unit {} does not fit on the front edge ({} mm > {} mm)",
                    a.id,
                    unit,
                    end,
                    front_end
                );
                continue;
            }
            result.push(Opening {
                accessory: a.id,
                unit,
                start: mm_to_m(cursor),
                end: mm_to_m(end),
            });
            cursor = end + openings::GAP_MM as u64;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::{GateOpening, StairVariant};
    use crate::config::LoadClass;

    fn platform(accessories: Vec<Accessory>) -> Configuration {
        Configuration::from_parts(9400, 4000, 3000, LoadClass::Medium, accessories)
    }

    fn stair(id: u32, variant: StairVariant, quantity: u32) -> Accessory {
        Accessory::new(AccessoryId(id), AccessoryKind::Stair { variant }, quantity)
    }

    fn gate(id: u32, opening_width: GateOpening, quantity: u32) -> Accessory {
        Accessory::new(AccessoryId(id), AccessoryKind::PalletGate { opening_width }, quantity)
    }

    #[test]
    fn empty_platform_has_full_perimeter() {
        assert!((available_perimeter(&platform(vec![])) - 26.8).abs() < 1e-9);
    }

    #[test]
    fn straight_stair_takes_one_meter_per_unit() {
        let config = platform(vec![stair(1, StairVariant::Straight2000, 1)]);
        assert!((available_perimeter(&config) - 25.8).abs() < 1e-9);
        let config = platform(vec![stair(1, StairVariant::Straight1500, 3)]);
        assert!((stair_occupancy(config.accessories()) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn gates_take_their_opening_width() {
        let config = platform(vec![
            gate(1, GateOpening::W2500, 2),
            gate(2, GateOpening::W3000, 1),
        ]);
        assert!((gate_occupancy(config.accessories()) - 8.0).abs() < 1e-9);
        assert!((available_perimeter(&config) - 18.8).abs() < 1e-9);
    }

    #[test]
    fn corner_stair_uses_floored_full_perimeter() {
        let config = platform(vec![
            stair(1, StairVariant::Corner1200, 1),
            stair(2, StairVariant::Straight1000, 2),
            gate(3, GateOpening::W2000, 1),
        ]);
        // floor(26.8 + 5.8), occupancy ignored
        assert_eq!(available_perimeter(&config), 32.0);
        assert!((stair_occupancy(config.accessories()) - 3.4).abs() < 1e-9);
    }

    #[test]
    fn available_never_negative() {
        let config = Configuration::from_parts(
            2000,
            2000,
            3000,
            LoadClass::Light,
            vec![gate(1, GateOpening::W3000, 5)],
        );
        assert_eq!(available_perimeter(&config), 0.0);
    }

    #[test]
    fn openings_follow_insertion_order_with_gaps() {
        let config = platform(vec![
            stair(1, StairVariant::Straight1000, 1),
            gate(2, GateOpening::W2000, 1),
        ]);
        let ops = front_openings(&config);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].accessory, AccessoryId(1));
        assert!((ops[0].start - 0.5).abs() < 1e-9);
        assert!((ops[0].end - 1.5).abs() < 1e-9);
        assert!((ops[1].start - 2.0).abs() < 1e-9);
        assert!((ops[1].width() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn openings_start_right_of_extension() {
        let config = platform(vec![
            stair(1, StairVariant::Corner1000, 1),
            stair(2, StairVariant::Straight1000, 1),
        ]);
        let ops = front_openings(&config);
        assert_eq!(ops.len(), 1);
        assert!((ops[0].start - 3.5).abs() < 1e-9);
    }

    #[test]
    fn overflowing_units_are_not_laid_out() {
        let config = platform(vec![gate(1, GateOpening::W3000, 4)]);
        // 0.5 + 3.0 + 0.5 + 3.0 = 7.0; a third gate would end at 10.5 > 9.4
        let ops = front_openings(&config);
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().all(|o| o.end <= 9.4));
    }
}
