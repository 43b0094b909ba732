//! Railing auto-fit — shrink or drop railings so the requested length never
//! exceeds the available perimeter.
//!
//! Reduction starts at the most recently added railing and walks backward.
//! A railing that fits entirely inside the remaining excess is removed;
//! otherwise it is shrunk to whole meters, keeping at least one 1 m unit.
//!
//! ```
//! use mezzanine_logic::accessory::{Accessory, AccessoryId, AccessoryKind};
//! use mezzanine_logic::autofit::auto_fit;
//!
//! let railing = Accessory::new(
//!     AccessoryId(1),
//!     AccessoryKind::Railing { segment_length_meters: 40 },
//!     1,
//! );
//! let fit = auto_fit(&[railing], 26.8);
//! assert_eq!(fit.accessories[0].railing_meters(), Some(26));
//! ```

use serde::{Deserialize, Serialize};

use crate::accessory::{Accessory, AccessoryId, AccessoryKind};
use crate::constants::{railing, MM_PER_M};
use crate::geometry::mm_to_m;

/// Outcome of one auto-fit pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FitResult {
    pub accessories: Vec<Accessory>,
    /// Railing length taken away, mm.
    pub reduced_mm: u64,
    pub removed: Vec<AccessoryId>,
    pub shrunk: Vec<AccessoryId>,
}

impl FitResult {
    pub fn changed(&self) -> bool {
        self.reduced_mm > 0
    }

    pub fn reduced_meters(&self) -> f64 {
        mm_to_m(self.reduced_mm)
    }
}

/// Requested railing length in millimeters.
pub fn requested_railing_mm(accessories: &[Accessory]) -> u64 {
    accessories
        .iter()
        .filter_map(Accessory::railing_meters)
        .sum::<u64>()
        * MM_PER_M as u64
}

/// Auto-fit against an available perimeter given in meters.
///
/// The limit is rounded down to the millimeter so the result never exceeds it.
pub fn auto_fit(accessories: &[Accessory], available_m: f64) -> FitResult {
    let available_mm = (available_m.max(0.0) * MM_PER_M as f64 + 1e-6).floor() as u64;
    auto_fit_mm(accessories, available_mm)
}

/// Auto-fit against an available perimeter in millimeters.
pub fn auto_fit_mm(accessories: &[Accessory], available_mm: u64) -> FitResult {
    let requested = requested_railing_mm(accessories);
    let mut result = FitResult {
        accessories: accessories.to_vec(),
        ..FitResult::default()
    };
    if requested <= available_mm {
        return result;
    }

    let mut excess = requested - available_mm;
    for idx in (0..result.accessories.len()).rev() {
        if excess == 0 {
            break;
        }
        let current = result.accessories[idx];
        let AccessoryKind::Railing {
            segment_length_meters: segment,
        } = current.kind
        else {
            continue;
        };
        let total = segment as u64 * current.quantity as u64 * MM_PER_M as u64;

        if total <= excess {
            excess -= total;
            result.reduced_mm += total;
            result.removed.push(current.id);
            result.accessories.remove(idx);
            continue;
        }

        match shrink_railing(segment, current.quantity, total - excess) {
            Some((new_segment, new_quantity)) => {
                let kept = new_segment as u64 * new_quantity as u64 * MM_PER_M as u64;
                let cut = total - kept;
                excess = excess.saturating_sub(cut);
                result.reduced_mm += cut;
                result.shrunk.push(current.id);
                result.accessories[idx] = Accessory {
                    quantity: new_quantity,
                    kind: AccessoryKind::Railing {
                        segment_length_meters: new_segment,
                    },
                    ..current
                };
            }
            None => {
                // Less than one whole meter left: no unit fits.
                excess = excess.saturating_sub(total);
                result.reduced_mm += total;
                result.removed.push(current.id);
                result.accessories.remove(idx);
            }
        }
    }

    if result.changed() {
        log::info!(
            "auto-fit reduced railings by {:.1} m ({} removed, {} shrunk)",
            result.reduced_meters(),
            result.removed.len(),
            result.shrunk.len()
        );
    }
    result
}

/// New `(segment, quantity)` whose total fits in `target_mm`, or `None` when
/// not even one minimum-length unit fits.
///
/// Tries the same quantity with a shorter segment first; if that would drop
/// below the minimum segment, reduces the quantity instead.
pub fn shrink_railing(segment: u32, quantity: u32, target_mm: u64) -> Option<(u32, u32)> {
    let whole_m = target_mm / MM_PER_M as u64;
    let min = railing::MIN_SEGMENT_M as u64;
    if whole_m < min {
        return None;
    }

    let per_unit = whole_m / quantity.max(1) as u64;
    if per_unit >= min {
        return Some((per_unit as u32, quantity));
    }

    let new_quantity = (whole_m / segment.max(1) as u64).max(1);
    let new_segment = (whole_m / new_quantity).max(min);
    Some((new_segment as u32, new_quantity as u32))
}
