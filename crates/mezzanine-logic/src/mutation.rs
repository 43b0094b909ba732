//! Configuration mutations — add, update, remove, resize.
//!
//! Every operation takes a snapshot and returns either a new snapshot (with
//! an optional note describing what auto-fit changed) or a [`Rejection`].
//! A rejected operation leaves nothing behind; the caller keeps the
//! configuration it passed in.
//!
//! ```
//! use mezzanine_logic::accessory::{AccessoryKind, StairVariant};
//! use mezzanine_logic::config::Configuration;
//! use mezzanine_logic::mutation::apply_accessory_add;
//!
//! let config = Configuration::default();
//! let corner = AccessoryKind::Stair { variant: StairVariant::Corner1200 };
//! let applied = apply_accessory_add(&config, corner, 1).unwrap();
//! assert!(apply_accessory_add(&applied.config, corner, 1).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::accessory::{Accessory, AccessoryId, AccessoryKind};
use crate::autofit::{auto_fit_mm, requested_railing_mm};
use crate::config::{Configuration, LoadClass};
use crate::error::Rejection;
use crate::geometry::mm_to_m;
use crate::occupancy::{available_perimeter, available_perimeter_mm};

/// A successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applied {
    pub config: Configuration,
    /// Present when auto-fit had to shrink or remove railings.
    pub note: Option<AdjustmentNote>,
}

/// What auto-fit changed while applying a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentNote {
    pub reduced_meters: f64,
    pub removed: Vec<AccessoryId>,
    pub shrunk: Vec<AccessoryId>,
}

impl fmt::Display for AdjustmentNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "railings reduced by {:.1} m", self.reduced_meters)?;
        if !self.removed.is_empty() {
            write!(f, " ({} removed)", self.removed.len())?;
        }
        Ok(())
    }
}

/// Fields to change on an existing accessory. `None` keeps the current value.
///
/// `kind` must be the same kind as the accessory being patched; a stair may
/// switch variant, a railing its segment length, a gate its opening.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryPatch {
    pub quantity: Option<u32>,
    pub kind: Option<AccessoryKind>,
}

impl AccessoryPatch {
    pub fn quantity(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            kind: None,
        }
    }

    pub fn kind(kind: AccessoryKind) -> Self {
        Self {
            quantity: None,
            kind: Some(kind),
        }
    }

    pub fn railing(segment_length_meters: u32, quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            kind: Some(AccessoryKind::Railing {
                segment_length_meters,
            }),
        }
    }
}

/// Perimeter left for railings, in meters.
pub fn compute_available_perimeter(config: &Configuration) -> f64 {
    available_perimeter(config)
}

/// Append a new accessory.
///
/// Auto-fit trims railings newest-first to the space that remains, so an
/// oversized railing is cut down to what fits. A railing of which not even
/// one whole meter fits is rejected.
pub fn apply_accessory_add(
    config: &Configuration,
    kind: AccessoryKind,
    quantity: u32,
) -> Result<Applied, Rejection> {
    check_accessory(&kind, quantity).map_err(reject)?;
    if kind.is_corner_stair() {
        if config.has_corner_stair() {
            return Err(reject(Rejection::SecondCornerStair));
        }
        if quantity != 1 {
            return Err(reject(Rejection::CornerStairQuantity {
                requested: quantity,
            }));
        }
    }

    let id = config.next_id();
    let mut accessories = config.accessories().to_vec();
    accessories.push(Accessory::new(id, kind, quantity));
    let candidate = config.with_accessories(accessories);
    log::debug!("adding {} accessory {} × {}", kind.name(), id, quantity);

    let applied = reconcile(candidate);
    if kind.is_railing() && applied.config.accessory(id).is_none() {
        let added = Accessory::new(id, kind, quantity).railing_meters().unwrap_or(0);
        let requested = config.railing_meters() + added;
        return Err(reject(Rejection::RailingExceedsPerimeter {
            requested: requested as f64,
            available: available_perimeter(config),
        }));
    }
    Ok(applied)
}

/// Change quantity and/or parameters of an existing accessory.
///
/// A railing edit that would overflow the free perimeter is rejected rather
/// than auto-fitted.
pub fn apply_accessory_update(
    config: &Configuration,
    id: AccessoryId,
    patch: AccessoryPatch,
) -> Result<Applied, Rejection> {
    let current = *config
        .accessory(id)
        .ok_or_else(|| reject(Rejection::UnknownAccessory(id)))?;
    let kind = patch.kind.unwrap_or(current.kind);
    let quantity = patch.quantity.unwrap_or(current.quantity);

    if !kind.same_kind(&current.kind) {
        return Err(reject(Rejection::KindMismatch {
            expected: current.kind.name(),
            found: kind.name(),
        }));
    }
    check_accessory(&kind, quantity).map_err(reject)?;
    if kind.is_corner_stair() {
        if !current.is_corner_stair() && config.has_corner_stair() {
            return Err(reject(Rejection::SecondCornerStair));
        }
        if quantity != 1 {
            return Err(reject(Rejection::CornerStairQuantity {
                requested: quantity,
            }));
        }
    }

    // Loaded records may repeat an id; only the entry `accessory(id)` found changes.
    let mut accessories = config.accessories().to_vec();
    if let Some(slot) = accessories.iter_mut().find(|a| a.id == id) {
        *slot = Accessory {
            quantity,
            kind,
            ..*slot
        };
    }
    let candidate = config.with_accessories(accessories);
    log::debug!("updating {} accessory {}", kind.name(), id);

    if kind.is_railing() {
        check_railing_fit(&candidate)?;
        return Ok(Applied {
            config: candidate,
            note: None,
        });
    }
    Ok(reconcile(candidate))
}

/// Remove an accessory. Unknown ids leave the configuration unchanged.
///
/// Removing the corner stair also removes the extension, which can shrink
/// the free perimeter; auto-fit runs in that case.
pub fn apply_accessory_remove(config: &Configuration, id: AccessoryId) -> Applied {
    if config.accessory(id).is_none() {
        log::debug!("remove: no accessory {}", id);
        return Applied {
            config: config.clone(),
            note: None,
        };
    }
    let mut accessories = config.accessories().to_vec();
    if let Some(pos) = accessories.iter().position(|a| a.id == id) {
        accessories.remove(pos);
    }
    reconcile(config.with_accessories(accessories))
}

/// Resize the platform. Railings are auto-fitted to the new perimeter.
pub fn apply_dimensions(
    config: &Configuration,
    length: u32,
    width: u32,
    height: u32,
) -> Result<Applied, Rejection> {
    let candidate = config
        .with_dimensions(length, width, height)
        .map_err(|e| reject(e.into()))?;
    Ok(reconcile(candidate))
}

/// Change the load class. Occupancy does not depend on it.
pub fn apply_load_class(config: &Configuration, load_class: LoadClass) -> Applied {
    Applied {
        config: config.with_load_class(load_class),
        note: None,
    }
}

fn check_accessory(kind: &AccessoryKind, quantity: u32) -> Result<(), Rejection> {
    if quantity == 0 {
        return Err(Rejection::ZeroQuantity);
    }
    if let AccessoryKind::Railing {
        segment_length_meters,
    } = kind
    {
        if *segment_length_meters < 1 {
            return Err(Rejection::RailingTooShort);
        }
    }
    Ok(())
}

fn check_railing_fit(candidate: &Configuration) -> Result<(), Rejection> {
    let requested = requested_railing_mm(candidate.accessories());
    let available = available_perimeter_mm(candidate);
    if requested > available {
        return Err(reject(Rejection::RailingExceedsPerimeter {
            requested: mm_to_m(requested),
            available: mm_to_m(available),
        }));
    }
    Ok(())
}

/// Run auto-fit on a candidate snapshot and wrap the result.
fn reconcile(candidate: Configuration) -> Applied {
    let available = available_perimeter_mm(&candidate);
    let fit = auto_fit_mm(candidate.accessories(), available);
    if !fit.changed() {
        return Applied {
            config: candidate,
            note: None,
        };
    }
    let note = AdjustmentNote {
        reduced_meters: fit.reduced_meters(),
        removed: fit.removed,
        shrunk: fit.shrunk,
    };
    log::info!("{}", note);
    Applied {
        config: candidate.with_accessories(fit.accessories),
        note: Some(note),
    }
}

fn reject(rejection: Rejection) -> Rejection {
    log::warn!("mutation rejected: {}", rejection);
    rejection
}
