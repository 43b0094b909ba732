//! Accessories that attach to the platform perimeter.
//!
//! Each accessory carries a unique id, a unit quantity and a kind. The kind
//! is a sum type so a railing can never carry a stair variant and a gate can
//! never carry a segment length.
//!
//! ```
//! use mezzanine_logic::accessory::{AccessoryKind, GateOpening, StairVariant};
//!
//! let stair = AccessoryKind::Stair { variant: StairVariant::Corner1200 };
//! assert!(stair.is_corner_stair());
//! let gate = AccessoryKind::PalletGate { opening_width: GateOpening::W2500 };
//! assert_eq!(gate.name(), "palletGate");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::MM_PER_M;

/// Stable identifier of an accessory within one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessoryId(pub u32);

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Staircase models offered by the configurator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StairVariant {
    #[serde(rename = "straight-1m")]
    Straight1000,
    #[serde(rename = "straight-1.5m")]
    Straight1500,
    #[serde(rename = "straight-2m")]
    Straight2000,
    /// Corner stair; brings the extension platform with it.
    #[serde(rename = "corner-1m")]
    Corner1000,
    #[serde(rename = "corner-1.2m")]
    Corner1200,
}

impl StairVariant {
    pub const ALL: [StairVariant; 5] = [
        Self::Straight1000,
        Self::Straight1500,
        Self::Straight2000,
        Self::Corner1000,
        Self::Corner1200,
    ];

    pub fn is_corner(self) -> bool {
        matches!(self, Self::Corner1000 | Self::Corner1200)
    }

    /// Identifier used in persisted records and exports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Straight1000 => "straight-1m",
            Self::Straight1500 => "straight-1.5m",
            Self::Straight2000 => "straight-2m",
            Self::Corner1000 => "corner-1m",
            Self::Corner1200 => "corner-1.2m",
        }
    }
}

impl fmt::Display for StairVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a persisted gate width is not one of the catalogue sizes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported pallet gate opening: {0} mm (expected 2000, 2500 or 3000)")]
pub struct UnsupportedGateWidth(pub u32);

/// Nominal clear opening of a pallet gate. Serialized as millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum GateOpening {
    W2000,
    W2500,
    W3000,
}

impl GateOpening {
    pub const ALL: [GateOpening; 3] = [Self::W2000, Self::W2500, Self::W3000];

    pub fn millimeters(self) -> u32 {
        match self {
            Self::W2000 => 2000,
            Self::W2500 => 2500,
            Self::W3000 => 3000,
        }
    }

    pub fn meters(self) -> f64 {
        self.millimeters() as f64 / MM_PER_M as f64
    }
}

impl TryFrom<u32> for GateOpening {
    type Error = UnsupportedGateWidth;

    fn try_from(mm: u32) -> Result<Self, Self::Error> {
        match mm {
            2000 => Ok(Self::W2000),
            2500 => Ok(Self::W2500),
            3000 => Ok(Self::W3000),
            other => Err(UnsupportedGateWidth(other)),
        }
    }
}

impl From<GateOpening> for u32 {
    fn from(opening: GateOpening) -> Self {
        opening.millimeters()
    }
}

/// What an accessory is, with the parameters only that kind carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AccessoryKind {
    Stair {
        variant: StairVariant,
    },
    /// Per-unit length in whole meters; consumed length is `segment × quantity`.
    #[serde(rename_all = "camelCase")]
    Railing {
        segment_length_meters: u32,
    },
    #[serde(rename_all = "camelCase")]
    PalletGate {
        opening_width: GateOpening,
    },
}

impl AccessoryKind {
    /// Kind tag as it appears in persisted records.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stair { .. } => "stair",
            Self::Railing { .. } => "railing",
            Self::PalletGate { .. } => "palletGate",
        }
    }

    pub fn same_kind(&self, other: &AccessoryKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn is_corner_stair(&self) -> bool {
        matches!(self, Self::Stair { variant } if variant.is_corner())
    }

    pub fn is_straight_stair(&self) -> bool {
        matches!(self, Self::Stair { variant } if !variant.is_corner())
    }

    pub fn is_railing(&self) -> bool {
        matches!(self, Self::Railing { .. })
    }
}

/// One line of the accessory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Accessory {
    pub id: AccessoryId,
    pub quantity: u32,
    #[serde(flatten)]
    pub kind: AccessoryKind,
}

impl Accessory {
    pub fn new(id: AccessoryId, kind: AccessoryKind, quantity: u32) -> Self {
        Self { id, quantity, kind }
    }

    pub fn is_corner_stair(&self) -> bool {
        self.kind.is_corner_stair()
    }

    /// Total railing length in whole meters, `None` for other kinds.
    pub fn railing_meters(&self) -> Option<u64> {
        match self.kind {
            AccessoryKind::Railing {
                segment_length_meters,
            } => Some(segment_length_meters as u64 * self.quantity as u64),
            _ => None,
        }
    }

    /// Human-readable line for quotes and exports.
    pub fn describe(&self) -> String {
        match self.kind {
            AccessoryKind::Stair { variant } => format!("{} × stair {}", self.quantity, variant),
            AccessoryKind::Railing {
                segment_length_meters,
            } => format!(
                "{} × railing {} m",
                self.quantity, segment_length_meters
            ),
            AccessoryKind::PalletGate { opening_width } => format!(
                "{} × pallet gate {} mm",
                self.quantity,
                opening_width.millimeters()
            ),
        }
    }
}

/// Sum of all railing lengths in whole meters.
pub fn total_railing_meters(accessories: &[Accessory]) -> u64 {
    accessories.iter().filter_map(Accessory::railing_meters).sum()
}
