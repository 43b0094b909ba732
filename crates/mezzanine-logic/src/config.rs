//! Platform configuration — the root aggregate the caller owns.
//!
//! A [`Configuration`] is an immutable snapshot: dimensions, load class and
//! the ordered accessory list. Operations in [`crate::mutation`] take a
//! snapshot and return a new one; nothing hands out a mutable view of the
//! accessories.
//!
//! # Configuration Flow
//!
//! 1. Caller starts from [`Configuration::default`] or [`Configuration::new`]
//! 2. Adds, updates and removes accessories through [`crate::mutation`]
//! 3. Reads derived values: [`summarize`], [`crate::pricing::compute_pricing`]
//! 4. Hands placements to the renderer via [`crate::walker::compute_railing_placements`]
//!
//! ```
//! use mezzanine_logic::config::{validate_config, Configuration, LoadClass};
//!
//! let config = Configuration::new(9400, 4000, 3000, LoadClass::Medium).unwrap();
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::accessory::{total_railing_meters, Accessory, AccessoryId, AccessoryKind};
use crate::constants::limits;
use crate::error::ConfigError;
use crate::{geometry, occupancy};

/// Returned when a persisted load class is not one of the rated values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported load class: {0} kg/m² (expected 250, 350 or 500)")]
pub struct UnsupportedLoadClass(pub u32);

/// Rated floor load. Serialized as kg/m².
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum LoadClass {
    /// 250 kg/m²
    Light,
    /// 350 kg/m²
    Medium,
    /// 500 kg/m²
    Heavy,
}

impl LoadClass {
    pub const ALL: [LoadClass; 3] = [Self::Light, Self::Medium, Self::Heavy];

    pub fn kg_per_m2(self) -> u32 {
        match self {
            Self::Light => 250,
            Self::Medium => 350,
            Self::Heavy => 500,
        }
    }
}

impl TryFrom<u32> for LoadClass {
    type Error = UnsupportedLoadClass;

    fn try_from(kg: u32) -> Result<Self, Self::Error> {
        match kg {
            250 => Ok(Self::Light),
            350 => Ok(Self::Medium),
            500 => Ok(Self::Heavy),
            other => Err(UnsupportedLoadClass(other)),
        }
    }
}

impl From<LoadClass> for u32 {
    fn from(class: LoadClass) -> Self {
        class.kg_per_m2()
    }
}

impl fmt::Display for LoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kg/m²", self.kg_per_m2())
    }
}

/// Dimensions in millimeters, load class, and accessories in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    length: u32,
    width: u32,
    height: u32,
    load_class: LoadClass,
    #[serde(default)]
    accessories: Vec<Accessory>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            length: 9400,
            width: 4000,
            height: 3000,
            load_class: LoadClass::Medium,
            accessories: Vec::new(),
        }
    }
}

impl Configuration {
    /// An empty platform. Every dimension must be positive.
    pub fn new(
        length: u32,
        width: u32,
        height: u32,
        load_class: LoadClass,
    ) -> Result<Self, ConfigError> {
        check_positive(length, width, height)?;
        Ok(Self {
            length,
            width,
            height,
            load_class,
            accessories: Vec::new(),
        })
    }

    /// Assemble a snapshot without checking accessory invariants.
    ///
    /// Use this for records coming from outside the engine, then run
    /// [`validate_config`] on the result.
    pub fn from_parts(
        length: u32,
        width: u32,
        height: u32,
        load_class: LoadClass,
        accessories: Vec<Accessory>,
    ) -> Self {
        Self {
            length,
            width,
            height,
            load_class,
            accessories,
        }
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn load_class(&self) -> LoadClass {
        self.load_class
    }

    pub fn accessories(&self) -> &[Accessory] {
        &self.accessories
    }

    pub fn accessory(&self, id: AccessoryId) -> Option<&Accessory> {
        self.accessories.iter().find(|a| a.id == id)
    }

    /// The extension platform exists iff this returns true.
    pub fn has_corner_stair(&self) -> bool {
        self.accessories.iter().any(Accessory::is_corner_stair)
    }

    pub fn corner_stair(&self) -> Option<&Accessory> {
        self.accessories.iter().find(|a| a.is_corner_stair())
    }

    /// Requested railing length in whole meters.
    pub fn railing_meters(&self) -> u64 {
        total_railing_meters(&self.accessories)
    }

    /// Smallest id greater than every id in use, or the smallest unused id
    /// once `u32::MAX` is taken.
    pub fn next_id(&self) -> AccessoryId {
        let max = self.accessories.iter().map(|a| a.id.0).max().unwrap_or(0);
        match max.checked_add(1) {
            Some(next) => AccessoryId(next),
            None => {
                let used: HashSet<u32> = self.accessories.iter().map(|a| a.id.0).collect();
                let free = (1..=u32::MAX).find(|n| !used.contains(n)).unwrap_or(0);
                AccessoryId(free)
            }
        }
    }

    pub(crate) fn with_accessories(&self, accessories: Vec<Accessory>) -> Self {
        Self {
            accessories,
            ..self.clone()
        }
    }

    pub(crate) fn with_dimensions(
        &self,
        length: u32,
        width: u32,
        height: u32,
    ) -> Result<Self, ConfigError> {
        check_positive(length, width, height)?;
        Ok(Self {
            length,
            width,
            height,
            ..self.clone()
        })
    }

    pub(crate) fn with_load_class(&self, load_class: LoadClass) -> Self {
        Self {
            load_class,
            ..self.clone()
        }
    }
}

fn check_positive(length: u32, width: u32, height: u32) -> Result<(), ConfigError> {
    for (name, value) in [("length", length), ("width", width), ("height", height)] {
        if value == 0 {
            return Err(ConfigError::NonPositiveDimension { name });
        }
    }
    Ok(())
}

/// Validate a configuration, returning all problems found.
pub fn validate_config(config: &Configuration) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let dims = [
        ("length", config.length, limits::LENGTH_MIN_MM, limits::LENGTH_MAX_MM),
        ("width", config.width, limits::WIDTH_MIN_MM, limits::WIDTH_MAX_MM),
        ("height", config.height, limits::HEIGHT_MIN_MM, limits::HEIGHT_MAX_MM),
    ];
    for (name, value, min, max) in dims {
        if value == 0 {
            errors.push(ConfigError::NonPositiveDimension { name });
        } else if !(min..=max).contains(&value) {
            errors.push(ConfigError::DimensionOutOfRange {
                name,
                value,
                min,
                max,
            });
        }
    }

    let mut seen = HashSet::new();
    for a in &config.accessories {
        if !seen.insert(a.id) {
            errors.push(ConfigError::DuplicateId(a.id));
        }
        if a.quantity == 0 {
            errors.push(ConfigError::ZeroQuantity(a.id));
        }
        if let AccessoryKind::Railing {
            segment_length_meters: 0,
        } = a.kind
        {
            errors.push(ConfigError::RailingSegmentTooShort(a.id));
        }
        if a.is_corner_stair() && a.quantity != 1 {
            errors.push(ConfigError::CornerStairQuantity {
                id: a.id,
                quantity: a.quantity,
            });
        }
    }

    let corners = config
        .accessories
        .iter()
        .filter(|a| a.is_corner_stair())
        .count();
    if corners > 1 {
        errors.push(ConfigError::MultipleCornerStairs(corners));
    }

    let requested = config.railing_meters() as f64;
    let available = occupancy::available_perimeter(config);
    if requested > available {
        errors.push(ConfigError::RailingsExceedPerimeter {
            requested,
            available,
        });
    }

    errors
}

/// Derived figures for the configurator's side panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    /// Floor area including the extension, m².
    pub area_m2: f64,
    /// Perimeter including the extension's net gain, m.
    pub perimeter_m: f64,
    /// Perimeter left for railings after stairs and gates, m.
    pub available_perimeter_m: f64,
    /// Railing length currently configured, m.
    pub railing_m: u64,
    /// Railing length that could still be added, m.
    pub free_railing_m: f64,
    pub has_extension: bool,
    pub straight_stairs: u32,
    pub corner_stairs: u32,
    pub pallet_gates: u32,
    pub railing_units: u32,
}

/// Summarize a configuration for display.
pub fn summarize(config: &Configuration) -> ConfigSummary {
    let has_extension = config.has_corner_stair();
    let available = occupancy::available_perimeter(config);
    let railing_m = config.railing_meters();

    let count = |pred: fn(&AccessoryKind) -> bool| -> u32 {
        config
            .accessories
            .iter()
            .filter(|a| pred(&a.kind))
            .map(|a| a.quantity)
            .sum()
    };

    ConfigSummary {
        area_m2: geometry::floor_area(config.length, config.width, has_extension),
        perimeter_m: geometry::perimeter(config.length, config.width, has_extension),
        available_perimeter_m: available,
        railing_m,
        free_railing_m: (available - railing_m as f64).max(0.0),
        has_extension,
        straight_stairs: count(AccessoryKind::is_straight_stair),
        corner_stairs: count(AccessoryKind::is_corner_stair),
        pallet_gates: count(|k| matches!(k, AccessoryKind::PalletGate { .. })),
        railing_units: count(AccessoryKind::is_railing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::{GateOpening, StairVariant};

    fn stair(id: u32, variant: StairVariant, quantity: u32) -> Accessory {
        Accessory::new(AccessoryId(id), AccessoryKind::Stair { variant }, quantity)
    }

    fn railing(id: u32, segment: u32, quantity: u32) -> Accessory {
        Accessory::new(
            AccessoryId(id),
            AccessoryKind::Railing {
                segment_length_meters: segment,
            },
            quantity,
        )
    }

    #[test]
    fn default_config_is_valid() {
        let config = Configuration::default();
        let errors = validate_config(&config);
        assert!(errors.is_empty(), "default config should be valid: {errors:?}");
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert_eq!(
            Configuration::new(0, 4000, 3000, LoadClass::Light),
            Err(ConfigError::NonPositiveDimension { name: "length" })
        );
        assert_eq!(
            Configuration::new(9400, 4000, 0, LoadClass::Light),
            Err(ConfigError::NonPositiveDimension { name: "height" })
        );
    }

    #[test]
    fn out_of_range_dimensions_are_reported_not_clamped() {
        let config = Configuration::new(25000, 1500, 3000, LoadClass::Heavy).unwrap();
        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::DimensionOutOfRange { name: "length", value: 25000, .. }
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::DimensionOutOfRange { name: "width", value: 1500, .. }
        )));
        assert_eq!(config.length(), 25000);
    }

    #[test]
    fn accessory_problems_are_all_reported() {
        let config = Configuration::from_parts(
            9400,
            4000,
            3000,
            LoadClass::Medium,
            vec![
                stair(1, StairVariant::Corner1000, 2),
                stair(2, StairVariant::Corner1200, 1),
                railing(2, 0, 1),
                railing(3, 5, 0),
            ],
        );
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::MultipleCornerStairs(2)));
        assert!(errors.contains(&ConfigError::CornerStairQuantity {
            id: AccessoryId(1),
            quantity: 2
        }));
        assert!(errors.contains(&ConfigError::DuplicateId(AccessoryId(2))));
        assert!(errors.contains(&ConfigError::RailingSegmentTooShort(AccessoryId(2))));
        assert!(errors.contains(&ConfigError::ZeroQuantity(AccessoryId(3))));
    }

    #[test]
    fn railing_overflow_is_reported() {
        let config = Configuration::from_parts(
            9400,
            4000,
            3000,
            LoadClass::Medium,
            vec![railing(1, 10, 3)],
        );
        let errors = validate_config(&config);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::RailingsExceedPerimeter { .. })));
    }

    #[test]
    fn next_id_skips_past_largest() {
        let config = Configuration::from_parts(
            9400,
            4000,
            3000,
            LoadClass::Medium,
            vec![railing(4, 1, 1), railing(2, 1, 1)],
        );
        assert_eq!(config.next_id(), AccessoryId(5));
        assert_eq!(Configuration::default().next_id(), AccessoryId(1));
    }

    #[test]
    fn load_class_parses_rated_values_only() {
        for class in LoadClass::ALL {
            assert_eq!(LoadClass::try_from(class.kg_per_m2()), Ok(class));
        }
        assert_eq!(LoadClass::try_from(400), Err(UnsupportedLoadClass(400)));
    }

    #[test]
    fn summary_counts_units_and_extension() {
        let config = Configuration::from_parts(
            9400,
            4000,
            3000,
            LoadClass::Medium,
            vec![
                stair(1, StairVariant::Straight1000, 2),
                Accessory::new(
                    AccessoryId(2),
                    AccessoryKind::PalletGate {
                        opening_width: GateOpening::W2000,
                    },
                    1,
                ),
                railing(3, 4, 2),
            ],
        );
        let summary = summarize(&config);
        assert!(!summary.has_extension);
        assert_eq!(summary.straight_stairs, 2);
        assert_eq!(summary.pallet_gates, 1);
        assert_eq!(summary.railing_units, 2);
        assert_eq!(summary.railing_m, 8);
        // 26.8 - 2 × 1.0 - 2.0
        assert!((summary.available_perimeter_m - 22.8).abs() < 1e-9);
        assert!((summary.free_railing_m - 14.8).abs() < 1e-9);
        assert!((summary.area_m2 - 37.6).abs() < 1e-9);
    }

    #[test]
    fn summary_with_corner_stair_includes_extension() {
        let config = Configuration::from_parts(
            9400,
            4000,
            3000,
            LoadClass::Medium,
            vec![stair(1, StairVariant::Corner1200, 1)],
        );
        let summary = summarize(&config);
        assert!(summary.has_extension);
        assert_eq!(summary.corner_stairs, 1);
        assert!((summary.area_m2 - 41.8).abs() < 1e-9);
        assert!((summary.perimeter_m - 32.6).abs() < 1e-9);
        assert_eq!(summary.available_perimeter_m, 32.0);
    }
}
