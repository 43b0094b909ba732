//! Pure layout and pricing logic for the mezzanine configurator.
//!
//! This crate contains all configurator logic that is independent of any
//! UI, renderer, or storage. Functions take a plain [`Configuration`]
//! snapshot and return results, making them unit-testable and portable
//! across a web backend, native CLI tools, and the 3D preview.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`accessory`] | Stairs, railings and pallet gates as a tagged sum type |
//! | [`autofit`] | Shrinks/removes railings to fit the free perimeter |
//! | [`config`] | Configuration snapshot, load class, validation, summary |
//! | [`constants`] | Extension size, stair width, walker limits, UI ranges |
//! | [`error`] | Rejections, configuration errors, persistence errors |
//! | [`geometry`] | Perimeter math and the ordered edge loop |
//! | [`mutation`] | Add / update / remove / resize operations |
//! | [`occupancy`] | Stair and gate occupancy, available perimeter, openings |
//! | [`persistence`] | Versioned JSON record save/load |
//! | [`pricing`] | Area, load multiplier, accessory prices, financing |
//! | [`walker`] | Railing placement around the perimeter |
//!
//! ```
//! use mezzanine_logic::{
//!     apply_accessory_add, compute_available_perimeter, compute_pricing,
//!     compute_railing_placements, AccessoryKind, Configuration, StairVariant,
//! };
//!
//! let config = Configuration::default(); // 9400 × 4000 mm
//! assert!((compute_available_perimeter(&config) - 26.8).abs() < 1e-9);
//!
//! let stair = AccessoryKind::Stair { variant: StairVariant::Straight1000 };
//! let config = apply_accessory_add(&config, stair, 1).unwrap().config;
//! let railing = AccessoryKind::Railing { segment_length_meters: 5 };
//! let config = apply_accessory_add(&config, railing, 3).unwrap().config;
//!
//! assert!(compute_pricing(&config).price > 0.0);
//! assert!(compute_railing_placements(&config).is_complete());
//! ```

pub mod accessory;
pub mod autofit;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod mutation;
pub mod occupancy;
pub mod persistence;
pub mod pricing;
pub mod walker;

pub use accessory::{Accessory, AccessoryId, AccessoryKind, GateOpening, StairVariant};
pub use config::{Configuration, LoadClass};
pub use error::{ConfigError, PersistError, Rejection};
pub use mutation::{
    apply_accessory_add, apply_accessory_remove, apply_accessory_update, apply_dimensions,
    apply_load_class, compute_available_perimeter, AccessoryPatch, AdjustmentNote, Applied,
};
pub use pricing::{compute_pricing, Pricing};
pub use walker::{compute_railing_placements, Placement, RailingLayout};
