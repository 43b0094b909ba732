//! Error types: rejected mutations, configuration problems, persistence.

use thiserror::Error;

use crate::accessory::AccessoryId;

/// Why a mutation was refused. The input configuration is never modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("a corner stair is already configured; only one is allowed")]
    SecondCornerStair,

    #[error("corner stair quantity is fixed at 1 (requested {requested})")]
    CornerStairQuantity { requested: u32 },

    #[error(
        "railings need {requested:.1} m but only {available:.1} m of perimeter is free"
    )]
    RailingExceedsPerimeter { requested: f64, available: f64 },

    #[error("no accessory with id {0}")]
    UnknownAccessory(AccessoryId),

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("railing segment length must be at least 1 m")]
    RailingTooShort,

    #[error("cannot turn a {expected} accessory into a {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

impl Rejection {
    /// Meters missing for the mutation to fit, where that applies.
    pub fn deficit(&self) -> Option<f64> {
        match self {
            Self::RailingExceedsPerimeter {
                requested,
                available,
            } => Some(requested - available),
            _ => None,
        }
    }
}

/// A problem found by [`crate::config::validate_config`] or while building a
/// configuration. Nothing is clamped; the caller decides what to do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be positive")]
    NonPositiveDimension { name: &'static str },

    #[error("{name} of {value} mm is outside {min}..={max} mm")]
    DimensionOutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("accessory {0} has quantity 0")]
    ZeroQuantity(AccessoryId),

    #[error("railing {0} has a segment shorter than 1 m")]
    RailingSegmentTooShort(AccessoryId),

    #[error("accessory id {0} is used more than once")]
    DuplicateId(AccessoryId),

    #[error("{0} corner stairs configured; at most one is allowed")]
    MultipleCornerStairs(usize),

    #[error("corner stair {id} has quantity {quantity}; it must be 1")]
    CornerStairQuantity { id: AccessoryId, quantity: u32 },

    #[error("railings total {requested:.1} m but only {available:.1} m of perimeter is free")]
    RailingsExceedPerimeter { requested: f64, available: f64 },
}

/// Failure to read or write a persisted record or price list.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deficit_only_for_perimeter_rejections() {
        let r = Rejection::RailingExceedsPerimeter {
            requested: 30.0,
            available: 26.8,
        };
        assert!((r.deficit().unwrap() - 3.2).abs() < 1e-9);
        assert_eq!(Rejection::SecondCornerStair.deficit(), None);
    }

    #[test]
    fn messages_carry_numeric_context() {
        let r = Rejection::RailingExceedsPerimeter {
            requested: 30.0,
            available: 26.8,
        };
        let msg = r.to_string();
        assert!(msg.contains("30.0"));
        assert!(msg.contains("26.8"));
    }

    #[test]
    fn config_error_converts_into_rejection() {
        let r: Rejection = ConfigError::NonPositiveDimension { name: "length" }.into();
        assert_eq!(r.to_string(), "length must be positive");
    }
}
