//! Save/load of a configuration as a versioned JSON record.
//!
//! The store that holds the record is external and opaque; this module only
//! turns a [`Configuration`] into a string and back without loss.
//!
//! ```json
//! {
//!   "version": 1,
//!   "configuration": {
//!     "length": 9400, "width": 4000, "height": 3000, "loadClass": 350,
//!     "accessories": [
//!       { "id": 1, "quantity": 1, "kind": "stair", "variant": "corner-1.2m" },
//!       { "id": 2, "quantity": 2, "kind": "railing", "segmentLengthMeters": 5 }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::error::PersistError;

/// Version number for the record format (increment when the format changes).
pub const RECORD_VERSION: u32 = 1;

/// Serializable envelope around a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    pub version: u32,
    pub configuration: Configuration,
}

impl From<&Configuration> for ConfigurationRecord {
    fn from(config: &Configuration) -> Self {
        Self {
            version: RECORD_VERSION,
            configuration: config.clone(),
        }
    }
}

pub fn to_record_json(config: &Configuration) -> Result<String, PersistError> {
    Ok(serde_json::to_string(&ConfigurationRecord::from(config))?)
}

/// Parse a record. Accessory invariants are not checked here; run
/// [`crate::config::validate_config`] on the result.
pub fn from_record_json(json: &str) -> Result<Configuration, PersistError> {
    let record: ConfigurationRecord = serde_json::from_str(json)?;
    if record.version != RECORD_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: record.version,
            supported: RECORD_VERSION,
        });
    }
    log::debug!(
        "loaded configuration with {} accessories",
        record.configuration.accessories().len()
    );
    Ok(record.configuration)
}
