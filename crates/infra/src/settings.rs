use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clinistock_core::Location;

/// Fixed key of the single settings document.
pub const SETTINGS_DOC_ID: Uuid = Uuid::nil();

/// Clinic-wide configuration, stored as a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicSettings {
    pub name: String,
    pub currency_code: String,
    /// Location the low-stock screen opens on.
    pub low_stock_location_default: Location,
}

impl Default for ClinicSettings {
    fn default() -> Self {
        Self {
            name: "Clinic".to_string(),
            currency_code: "USD".to_string(),
            low_stock_location_default: Location::Dispensary,
        }
    }
}
