use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier.
///
/// Roles are opaque strings at this layer; the mapping to permissions lives
/// in [`crate::policy`]. The clinic's conventional roles are `admin`,
/// `pharmacist`, `storekeeper` and `cashier`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn admin() -> Self {
        Self::new("admin")
    }

    pub fn pharmacist() -> Self {
        Self::new("pharmacist")
    }

    pub fn storekeeper() -> Self {
        Self::new("storekeeper")
    }

    pub fn cashier() -> Self {
        Self::new("cashier")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
