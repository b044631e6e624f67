//! Role → permission policy.

use thiserror::Error;

use crate::permissions::Permission;
use crate::roles::Role;

/// Authorization failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("permission denied: {0}")]
    PermissionDenied(Permission),
}

/// Permissions granted to a role.
///
/// `admin` holds the wildcard. The other roles mirror the clinic's three
/// organizational units: pharmacists run the dispensary and billing,
/// storekeepers run the bulk store and procurement, cashiers only bill.
pub fn permissions_for_role(role: &Role) -> Vec<Permission> {
    match role.as_str() {
        "admin" => vec![Permission::new("*")],
        "pharmacist" => vec![
            Permission::new("catalog.items.read"),
            Permission::new("catalog.items.write"),
            Permission::new("inventory.stock.read"),
            Permission::new("inventory.stock.write"),
            Permission::new("inventory.orders.request"),
            Permission::new("billing.read"),
            Permission::new("billing.write"),
            Permission::new("procurement.read"),
        ],
        "storekeeper" => vec![
            Permission::new("catalog.items.read"),
            Permission::new("inventory.stock.read"),
            Permission::new("inventory.stock.write"),
            Permission::new("inventory.orders.fulfil"),
            Permission::new("vendors.read"),
            Permission::new("vendors.write"),
            Permission::new("procurement.read"),
            Permission::new("procurement.write"),
        ],
        "cashier" => vec![
            Permission::new("billing.read"),
            Permission::new("billing.write"),
        ],
        _ => Vec::new(),
    }
}

/// Check a role against a required permission.
pub fn authorize(role: &Role, required: &Permission) -> Result<(), AuthzError> {
    let granted = permissions_for_role(role);
    if granted.iter().any(|p| p.is_wildcard() || p == required) {
        return Ok(());
    }
    Err(AuthzError::PermissionDenied(required.clone()))
}
