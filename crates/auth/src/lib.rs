//! Roles, permissions and the role → permission policy.
//!
//! Authorization is enforced at the API boundary; domain crates stay
//! auth-agnostic.

pub mod permissions;
pub mod policy;
pub mod roles;
pub mod user;

pub use permissions::Permission;
pub use policy::{AuthzError, authorize, permissions_for_role};
pub use roles::Role;
pub use user::User;
