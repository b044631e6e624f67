//! Vendor (supplier) domain module.

pub mod vendor;

pub use vendor::{ContactInfo, Vendor, VendorDraft};
