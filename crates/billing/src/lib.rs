//! Billing domain module: patients, billable services, and bills.

pub mod bill;
pub mod patient;
pub mod service;

pub use bill::{Bill, BillLine, BillStatus};
pub use patient::{Patient, PatientDraft};
pub use service::{Service, ServiceDraft};
