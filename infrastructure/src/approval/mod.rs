//! Approval adapters

mod policy;

pub use policy::PolicyApprover;
