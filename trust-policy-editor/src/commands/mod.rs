//! Commands module - service layer for trust policy editing

mod edit;
pub(crate) mod service;

pub use service::TrustPolicyEditor;
