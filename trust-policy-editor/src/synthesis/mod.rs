//! Trust statement synthesis

pub mod trust_statement;

pub use trust_statement::{add_principal, build_trust_statement};
