//! Builds the statement that grants a principal `sts:AssumeRole`.

use crate::error::DuplicatePrincipal;
use crate::types::{PolicyDocument, PolicyPrincipal, PolicyStatement};
use serde_json::Map;

pub const ASSUME_ROLE_ACTION: &str = "sts:AssumeRole";

/// `{Allow, sts:AssumeRole, {AWS: arn}}`
pub fn build_trust_statement(principal_arn: &str) -> PolicyStatement {
    PolicyStatement {
        action: ASSUME_ROLE_ACTION.into(),
        effect: "Allow".to_string(),
        principal: PolicyPrincipal::aws(principal_arn),
        extra: Map::new(),
    }
}

/// Append a trust statement for `principal_arn` to the end of the document.
///
/// Fails without touching the document when the ARN is already trusted.
pub fn add_principal(
    document: &mut PolicyDocument,
    principal_arn: &str,
) -> Result<(), DuplicatePrincipal> {
    document.add_statement(build_trust_statement(principal_arn))
}
