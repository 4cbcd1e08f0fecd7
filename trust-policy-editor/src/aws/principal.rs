//! Lightweight checks on the principal being granted trust.

/// What a principal string looks like before IAM sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalShape {
    /// `arn:<partition>:<service>:<region>:<account>:<resource>`
    Arn { account_id: Option<String> },
    /// A bare 12-digit account ID.
    AccountId,
    /// The `*` wildcard (anyone).
    Wildcard,
    Unrecognized,
}

impl PrincipalShape {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

/// Classify a principal string. IAM remains the authority on validity; this
/// only feeds warnings and debug logging.
pub fn classify_principal(principal: &str) -> PrincipalShape {
    if principal == "*" {
        return PrincipalShape::Wildcard;
    }
    if is_account_id(principal) {
        return PrincipalShape::AccountId;
    }
    let parts: Vec<&str> = principal.splitn(6, ':').collect();
    if parts.len() == 6 && parts[0] == "arn" && !parts[1].is_empty() && !parts[5].is_empty() {
        return PrincipalShape::Arn {
            account_id: extract_account_from_arn(principal),
        };
    }
    PrincipalShape::Unrecognized
}

/// Extract 12-digit account ID from ARN (field 5 in colon-delimited format)
pub fn extract_account_from_arn(arn: &str) -> Option<String> {
    let parts: Vec<&str> = arn.split(':').collect();
    if parts.len() >= 6 && is_account_id(parts[4]) {
        return Some(parts[4].to_string());
    }
    None
}

fn is_account_id(s: &str) -> bool {
    s.len() == 12 && s.chars().all(|c| c.is_ascii_digit())
}
