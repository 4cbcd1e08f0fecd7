//! This crate provides the core logic for editing an IAM role's trust policy:
//! - Trust policy document model (lossless JSON round-trip)
//! - Idempotent add-principal mutation
//! - IAM read/write through the `IdentityApi` seam, with provider errors
//!   mapped to a neutral `ErrorKind`
//!

pub mod aws;
pub mod commands;
mod error;
mod parsing;
mod synthesis;
mod types;

// Re-exports for a small, focused public API
pub use aws::iam_client::AwsIamClient;
pub use aws::principal::{classify_principal, extract_account_from_arn, PrincipalShape};
pub use aws::{AwsError, AwsResult, IamErrorKind, IdentityApi};
pub use commands::TrustPolicyEditor;
pub use error::{
    DecodeError, DuplicatePrincipal, ErrorKind, TrustPolicyError, TrustPolicyResult,
};
pub use parsing::{decode_policy_document, encode_policy_document};
pub use synthesis::{add_principal, build_trust_statement};
pub use types::{
    AwsSettings, EditOutcome, EditRequest, OneOrMany, PolicyDocument, PolicyPrincipal,
    PolicyStatement,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_principal_to_decoded_document() {
        let encoded = "%7B%22Version%22%3A%222012-10-17%22%2C%22Statement%22%3A%5B%7B%22Action%22%3A%22sts%3AAssumeRole%22%2C%22Effect%22%3A%22Allow%22%2C%22Principal%22%3A%7B%22AWS%22%3A%22arn%3Aaws%3Aiam%3A%3A111%3Arole%2FA%22%7D%7D%5D%7D";
        let mut doc = decode_policy_document(encoded).expect("should decode");
        add_principal(&mut doc, "arn:aws:iam::111:role/B").expect("should add");
        assert_eq!(
            encode_policy_document(&doc).expect("should encode"),
            r#"{"Version":"2012-10-17","Statement":[{"Action":"sts:AssumeRole","Effect":"Allow","Principal":{"AWS":"arn:aws:iam::111:role/A"}},{"Action":"sts:AssumeRole","Effect":"Allow","Principal":{"AWS":"arn:aws:iam::111:role/B"}}]}"#
        );
    }
}
