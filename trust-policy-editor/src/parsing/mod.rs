//! Decoding of the trust policy document as IAM returns it

use crate::error::DecodeError;
use crate::types::PolicyDocument;

/// URL decode the policy document (IAM returns URL-encoded JSON) and parse it.
pub fn decode_policy_document(raw: &str) -> Result<PolicyDocument, DecodeError> {
    if raw.trim().is_empty() {
        return Err(DecodeError::Missing);
    }
    check_escapes(raw)?;
    let decoded = percent_encoding::percent_decode_str(raw).decode_utf8()?;
    Ok(serde_json::from_str(&decoded)?)
}

/// `percent_decode_str` leaves malformed escapes in place; reject them instead.
fn check_escapes(raw: &str) -> Result<(), DecodeError> {
    let bytes = raw.as_bytes();
    for (offset, _) in raw.match_indices('%') {
        let valid = bytes
            .get(offset + 1..offset + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(DecodeError::InvalidEscape { offset });
        }
    }
    Ok(())
}

/// Serialize a document into the compact JSON IAM accepts.
pub fn encode_policy_document(document: &PolicyDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string(document)
}
