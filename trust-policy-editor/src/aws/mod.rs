//! AWS SDK integration: IAM client wrapper, principal checks, provider error mapping.

pub mod iam_client;
pub mod principal;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Provider-neutral classification of an IAM failure.
///
/// The IAM adapter maps SDK error codes onto this enum so nothing outside
/// `aws::iam_client` needs to know about SDK error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IamErrorKind {
    NotFound,
    MalformedDocument,
    LimitExceeded,
    Unmodifiable,
    ServiceFailure,
    Unknown,
}

impl IamErrorKind {
    /// Map an IAM error code (as reported in the error metadata) to a kind.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("NoSuchEntity") => Self::NotFound,
            Some("MalformedPolicyDocument") => Self::MalformedDocument,
            Some("LimitExceeded") => Self::LimitExceeded,
            Some("UnmodifiableEntity") => Self::Unmodifiable,
            Some("ServiceFailure") => Self::ServiceFailure,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for IamErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "NoSuchEntity",
            Self::MalformedDocument => "MalformedPolicyDocument",
            Self::LimitExceeded => "LimitExceeded",
            Self::Unmodifiable => "UnmodifiableEntity",
            Self::ServiceFailure => "ServiceFailure",
            Self::Unknown => "Unknown AWS Error",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("AWS configuration error: {0}")]
    ConfigError(String),
    #[error("IAM {operation} failed ({kind}): {message}")]
    IamError {
        operation: &'static str,
        kind: IamErrorKind,
        message: String,
    },
}

impl AwsError {
    pub(crate) fn iam(
        operation: &'static str,
        kind: IamErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self::IamError {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// The provider-neutral kind, `Unknown` for configuration failures.
    pub fn kind(&self) -> IamErrorKind {
        match self {
            Self::IamError { kind, .. } => *kind,
            Self::ConfigError(_) => IamErrorKind::Unknown,
        }
    }
}

pub type AwsResult<T> = Result<T, AwsError>;

/// The two IAM calls the editor depends on.
///
/// `AwsIamClient` is the production implementation; tests substitute an
/// in-memory one.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Return the role's trust policy exactly as IAM reports it (URL-encoded JSON).
    async fn get_assume_role_policy(&self, role_name: &str) -> AwsResult<String>;

    /// Replace the role's trust policy with `policy_json`.
    async fn update_assume_role_policy(
        &self,
        role_name: &str,
        policy_json: &str,
    ) -> AwsResult<()>;
}
