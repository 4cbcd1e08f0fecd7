//! Error types for trust policy editing

use crate::aws::{AwsError, IamErrorKind};
use thiserror::Error;

/// Language-neutral classification of every way an edit can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    MalformedDocument,
    LimitExceeded,
    Unmodifiable,
    ServiceFailure,
    /// URL or JSON decoding of the fetched document failed
    Decode,
    DuplicatePrincipal,
    UnknownProvider,
}

impl From<IamErrorKind> for ErrorKind {
    fn from(kind: IamErrorKind) -> Self {
        match kind {
            IamErrorKind::NotFound => Self::NotFound,
            IamErrorKind::MalformedDocument => Self::MalformedDocument,
            IamErrorKind::LimitExceeded => Self::LimitExceeded,
            IamErrorKind::Unmodifiable => Self::Unmodifiable,
            IamErrorKind::ServiceFailure => Self::ServiceFailure,
            IamErrorKind::Unknown => Self::UnknownProvider,
        }
    }
}

/// The principal is already trusted by some statement in the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("arn ({arn}) already trusted")]
pub struct DuplicatePrincipal {
    pub arn: String,
}

/// Failure turning IAM's URL-encoded document into a `PolicyDocument`.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("role has no trust policy document")]
    Missing,
    #[error("invalid URL escape at byte {offset} of policy document")]
    InvalidEscape { offset: usize },
    #[error("Failed to URL decode policy document: {0}")]
    Url(#[from] std::str::Utf8Error),
    #[error("Failed to parse policy document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Editor-level error. Each variant names the stage that failed.
#[derive(Error, Debug)]
pub enum TrustPolicyError {
    #[error("Fetching trust policy for role '{role_name}'")]
    Fetch {
        role_name: String,
        #[source]
        source: AwsError,
    },
    #[error("Decoding trust policy for role '{role_name}'")]
    Decode {
        role_name: String,
        #[source]
        source: DecodeError,
    },
    #[error("Adding ARN to document: arn ({arn}) already trusted by role ({role_name})")]
    DuplicatePrincipal { role_name: String, arn: String },
    #[error("Converting document into JSON")]
    Encode(#[source] serde_json::Error),
    #[error("Updating trust policy for role '{role_name}'")]
    Persist {
        role_name: String,
        #[source]
        source: AwsError,
    },
}

impl TrustPolicyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch { source, .. } | Self::Persist { source, .. } => source.kind().into(),
            Self::Decode { .. } => ErrorKind::Decode,
            Self::DuplicatePrincipal { .. } => ErrorKind::DuplicatePrincipal,
            Self::Encode(_) => ErrorKind::MalformedDocument,
        }
    }

    pub(crate) fn duplicate(role_name: impl Into<String>, dup: DuplicatePrincipal) -> Self {
        Self::DuplicatePrincipal {
            role_name: role_name.into(),
            arn: dup.arn,
        }
    }
}

pub type TrustPolicyResult<T> = Result<T, TrustPolicyError>;
