//! Trust policy document model and editor request/outcome types

use crate::error::DuplicatePrincipal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A string-or-list value, as IAM accepts for `Action` and principal entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Single(String),
    Multiple(Vec<String>),
}

impl OneOrMany {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Single(s) => s == value,
            Self::Multiple(values) => values.iter().any(|v| v == value),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            Self::Single(s) => std::slice::from_ref(s),
            Self::Multiple(values) => values,
        };
        values.iter().map(String::as_str)
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

/// The full trust policy attached to a role.
///
/// Keys this model does not name are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version", default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One trust rule: who may assume the role, doing what.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyStatement {
    #[serde(rename = "Action")]
    pub action: OneOrMany,
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(
        rename = "Principal",
        default,
        skip_serializing_if = "PolicyPrincipal::is_empty"
    )]
    pub principal: PolicyPrincipal,
    /// `Sid`, `Condition` and anything else IAM attaches to the statement
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyPrincipal {
    #[serde(rename = "Service", default, skip_serializing_if = "Option::is_none")]
    pub service: Option<OneOrMany>,
    #[serde(rename = "AWS", default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<OneOrMany>,
    /// `Federated`, `CanonicalUser`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PolicyPrincipal {
    pub fn aws(arn: &str) -> Self {
        Self {
            aws: Some(arn.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.service.is_none() && self.aws.is_none() && self.extra.is_empty()
    }

    pub fn trusts_aws(&self, arn: &str) -> bool {
        self.aws.as_ref().is_some_and(|aws| aws.contains(arn))
    }
}

impl PolicyDocument {
    /// True if some statement already names `arn` as an AWS principal.
    pub fn trusts(&self, arn: &str) -> bool {
        self.statement.iter().any(|s| s.principal.trusts_aws(arn))
    }

    /// Append `statement` unless one of its AWS principals is already trusted.
    ///
    /// On error the document is left untouched.
    pub fn add_statement(
        &mut self,
        statement: PolicyStatement,
    ) -> Result<(), DuplicatePrincipal> {
        if let Some(aws) = &statement.principal.aws {
            if let Some(arn) = aws.iter().find(|arn| self.trusts(arn)) {
                return Err(DuplicatePrincipal {
                    arn: arn.to_string(),
                });
            }
        }
        self.statement.push(statement);
        Ok(())
    }
}

/// What to edit, built from command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub role_name: String,
    pub principal_arn: String,
    /// Fetch and mutate only; never call the update API
    pub dry_run: bool,
}

impl EditRequest {
    pub fn new(role_name: impl Into<String>, principal_arn: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
            principal_arn: principal_arn.into(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Overrides for the AWS SDK's default configuration chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
}

/// Result of a successful edit
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub role_name: String,
    pub principal_arn: String,
    pub statement_count: usize,
    pub document: PolicyDocument,
    pub persisted: bool,
}
