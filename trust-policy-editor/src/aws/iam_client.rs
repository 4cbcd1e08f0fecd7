//! AWS IAM client wrapper for trust policy operations

use crate::aws::{AwsError, AwsResult, IamErrorKind, IdentityApi};
use async_trait::async_trait;
use aws_sdk_iam::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_iam::Client as IamClient;

pub struct AwsIamClient {
    client: IamClient,
}

impl AwsIamClient {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }
}

/// Build an `AwsError` from any SDK error, classifying it by its IAM error code.
fn map_sdk_error<E>(operation: &'static str, err: E) -> AwsError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let kind = IamErrorKind::from_code(err.code());
    let message = err.message().map(str::to_string);
    let message = message.unwrap_or_else(|| DisplayErrorContext(err).to_string());
    AwsError::iam(operation, kind, message)
}

#[async_trait]
impl IdentityApi for AwsIamClient {
    async fn get_assume_role_policy(&self, role_name: &str) -> AwsResult<String> {
        let response = self
            .client
            .get_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| map_sdk_error("GetRole", e))?;

        // A role without a trust policy comes back as an empty string,
        // which decoding reports as a missing document.
        Ok(response
            .role()
            .and_then(|role| role.assume_role_policy_document())
            .unwrap_or_default()
            .to_string())
    }

    async fn update_assume_role_policy(
        &self,
        role_name: &str,
        policy_json: &str,
    ) -> AwsResult<()> {
        self.client
            .update_assume_role_policy()
            .role_name(role_name)
            .policy_document(policy_json)
            .send()
            .await
            .map_err(|e| map_sdk_error("UpdateAssumeRolePolicy", e))?;
        Ok(())
    }
}
