//! Trust Policy Editor Service Layer
//!
//! This module provides the service interface that encapsulates the fetch,
//! mutate and persist steps. The service holds an `IdentityApi` implementation
//! so the CLI talks to IAM while tests substitute an in-memory one.

use crate::aws::iam_client::AwsIamClient;
use crate::aws::{AwsError, AwsResult, IdentityApi};
use crate::types::AwsSettings;
use aws_sdk_iam::Client as IamClient;
use log::debug;

/// Main service struct that holds the IAM client and runs edits
pub struct TrustPolicyEditor<C = AwsIamClient> {
    pub(crate) iam: C,
}

impl TrustPolicyEditor<AwsIamClient> {
    /// Create a new editor backed by the AWS SDK
    ///
    /// The configuration is loaded using the default credential provider
    /// chain, with `settings` overriding region and profile when set.
    ///
    /// # Errors
    ///
    /// Returns an error if no region can be resolved.
    pub async fn new(settings: &AwsSettings) -> AwsResult<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let config = loader.load().await;

        let region = config.region().ok_or_else(|| {
            AwsError::ConfigError(
                "no AWS region configured; pass --region or set AWS_REGION".to_string(),
            )
        })?;
        debug!("Using AWS region {region}");

        Ok(Self::with_client(AwsIamClient::new(IamClient::new(&config))))
    }
}

impl<C: IdentityApi> TrustPolicyEditor<C> {
    /// Wrap an existing `IdentityApi` implementation
    pub fn with_client(iam: C) -> Self {
        Self { iam }
    }

    // fetch_policy(), add_principal(), persist_policy() and edit() are in edit.rs
}
