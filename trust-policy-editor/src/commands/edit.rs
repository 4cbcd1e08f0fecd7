//! Fetch, mutate and persist logic for the trust policy editor

use crate::aws::principal::{classify_principal, PrincipalShape};
use crate::aws::IdentityApi;
use crate::error::{TrustPolicyError, TrustPolicyResult};
use crate::parsing::{decode_policy_document, encode_policy_document};
use crate::synthesis;
use crate::types::{EditOutcome, EditRequest, PolicyDocument};
use log::{debug, info, warn};

impl<C: IdentityApi> super::service::TrustPolicyEditor<C> {
    /// Fetch and decode the role's current trust policy.
    pub async fn fetch_policy(&self, role_name: &str) -> TrustPolicyResult<PolicyDocument> {
        let raw = self
            .iam
            .get_assume_role_policy(role_name)
            .await
            .map_err(|source| TrustPolicyError::Fetch {
                role_name: role_name.to_string(),
                source,
            })?;

        decode_policy_document(&raw).map_err(|source| TrustPolicyError::Decode {
            role_name: role_name.to_string(),
            source,
        })
    }

    /// Append a trust statement for `principal_arn`; fails if it is already trusted.
    pub fn add_principal(
        &self,
        role_name: &str,
        document: &mut PolicyDocument,
        principal_arn: &str,
    ) -> TrustPolicyResult<()> {
        synthesis::add_principal(document, principal_arn)
            .map_err(|dup| TrustPolicyError::duplicate(role_name, dup))
    }

    /// Replace the role's trust policy with `document`.
    pub async fn persist_policy(
        &self,
        role_name: &str,
        document: &PolicyDocument,
    ) -> TrustPolicyResult<()> {
        let policy_json = encode_policy_document(document).map_err(TrustPolicyError::Encode)?;

        self.iam
            .update_assume_role_policy(role_name, &policy_json)
            .await
            .map_err(|source| TrustPolicyError::Persist {
                role_name: role_name.to_string(),
                source,
            })
    }

    /// Run the full edit: fetch, add the principal, persist.
    ///
    /// Any failure aborts the run; nothing is written unless the mutation
    /// succeeded, and nothing at all in dry-run mode.
    pub async fn edit(&self, request: &EditRequest) -> TrustPolicyResult<EditOutcome> {
        let role_name = request.role_name.as_str();
        let principal_arn = request.principal_arn.as_str();

        let shape = classify_principal(principal_arn);
        if !shape.is_recognized() {
            warn!(
                "Principal '{principal_arn}' does not look like an ARN or account ID; IAM may reject it"
            );
        } else if let PrincipalShape::Arn {
            account_id: Some(account_id),
        } = &shape
        {
            debug!("Principal {principal_arn} belongs to account {account_id}");
        }

        let mut document = self.fetch_policy(role_name).await?;
        debug!(
            "Fetched trust policy for role {role_name} ({} statements)",
            document.statement.len()
        );

        self.add_principal(role_name, &mut document, principal_arn)?;
        debug!("Added {principal_arn} to trust policy for role {role_name}");

        let persisted = if request.dry_run {
            debug!("Dry run; not updating role {role_name}");
            false
        } else {
            self.persist_policy(role_name, &document).await?;
            info!("Updated trust policy for role {role_name}");
            true
        };

        Ok(EditOutcome {
            role_name: role_name.to_string(),
            principal_arn: principal_arn.to_string(),
            statement_count: document.statement.len(),
            document,
            persisted,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::aws::{AwsError, AwsResult, IamErrorKind, IdentityApi};
    use crate::commands::TrustPolicyEditor;
    use crate::error::ErrorKind;
    use crate::types::{EditRequest, PolicyDocument};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const DEPLOY_ROLE_POLICY: &str = "%7B%22Version%22%3A%222012-10-17%22%2C%22Statement%22%3A%5B%7B%22Effect%22%3A%22Allow%22%2C%22Principal%22%3A%7B%22AWS%22%3A%22arn%3Aaws%3Aiam%3A%3A111%3Arole%2FA%22%7D%2C%22Action%22%3A%22sts%3AAssumeRole%22%7D%5D%7D";

    /// In-memory IAM: roles keyed by name, holding URL-encoded trust policies.
    #[derive(Default)]
    struct FakeIam {
        roles: HashMap<String, String>,
        update_error: Option<IamErrorKind>,
        updates: Mutex<Vec<(String, String)>>,
    }

    impl FakeIam {
        fn with_role(role_name: &str, encoded_policy: &str) -> Self {
            let mut roles = HashMap::new();
            roles.insert(role_name.to_string(), encoded_policy.to_string());
            Self {
                roles,
                ..Self::default()
            }
        }

        fn updates(&self) -> Vec<(String, String)> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IdentityApi for FakeIam {
        async fn get_assume_role_policy(&self, role_name: &str) -> AwsResult<String> {
            self.roles.get(role_name).cloned().ok_or_else(|| {
                AwsError::iam(
                    "GetRole",
                    IamErrorKind::NotFound,
                    format!("The role with name {role_name} cannot be found."),
                )
            })
        }

        async fn update_assume_role_policy(
            &self,
            role_name: &str,
            policy_json: &str,
        ) -> AwsResult<()> {
            if let Some(kind) = self.update_error {
                return Err(AwsError::iam("UpdateAssumeRolePolicy", kind, "rejected"));
            }
            self.updates
                .lock()
                .unwrap()
                .push((role_name.to_string(), policy_json.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_edit_adds_new_principal_and_persists() {
        let editor = TrustPolicyEditor::with_client(FakeIam::with_role(
            "deploy-role",
            DEPLOY_ROLE_POLICY,
        ));

        let outcome = editor
            .edit(&EditRequest::new("deploy-role", "arn:aws:iam::111:role/B"))
            .await
            .expect("edit should succeed");

        assert!(outcome.persisted);
        assert_eq!(outcome.statement_count, 2);
        assert!(outcome.document.statement[0]
            .principal
            .trusts_aws("arn:aws:iam::111:role/A"));
        assert!(outcome.document.statement[1]
            .principal
            .trusts_aws("arn:aws:iam::111:role/B"));

        let updates = editor.iam.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "deploy-role");
        let sent: PolicyDocument = serde_json::from_str(&updates[0].1).unwrap();
        assert_eq!(sent, outcome.document);
    }

    #[tokio::test]
    async fn test_edit_duplicate_principal_never_updates() {
        let editor = TrustPolicyEditor::with_client(FakeIam::with_role(
            "deploy-role",
            DEPLOY_ROLE_POLICY,
        ));

        let err = editor
            .edit(&EditRequest::new("deploy-role", "arn:aws:iam::111:role/A"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicatePrincipal);
        assert!(err
            .to_string()
            .contains("arn (arn:aws:iam::111:role/A) already trusted by role (deploy-role)"));
        assert!(editor.iam.updates().is_empty());
    }

    #[tokio::test]
    async fn test_edit_missing_role_aborts_before_mutation() {
        let editor = TrustPolicyEditor::with_client(FakeIam::with_role(
            "deploy-role",
            DEPLOY_ROLE_POLICY,
        ));

        let err = editor
            .edit(&EditRequest::new("ghost-role", "arn:aws:iam::111:role/B"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(matches!(
            err,
            crate::error::TrustPolicyError::Fetch { ref role_name, .. } if role_name == "ghost-role"
        ));
        assert!(editor.iam.updates().is_empty());
    }

    #[tokio::test]
    async fn test_edit_dry_run_skips_update() {
        let editor = TrustPolicyEditor::with_client(FakeIam::with_role(
            "deploy-role",
            DEPLOY_ROLE_POLICY,
        ));

        let outcome = editor
            .edit(&EditRequest::new("deploy-role", "arn:aws:iam::111:role/B").dry_run(true))
            .await
            .unwrap();

        assert!(!outcome.persisted);
        assert_eq!(outcome.statement_count, 2);
        assert!(editor.iam.updates().is_empty());
    }

    #[tokio::test]
    async fn test_edit_malformed_document_is_decode_error() {
        let editor =
            TrustPolicyEditor::with_client(FakeIam::with_role("deploy-role", "%7B%22Version"));

        let err = editor
            .edit(&EditRequest::new("deploy-role", "arn:aws:iam::111:role/B"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(editor.iam.updates().is_empty());
    }

    #[tokio::test]
    async fn test_edit_bad_url_escape_is_decode_error() {
        let editor = TrustPolicyEditor::with_client(FakeIam::with_role(
            "deploy-role",
            "%7B%22Version%22%3A%22a%zz%22%2C%22Statement%22%3A%5B%5D%7D",
        ));

        let err = editor
            .edit(&EditRequest::new("deploy-role", "arn:aws:iam::111:role/B"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(matches!(
            err,
            crate::error::TrustPolicyError::Decode {
                source: crate::error::DecodeError::InvalidEscape { .. },
                ..
            }
        ));
        assert!(editor.iam.updates().is_empty());
    }

    #[tokio::test]
    async fn test_edit_persist_errors_keep_their_kind() {
        for (iam_kind, expected) in [
            (IamErrorKind::NotFound, ErrorKind::NotFound),
            (IamErrorKind::MalformedDocument, ErrorKind::MalformedDocument),
            (IamErrorKind::LimitExceeded, ErrorKind::LimitExceeded),
            (IamErrorKind::Unmodifiable, ErrorKind::Unmodifiable),
            (IamErrorKind::ServiceFailure, ErrorKind::ServiceFailure),
            (IamErrorKind::Unknown, ErrorKind::UnknownProvider),
        ] {
            let mut iam = FakeIam::with_role("deploy-role", DEPLOY_ROLE_POLICY);
            iam.update_error = Some(iam_kind);
            let editor = TrustPolicyEditor::with_client(iam);

            let err = editor
                .edit(&EditRequest::new("deploy-role", "arn:aws:iam::111:role/B"))
                .await
                .unwrap_err();

            assert_eq!(err.kind(), expected);
            assert!(err.to_string().starts_with("Updating trust policy"));
        }
    }

    #[tokio::test]
    async fn test_edit_submits_unrecognized_principal() {
        let editor = TrustPolicyEditor::with_client(FakeIam::with_role(
            "deploy-role",
            DEPLOY_ROLE_POLICY,
        ));

        let outcome = editor
            .edit(&EditRequest::new("deploy-role", "role/not-an-arn"))
            .await
            .expect("IAM decides whether the principal is valid");

        assert!(outcome.persisted);
        assert!(outcome.document.trusts("role/not-an-arn"));
        assert_eq!(editor.iam.updates().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_policy_preserves_service_statement() {
        let encoded = "%7B%22Version%22%3A%222012-10-17%22%2C%22Statement%22%3A%5B%7B%22Action%22%3A%22sts%3AAssumeRole%22%2C%22Effect%22%3A%22Allow%22%2C%22Principal%22%3A%7B%22Service%22%3A%22ec2.amazonaws.com%22%7D%7D%5D%7D";
        let editor = TrustPolicyEditor::with_client(FakeIam::with_role("app-role", encoded));

        let mut doc = editor.fetch_policy("app-role").await.unwrap();
        let service_stmt = doc.statement[0].clone();
        editor
            .add_principal("app-role", &mut doc, "arn:aws:iam::111:role/B")
            .unwrap();

        assert_eq!(doc.statement[0], service_stmt);
        assert_eq!(doc.statement.len(), 2);
    }
}
