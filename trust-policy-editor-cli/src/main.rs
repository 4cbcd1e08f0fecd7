use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::debug;
use trust_policy_editor::{AwsSettings, EditRequest, ErrorKind, TrustPolicyEditor};

mod args;
mod output;

#[derive(Parser, Debug)]
#[command(
    name = "trust-policy-editor",
    version,
    about = "Add a trusted principal to an IAM role's trust policy"
)]
struct Cli {
    #[arg(long, value_name = "ARN", help = "ARN Being Added")]
    arn: Option<String>,
    #[arg(long, value_name = "NAME", help = "Role Name To Edit")]
    role_name: Option<String>,
    #[arg(
        long,
        help = "Print the updated trust policy without writing it back to IAM"
    )]
    dry_run: bool,
    #[arg(long, env = "AWS_REGION", help = "AWS region for the IAM client")]
    region: Option<String>,
    #[arg(long, env = "AWS_PROFILE", help = "Named AWS profile to load credentials from")]
    profile: Option<String>,
    #[arg(long, help = "Enable debug logging")]
    debug: bool,
}

impl Cli {
    /// `None` when either required flag is missing or empty.
    fn edit_request(&self) -> Option<EditRequest> {
        let arn = self.arn.as_deref().filter(|s| !s.is_empty())?;
        let role_name = self.role_name.as_deref().filter(|s| !s.is_empty())?;
        Some(EditRequest::new(role_name, arn).dry_run(self.dry_run))
    }

    fn aws_settings(&self) -> AwsSettings {
        AwsSettings {
            region: self.region.clone(),
            profile: self.profile.clone(),
        }
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse_from(args::normalize_legacy_flags(std::env::args_os()));
    init_logging(cli.debug);

    let Some(request) = cli.edit_request() else {
        output::print_missing_required(&Cli::command().render_usage().to_string());
        return Ok(());
    };
    debug!("Parsed request: {:?}", request);

    let editor = TrustPolicyEditor::new(&cli.aws_settings())
        .await
        .context("Failed to initialize IAM client")?;

    let outcome = match editor.edit(&request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.kind() == ErrorKind::DuplicatePrincipal {
                output::note("principal already trusted; trust policy left unchanged");
            }
            return Err(e).with_context(|| {
                format!(
                    "Failed to edit trust policy for role '{}'",
                    request.role_name
                )
            });
        }
    };

    if !outcome.persisted {
        output::print_document(&outcome.document)?;
    }
    output::print_outcome(&outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        Cli::try_parse_from(args::normalize_legacy_flags(
            argv.iter().map(std::ffi::OsString::from),
        ))
        .expect("should parse")
    }

    #[test]
    fn test_edit_request_from_legacy_flags() {
        let cli = parse(&[
            "trust-policy-editor",
            "-arn",
            "arn:aws:iam::111:role/B",
            "-role-name",
            "deploy-role",
        ]);
        assert_eq!(
            cli.edit_request(),
            Some(EditRequest::new("deploy-role", "arn:aws:iam::111:role/B"))
        );
    }

    #[test]
    fn test_edit_request_dry_run() {
        let cli = parse(&[
            "trust-policy-editor",
            "--arn",
            "arn:aws:iam::111:role/B",
            "--role-name",
            "deploy-role",
            "--dry-run",
        ]);
        let request = cli.edit_request().expect("request");
        assert!(request.dry_run);
    }

    #[test]
    fn test_edit_request_requires_both_flags() {
        let cli = parse(&["trust-policy-editor", "--arn", "arn:aws:iam::111:role/B"]);
        assert_eq!(cli.edit_request(), None);

        let cli = parse(&["trust-policy-editor", "--role-name", "deploy-role"]);
        assert_eq!(cli.edit_request(), None);
    }

    #[test]
    fn test_edit_request_rejects_empty_values() {
        let cli = parse(&["trust-policy-editor", "--arn", "", "--role-name", "deploy-role"]);
        assert_eq!(cli.edit_request(), None);
    }

    #[test]
    fn test_aws_settings_from_flags() {
        let cli = parse(&[
            "trust-policy-editor",
            "--region",
            "eu-west-1",
            "--profile",
            "ops",
        ]);
        let settings = cli.aws_settings();
        assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
        assert_eq!(settings.profile.as_deref(), Some("ops"));
    }
}
