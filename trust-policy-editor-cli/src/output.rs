use anyhow::{Context, Result};
use std::io::{self, Write};
use trust_policy_editor::{EditOutcome, PolicyDocument};

pub(crate) fn note(msg: &str) {
    let _ = writeln!(io::stderr(), "trust-policy-editor: {}", msg);
}

pub(crate) fn print_missing_required(usage: &str) {
    let stderr = io::stderr();
    let mut w = stderr.lock();
    let _ = writeln!(w, "--arn and --role-name are required.");
    let _ = writeln!(w);
    let _ = writeln!(w, "{}", usage);
}

pub(crate) fn print_outcome(outcome: &EditOutcome) {
    let verb = if outcome.persisted {
        "Updated"
    } else {
        "Dry run: would update"
    };
    note(&format!(
        "{} trust policy for role '{}' to trust '{}' (now {} statements total)",
        verb, outcome.role_name, outcome.principal_arn, outcome.statement_count
    ));
}

/// Pretty-print the document to stdout so it can be piped.
pub(crate) fn print_document(document: &PolicyDocument) -> Result<()> {
    let json =
        serde_json::to_string_pretty(document).context("Failed to serialize trust policy")?;
    let stdout = io::stdout();
    let mut w = stdout.lock();
    writeln!(w, "{}", json).context("Failed to write trust policy to stdout")?;
    Ok(())
}
