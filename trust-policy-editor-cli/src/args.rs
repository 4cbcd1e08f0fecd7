//! Command-line argument normalization

use std::ffi::OsString;

/// Long flags that may also be spelled with a single dash (`-arn`, `-role-name=x`).
const LONG_FLAGS: &[&str] = &["arn", "role-name", "dry-run", "region", "profile", "debug"];

/// Rewrite single-dash long flags into the double-dash form clap expects.
///
/// Arguments after a bare `--` are left alone, as is anything that is not
/// valid UTF-8.
pub(crate) fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut seen_terminator = false;
    args.into_iter()
        .map(|arg| {
            if seen_terminator {
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s == "--" {
                seen_terminator = true;
                return arg;
            }
            match s.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') && is_legacy_long_flag(rest) => {
                    OsString::from(format!("-{s}"))
                }
                _ => arg,
            }
        })
        .collect()
}

fn is_legacy_long_flag(flag: &str) -> bool {
    let name = flag.split_once('=').map_or(flag, |(name, _)| name);
    LONG_FLAGS.contains(&name)
}
