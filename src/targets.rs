//! Target sources.
//!
//! Builds the ordered target list a sweep runs over, from a file, from
//! literal arguments, or from a generated synthetic set.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Default size of a generated target set.
pub const DEFAULT_GENERATED_TARGETS: usize = 3000;

/// Public resolvers mixed into every generated set so a sweep has some
/// reachable hosts.
const PUBLIC_RESOLVERS: [&str; 4] = ["8.8.8.8", "1.1.1.1", "208.67.222.222", "9.9.9.9"];

/// Highest third octet used for generated `192.168.x.y` addresses.
const MAX_SUBNET: u8 = 11;

/// Target source errors. All of them are fatal: the sweep does not start.
#[derive(Debug, Error)]
pub enum TargetError {
    /// Target file could not be read.
    #[error("failed to read target file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No file, no arguments, and the policy forbids generating targets.
    #[error("no targets provided")]
    Empty,
}

/// What to do when no targets are supplied.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmptyPolicy {
    /// Fall back to [`generate_targets`].
    #[default]
    Generate,
    /// Refuse to start.
    Fail,
}

/// Pick the target list: file first, then literal arguments, then `policy`.
///
/// A file that exists but holds no targets yields an empty sweep; the policy
/// only applies when neither a file nor arguments were given.
pub fn load_targets(
    file: Option<&Path>,
    args: &[String],
    policy: EmptyPolicy,
) -> Result<Vec<String>, TargetError> {
    if let Some(path) = file {
        return read_targets_file(path);
    }

    if !args.is_empty() {
        return Ok(args.to_vec());
    }

    match policy {
        EmptyPolicy::Generate => {
            tracing::info!(
                count = DEFAULT_GENERATED_TARGETS,
                "No targets given, generating a synthetic set"
            );
            Ok(generate_targets(DEFAULT_GENERATED_TARGETS))
        }
        EmptyPolicy::Fail => Err(TargetError::Empty),
    }
}

/// Read a newline-delimited target file.
pub fn read_targets_file(path: &Path) -> Result<Vec<String>, TargetError> {
    let content = std::fs::read_to_string(path).map_err(|source| TargetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let targets = parse_targets(&content);
    tracing::debug!(path = %path.display(), count = targets.len(), "Loaded target file");
    Ok(targets)
}

/// Split text into targets: one per line, trimmed, blank lines skipped.
pub fn parse_targets(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Generate up to `limit` shuffled targets.
///
/// The set starts with a few public resolvers followed by `192.168.0.1`
/// through `192.168.11.254`, so it is capped at 3052 entries.
pub fn generate_targets(limit: usize) -> Vec<String> {
    let mut targets: Vec<String> = PUBLIC_RESOLVERS
        .iter()
        .take(limit)
        .map(|ip| ip.to_string())
        .collect();

    'outer: for subnet in 0..=MAX_SUBNET {
        for host in 1..=254u8 {
            if targets.len() >= limit {
                break 'outer;
            }
            targets.push(format!("192.168.{subnet}.{host}"));
        }
    }

    targets.shuffle(&mut rand::rng());
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_targets_trims_and_skips_blanks() {
        let targets = parse_targets("  10.0.0.1 \n\n\t\nexample.com\r\n   \n10.0.0.2");
        assert_eq!(targets, vec!["10.0.0.1", "example.com", "10.0.0.2"]);
    }

    #[test]
    fn test_read_targets_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "8.8.8.8").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  1.1.1.1  ").unwrap();

        let targets = read_targets_file(file.path()).unwrap();
        assert_eq!(targets, vec!["8.8.8.8", "1.1.1.1"]);
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let err = read_targets_file(Path::new("/nonexistent/targets.txt")).unwrap_err();
        assert!(matches!(err, TargetError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/targets.txt"));
    }

    #[test]
    fn test_load_prefers_file_over_args() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "10.1.1.1").unwrap();
        let args = vec!["10.2.2.2".to_string()];

        let targets = load_targets(Some(file.path()), &args, EmptyPolicy::Fail).unwrap();
        assert_eq!(targets, vec!["10.1.1.1"]);
    }

    #[test]
    fn test_load_uses_args_in_order() {
        let args = vec!["b".to_string(), "a".to_string(), "c".to_string()];
        let targets = load_targets(None, &args, EmptyPolicy::Fail).unwrap();
        assert_eq!(targets, args);
    }

    #[test]
    fn test_load_empty_with_fail_policy() {
        let err = load_targets(None, &[], EmptyPolicy::Fail).unwrap_err();
        assert!(matches!(err, TargetError::Empty));
        assert_eq!(err.to_string(), "no targets provided");
    }

    #[test]
    fn test_load_empty_with_generate_policy() {
        let targets = load_targets(None, &[], EmptyPolicy::Generate).unwrap();
        assert_eq!(targets.len(), DEFAULT_GENERATED_TARGETS);
    }

    #[test]
    fn test_empty_file_is_an_empty_sweep() {
        let file = NamedTempFile::new().unwrap();
        let targets = load_targets(Some(file.path()), &[], EmptyPolicy::Fail).unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn test_generate_targets_contents() {
        let targets = generate_targets(DEFAULT_GENERATED_TARGETS);
        assert_eq!(targets.len(), 3000);

        let unique: HashSet<_> = targets.iter().collect();
        assert_eq!(unique.len(), 3000);
        for resolver in PUBLIC_RESOLVERS {
            assert!(unique.contains(&resolver.to_string()));
        }
        assert!(unique.contains(&"192.168.0.1".to_string()));
        assert!(!unique.contains(&"192.168.0.0".to_string()));
        assert!(!unique.contains(&"192.168.0.255".to_string()));
    }

    #[test]
    fn test_generate_targets_caps_and_small_limits() {
        assert_eq!(generate_targets(10_000).len(), 4 + 12 * 254);
        assert_eq!(generate_targets(2).len(), 2);
        assert!(generate_targets(0).is_empty());
    }

    #[test]
    fn test_empty_policy_parsing() {
        assert_eq!(
            EmptyPolicy::from_str("generate").unwrap(),
            EmptyPolicy::Generate
        );
        assert_eq!(EmptyPolicy::from_str("FAIL").unwrap(), EmptyPolicy::Fail);
        assert!(EmptyPolicy::from_str("retry").is_err());
    }
}
