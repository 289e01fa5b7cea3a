use anyhow::{Context, Result};
use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;

/// Effective SSH parameters for one host alias, as reported by `ssh -G`.
///
/// A field that could not be found in the command output is an empty string;
/// callers substitute their own default in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub identity_file: String,
    pub user: String,
    // Kept as text: the source is free-form command output.
    pub port: String,
}

fn user_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)user\s+(.*[^\r\n])").unwrap())
}

fn port_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)port\s+(.*[^\r\n])").unwrap())
}

fn identity_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)identityfile\s+(.*[^\r\n])").unwrap())
}

fn first_group(re: &Regex, haystack: &str) -> String {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Extracts identity file, user and port from `ssh -G` output.
///
/// The three patterns are applied independently, so a missing `user` line
/// does not affect `port` extraction. When a directive appears more than
/// once (includes can do that), the first occurrence wins.
pub fn parse(config: &str) -> ConnectionConfig {
    ConnectionConfig {
        identity_file: first_group(identity_file_re(), config),
        user: first_group(user_re(), config),
        port: first_group(port_re(), config),
    }
}

/// Asks the system ssh client for the effective configuration of `alias`
/// and parses the result.
///
/// Returns an error when ssh is missing or exits non-zero; callers decide
/// whether to fall back to [`stub_config`]. This spawns a process and may
/// block, so the UI runs it on a worker thread.
pub fn resolve(alias: &str) -> Result<ConnectionConfig> {
    resolve_with("ssh", alias)
}

fn resolve_with(program: &str, alias: &str) -> Result<ConnectionConfig> {
    let output = Command::new(program)
        .arg("-G")
        .arg(alias)
        .output()
        .with_context(|| format!("Failed to run '{} -G {}'", program, alias))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "'{} -G {}' exited with {}: {}",
            program,
            alias,
            output.status,
            stderr.trim()
        );
    }

    Ok(parse(&String::from_utf8_lossy(&output.stdout)))
}

/// A fixed config used before any real resolution happened, e.g. while the
/// host list is being populated. Never spawns a process.
pub fn stub_config() -> ConnectionConfig {
    ConnectionConfig {
        identity_file: "$HOME/.ssh/id_rsa".to_string(),
        user: current_username(),
        port: "22".to_string(),
    }
}

// Current OS username, or "n/a" if it can't be determined.
fn current_username() -> String {
    whoami::fallible::username().unwrap_or_else(|_| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SSH_G_OUTPUT: &str = "\
host example
user bob
hostname example.com\r
port 2022
addressfamily any
identityfile ~/.ssh/id_ed25519
identityfile ~/.ssh/id_rsa
port 2222
";

    #[test]
    fn parse_extracts_all_three_fields() {
        let config = parse(SSH_G_OUTPUT);
        assert_eq!(config.user, "bob");
        assert_eq!(config.port, "2022");
        assert_eq!(config.identity_file, "~/.ssh/id_ed25519");
    }

    #[test]
    fn parse_is_case_insensitive() {
        let config = parse("User bob\nPORT 22\nIdentityFile /tmp/key\n");
        assert_eq!(config.user, "bob");
        assert_eq!(config.port, "22");
        assert_eq!(config.identity_file, "/tmp/key");
    }

    #[test]
    fn parse_first_occurrence_wins() {
        let config = parse("port 22\nport 2222\nport 22022\n");
        assert_eq!(config.port, "22");
    }

    #[test]
    fn parse_missing_fields_are_empty() {
        let config = parse("hostname example.com\naddressfamily any\n");
        assert_eq!(config.user, "");
        assert_eq!(config.port, "");
        assert_eq!(config.identity_file, "");

        let config = parse("port 2022\n");
        assert_eq!(config.user, "");
        assert_eq!(config.port, "2022");
    }

    #[test]
    fn parse_strips_trailing_carriage_return() {
        let config = parse("user carol\r\n");
        assert_eq!(config.user, "carol");
    }

    #[test]
    fn parse_garbled_output_yields_empty_config() {
        assert_eq!(parse("%%%\x00???"), ConnectionConfig::default());
        assert_eq!(parse(""), ConnectionConfig::default());
    }

    #[test]
    fn stub_config_is_environment_independent() {
        let config = stub_config();
        assert_eq!(config.port, "22");
        assert_eq!(config.identity_file, "$HOME/.ssh/id_rsa");
        assert!(!config.user.is_empty());
    }

    #[test]
    fn resolve_with_missing_binary_is_an_error() {
        let result = resolve_with("sshgo-test-no-such-binary", "example");
        assert!(result.is_err());
    }
}
