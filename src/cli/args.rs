//! Command-line argument parsing

use crate::config::{
    DEFAULT_DESCRIPTION, DEFAULT_NAME_PREFIX, DEFAULT_PERIOD_SECS,
    DEFAULT_UNKNOWN_ACTION_EXIT_CODE,
};
use clap::Parser;

/// Exit code for usage errors
pub const EXIT_USAGE: i32 = 1;

/// Zabbix Maintenance - create, delete or show maintenance windows for a host group
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "zabbix-maintenance")]
#[command(allow_negative_numbers = true)]
pub struct Args {
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Zabbix frontend URL
    #[arg(long, env = "ZABBIX_SERVER")]
    pub server: Option<String>,

    /// Login user
    #[arg(long, env = "ZABBIX_USER")]
    pub user: Option<String>,

    /// Login password
    #[arg(long, env = "ZABBIX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, env = "ZABBIX_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Period in seconds used when none (or an invalid one) is given
    #[arg(long, default_value_t = DEFAULT_PERIOD_SECS)]
    pub default_period: u64,

    /// Name prefix for created maintenances
    #[arg(long = "name", default_value = DEFAULT_NAME_PREFIX)]
    pub name_prefix: String,

    /// Description for created maintenances
    #[arg(long, default_value = DEFAULT_DESCRIPTION)]
    pub description: String,

    /// Disable data collection during the maintenance
    #[arg(long)]
    pub no_data: bool,

    /// Exit code returned for an unrecognised action
    #[arg(long, default_value_t = DEFAULT_UNKNOWN_ACTION_EXIT_CODE)]
    pub unknown_action_exit_code: i32,

    /// create, delete or show
    pub action: Option<String>,

    /// Host group name
    pub group: Option<String>,

    /// Maintenance period in seconds (create only)
    pub period: Option<String>,
}

impl Args {
    /// Action and group, when both were given
    pub fn positionals(&self) -> Option<(&str, &str)> {
        Some((self.action.as_deref()?, self.group.as_deref()?))
    }
}

/// One-line usage shown for missing or malformed arguments
pub fn usage() -> String {
    format!(
        "use {} create|delete|show group_name [period in seconds]",
        env!("CARGO_PKG_NAME")
    )
}

/// Parse command line arguments
///
/// Malformed arguments print the usage line to stdout and exit with
/// [`EXIT_USAGE`]; `--help` and `--version` behave as usual.
pub fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            eprint!("{e}");
            println!("{}", usage());
            std::process::exit(EXIT_USAGE);
        }
        Err(e) => e.exit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_args() {
        let args = Args::try_parse_from(["zabbix-maintenance", "show", "web"]).unwrap();
        assert!(!args.debug);
        assert_eq!(args.positionals(), Some(("show", "web")));
        assert!(args.period.is_none());
    }

    #[test]
    fn test_parse_create_with_period() {
        let args =
            Args::try_parse_from(["zabbix-maintenance", "--debug", "create", "web", "120"]).unwrap();
        assert!(args.debug);
        assert_eq!(args.positionals(), Some(("create", "web")));
        assert_eq!(args.period.as_deref(), Some("120"));
    }

    #[test]
    fn test_debug_flag_after_positionals() {
        let args = Args::try_parse_from(["zabbix-maintenance", "show", "web", "--debug"]).unwrap();
        assert!(args.debug);
        assert_eq!(args.positionals(), Some(("show", "web")));
        assert!(args.period.is_none());
    }

    #[test]
    fn test_parse_negative_period_as_value() {
        let args = Args::try_parse_from(["zabbix-maintenance", "create", "web", "-5"]).unwrap();
        assert_eq!(args.period.as_deref(), Some("-5"));
    }

    #[test]
    fn test_missing_group() {
        let args = Args::try_parse_from(["zabbix-maintenance", "create"]).unwrap();
        assert!(args.positionals().is_none());

        let args = Args::try_parse_from(["zabbix-maintenance"]).unwrap();
        assert!(args.positionals().is_none());
    }

    #[test]
    fn test_parse_maintenance_options() {
        let args = Args::try_parse_from([
            "zabbix-maintenance",
            "--no-data",
            "--name",
            "release",
            "--unknown-action-exit-code",
            "0",
            "create",
            "web",
        ])
        .unwrap();
        assert!(args.no_data);
        assert_eq!(args.name_prefix, "release");
        assert_eq!(args.unknown_action_exit_code, 0);
    }

    #[test]
    fn test_usage_line() {
        assert_eq!(
            usage(),
            "use zabbix-maintenance create|delete|show group_name [period in seconds]"
        );
    }
}
