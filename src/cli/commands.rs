//! Command implementations for the CLI
//!
//! This is the single place where outcomes become exit codes: missing
//! groups and empty listings are reported here, everything else goes back
//! to `main` as an error.

use crate::{
    api::{Session, Transport},
    cli::args::{Args, EXIT_USAGE, usage},
    config::{Config, MAX_PERIOD_SECS},
    core::maintenance::{
        MaintenancePlan, create_maintenance, delete_maintenances, list_maintenance_ids,
        list_maintenances, resolve_group_id,
    },
    error::Result,
    utils::time::{format_epoch_local, now_epoch},
};
use anyhow::Context;
use std::io::Write;
use tracing::{info, instrument, warn};

/// Exit code for success
pub const EXIT_OK: i32 = 0;

/// Exit code when the group or its maintenances do not exist
pub const EXIT_NOT_FOUND: i32 = 2;

/// What to do with the group's maintenances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create { period: u64 },
    Delete,
    Show,
}

/// A fully parsed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Maintenance { action: Action, group: String },
    Unknown { action: String },
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Delete => "delete",
            Self::Show => "show",
        }
    }
}

impl Command {
    /// Build the command from positionals; `None` when action or group is missing
    pub fn from_args(args: &Args, config: &Config) -> Option<Self> {
        let (action, group) = args.positionals()?;

        let action = match action {
            "create" => Action::Create {
                period: resolve_period(
                    args.period.as_deref(),
                    config.maintenance.default_period,
                ),
            },
            "delete" => Action::Delete,
            "show" => Action::Show,
            other => {
                return Some(Self::Unknown {
                    action: other.to_string(),
                });
            }
        };

        Some(Self::Maintenance {
            action,
            group: group.to_string(),
        })
    }
}

/// Period from the command line, falling back to `default` when absent,
/// non-numeric, zero or too large to end at a valid timestamp
pub fn resolve_period(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|r| r.trim().parse::<u64>().ok())
        .filter(|period| (1..=MAX_PERIOD_SECS).contains(period))
        .unwrap_or(default)
}

/// Run one invocation and return the process exit code
pub fn run<T, C, W>(config: &Config, args: &Args, connect: C, out: &mut W) -> anyhow::Result<i32>
where
    T: Transport,
    C: FnOnce(&Config) -> Result<Session<T>>,
    W: Write,
{
    let code = match Command::from_args(args, config) {
        Some(command) => {
            config.validate()?;
            execute_command(config, &command, connect, out)?
        }
        None => {
            writeln!(out, "{}", usage())?;
            EXIT_USAGE
        }
    };

    out.flush()?;
    Ok(code)
}

/// Execute the appropriate command
#[instrument(skip(config, connect, out))]
pub fn execute_command<T, C, W>(
    config: &Config,
    command: &Command,
    connect: C,
    out: &mut W,
) -> anyhow::Result<i32>
where
    T: Transport,
    C: FnOnce(&Config) -> Result<Session<T>>,
    W: Write,
{
    let (action, group) = match command {
        Command::Maintenance { action, group } => (*action, group.as_str()),
        Command::Unknown { action } => {
            warn!("Unknown action {}", action);
            writeln!(out, "Wrong action {action}")?;
            return Ok(config.unknown_action_exit_code);
        }
    };

    let session = connect(config).context("Failed to connect to Zabbix server")?;

    let outcome = match action {
        Action::Create { period } => execute_create(config, &session, group, period),
        Action::Delete => execute_delete(&session, group),
        Action::Show => execute_show(&session, group),
    };

    match outcome {
        Ok(lines) => {
            for line in lines {
                writeln!(out, "{line}")?;
            }
            Ok(EXIT_OK)
        }
        Err(e) if e.is_not_found() => {
            writeln!(out, "{e}")?;
            Ok(EXIT_NOT_FOUND)
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!(
            "Failed to {} maintenance for group {}",
            action.verb(),
            group
        ))),
    }
}

/// Execute the create command
fn execute_create<T: Transport>(
    config: &Config,
    session: &Session<T>,
    group: &str,
    period: u64,
) -> Result<Vec<String>> {
    let start_time = now_epoch();
    let stamp = format_epoch_local(start_time).unwrap_or_else(|| start_time.to_string());
    let name = format!("{} {}", config.maintenance.name_prefix, stamp);

    info!("Creating maintenance \"{}\" for {} seconds", name, period);

    let group_id = resolve_group_id(session, group)?;
    let plan = MaintenancePlan::new(&config.maintenance, name, start_time, period);
    create_maintenance(session, group_id, &plan)?;

    Ok(vec!["done".to_string()])
}

/// Execute the delete command
fn execute_delete<T: Transport>(session: &Session<T>, group: &str) -> Result<Vec<String>> {
    let group_id = resolve_group_id(session, group)?;
    let ids = list_maintenance_ids(session, group_id)?;
    delete_maintenances(session, &ids)?;

    Ok(vec!["done".to_string()])
}

/// Execute the show command
fn execute_show<T: Transport>(session: &Session<T>, group: &str) -> Result<Vec<String>> {
    let group_id = resolve_group_id(session, group)?;
    list_maintenances(session, group_id)
}
