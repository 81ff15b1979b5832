//! Configuration management for the maintenance tool
//!
//! Everything comes from command-line options or their environment
//! variables; nothing about the server is compiled in.

use crate::{cli::Args, error::MaintenanceError};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    io::{self, IsTerminal},
    time::Duration,
};

/// Period used when `create` gets no usable period argument
pub const DEFAULT_PERIOD_SECS: u64 = 600;

/// Longest period whose end still fits an epoch timestamp
pub const MAX_PERIOD_SECS: u64 = i64::MAX as u64;

/// Name prefix for created maintenances
pub const DEFAULT_NAME_PREFIX: &str = "deploy";

/// Description attached to created maintenances
pub const DEFAULT_DESCRIPTION: &str = "created by zabbix-maintenance";

/// Exit code used for an unrecognised action
pub const DEFAULT_UNKNOWN_ACTION_EXIT_CODE: i32 = 1;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Server connection settings
    pub server: ServerConfig,
    /// Settings for created maintenances
    pub maintenance: MaintenanceConfig,
    /// Exit code for an unrecognised action
    pub unknown_action_exit_code: i32,
}

/// Server connection settings
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Frontend URL, e.g. `https://monitoring.example.com`
    pub url: Option<String>,
    /// Login user
    pub user: Option<String>,
    /// Login password
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// HTTP timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Settings applied to maintenances this tool creates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceConfig {
    /// Fallback period in seconds
    pub default_period: u64,
    /// Name prefix; the creation timestamp is appended
    pub name_prefix: String,
    /// Description stored with the maintenance
    pub description: String,
    /// Keep collecting data during the window
    pub collect_data: bool,
}

/// Resolved login details, available only once all three are set
#[derive(Clone)]
pub struct Credentials {
    pub server_url: String,
    pub user: String,
    pub password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            server: ServerConfig::default(),
            maintenance: MaintenanceConfig::default(),
            unknown_action_exit_code: DEFAULT_UNKNOWN_ACTION_EXIT_CODE,
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            default_period: DEFAULT_PERIOD_SECS,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            collect_data: true,
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server_url", &self.server_url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// HTTP timeout, if one was configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Create configuration from command line arguments
    ///
    /// Values are checked separately by [`Config::validate`], once the
    /// invocation is known to need them.
    pub fn from_args(args: &Args) -> Self {
        Self {
            debug: args.debug,
            server: ServerConfig {
                url: non_empty(args.server.as_deref()),
                user: non_empty(args.user.as_deref()),
                password: args.password.clone(),
                timeout_secs: args.timeout,
            },
            maintenance: MaintenanceConfig {
                default_period: args.default_period,
                name_prefix: args.name_prefix.clone(),
                description: args.description.clone(),
                collect_data: !args.no_data,
            },
            unknown_action_exit_code: args.unknown_action_exit_code,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), MaintenanceError> {
        if self.maintenance.default_period == 0 {
            return Err(MaintenanceError::config(
                "default period must be greater than zero",
            ));
        }

        if self.maintenance.default_period > MAX_PERIOD_SECS {
            return Err(MaintenanceError::config(format!(
                "default period must not exceed {MAX_PERIOD_SECS} seconds"
            )));
        }

        if self.server.timeout_secs == Some(0) {
            return Err(MaintenanceError::config(
                "timeout must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Login details, checked only when a connection is actually needed
    ///
    /// A missing password is asked for on the terminal when stdin is one.
    pub fn credentials(&self) -> Result<Credentials, MaintenanceError> {
        self.credentials_with(prompt_password)
    }

    /// Login details, with `prompt` consulted for a missing password
    pub fn credentials_with<P>(&self, prompt: P) -> Result<Credentials, MaintenanceError>
    where
        P: FnOnce(&str, &str) -> Result<Option<String>, MaintenanceError>,
    {
        let server_url = self.server.url.clone().ok_or_else(|| {
            MaintenanceError::config("server URL is not set (use --server or ZABBIX_SERVER)")
        })?;
        let user = self.server.user.clone().ok_or_else(|| {
            MaintenanceError::config("user is not set (use --user or ZABBIX_USER)")
        })?;
        let password = match self.server.password.clone() {
            Some(password) => Some(password),
            None => prompt(&server_url, &user)?,
        }
        .ok_or_else(|| {
            MaintenanceError::config("password is not set (use --password or ZABBIX_PASSWORD)")
        })?;

        Ok(Credentials {
            server_url,
            user,
            password,
        })
    }
}

/// Read the password from the terminal; `None` when not running interactively
fn prompt_password(server_url: &str, user: &str) -> Result<Option<String>, MaintenanceError> {
    if !io::stdin().is_terminal() {
        return Ok(None);
    }

    rpassword::prompt_password(format!("Password for {user} on {server_url}: "))
        .map(Some)
        .map_err(|e| MaintenanceError::config(format!("failed to read password: {e}")))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
