//! # Zabbix Maintenance
//!
//! Create, delete and list Zabbix maintenance windows for a host group.
//! Meant to be called from deployment pipelines around a rollout: open a
//! window before touching hosts, close it afterwards.
//!
//! ## Features
//!
//! - One-time maintenance windows with a fixed duration
//! - Host group lookup by name
//! - Listing of active windows with local end times
//! - Exit codes a pipeline can branch on (0 done, 1 failure, 2 not found)
//!
//! ## Example
//!
//! ```no_run
//! use zabbix_maintenance::{api::connect_http, config::Config, core};
//!
//! let mut config = Config::default();
//! config.server.url = Some("https://monitoring.example.com".into());
//! config.server.user = Some("deployer".into());
//! config.server.password = Some("secret".into());
//!
//! let session = connect_http(&config)?;
//! let group_id = core::resolve_group_id(&session, "web")?;
//! for line in core::list_maintenances(&session, group_id)? {
//!     println!("{line}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
///
/// Logs go to stderr; stdout is reserved for command output.
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
