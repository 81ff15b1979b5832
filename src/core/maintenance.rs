//! Maintenance window operations
//!
//! Group lookup plus create, list and delete of maintenances. Every function
//! returns a typed error instead of exiting, so callers decide what a missing
//! group or an empty listing means for the process.

use crate::{
    api::{Session, Transport},
    config::MaintenanceConfig,
    error::{MaintenanceError, Result},
    utils::time::{format_epoch, parse_epoch},
};
use chrono::TimeZone;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt::{self, Display};
use tracing::{debug, info, instrument, warn};

/// Server-assigned host group id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub u64);

impl Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned maintenance id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaintenanceId(pub String);

impl Display for MaintenanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether hosts keep reporting data during the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceType {
    WithDataCollection,
    WithoutDataCollection,
}

impl MaintenanceType {
    /// Wire value for `maintenance_type`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WithDataCollection => "0",
            Self::WithoutDataCollection => "1",
        }
    }
}

/// `timeperiod_type` for a one-time period
pub const ONE_TIME_PERIOD: &str = "0";

/// A maintenance window about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenancePlan {
    pub name: String,
    pub description: String,
    pub maintenance_type: MaintenanceType,
    /// Start, seconds since the epoch
    pub start_time: i64,
    /// Length in seconds
    pub period: u64,
}

impl MaintenancePlan {
    /// Plan a window from configured defaults
    pub fn new(config: &MaintenanceConfig, name: String, start_time: i64, period: u64) -> Self {
        let maintenance_type = if config.collect_data {
            MaintenanceType::WithDataCollection
        } else {
            MaintenanceType::WithoutDataCollection
        };

        Self {
            name,
            description: config.description.clone(),
            maintenance_type,
            start_time,
            period,
        }
    }

    /// Exclusive end of the window, `None` when it does not fit an epoch timestamp
    pub fn end_time(&self) -> Option<i64> {
        self.start_time.checked_add_unsigned(self.period)
    }

    /// Parameters for `maintenance.create`
    ///
    /// Fails for an empty window or one whose end overflows.
    pub fn create_params(&self, group_id: GroupId) -> Result<Value> {
        if self.period == 0 {
            return Err(MaintenanceError::validation(
                "maintenance period must be greater than zero",
            ));
        }

        let end_time = self.end_time().ok_or_else(|| {
            MaintenanceError::validation(format!(
                "maintenance period {} ends past the largest timestamp",
                self.period
            ))
        })?;

        Ok(json!({
            "groupids": [group_id.0],
            "name": self.name,
            "maintenance_type": self.maintenance_type.as_str(),
            "description": self.description,
            "active_since": self.start_time.to_string(),
            "active_till": end_time.to_string(),
            "timeperiods": [{
                "timeperiod_type": ONE_TIME_PERIOD,
                "start_date": self.start_time.to_string(),
                "period": self.period.to_string(),
            }],
        }))
    }
}

/// A maintenance as returned by `maintenance.get`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaintenanceRecord {
    pub maintenanceid: MaintenanceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active_till: String,
}

#[derive(Debug, Deserialize)]
struct HostGroup {
    groupid: String,
}

#[derive(Debug, Deserialize)]
struct MaintenanceIds {
    maintenanceids: Vec<MaintenanceId>,
}

/// Look up a host group by name
#[instrument(skip(session))]
pub fn resolve_group_id<T: Transport>(session: &Session<T>, group_name: &str) -> Result<GroupId> {
    let groups: Vec<HostGroup> = session.call_as(
        "hostgroup.get",
        json!({
            "output": "extend",
            "search": { "name": group_name },
            "searchWildcardsEnabled": true,
        }),
    )?;

    if groups.len() > 1 {
        warn!(
            "Group name {} matched {} groups, using the first one",
            group_name,
            groups.len()
        );
    }

    let group = groups
        .into_iter()
        .next()
        .ok_or_else(|| MaintenanceError::group_not_found(group_name))?;

    let id = group.groupid.parse().map_err(|_| {
        MaintenanceError::invalid_response(
            "hostgroup.get",
            format!("group id {:?} is not numeric", group.groupid),
        )
    })?;

    debug!("Group {} has id {}", group_name, id);
    Ok(GroupId(id))
}

/// Create a one-time maintenance window for a group
#[instrument(skip(session, plan), fields(name = %plan.name, period = plan.period))]
pub fn create_maintenance<T: Transport>(
    session: &Session<T>,
    group_id: GroupId,
    plan: &MaintenancePlan,
) -> Result<Vec<MaintenanceId>> {
    let params = plan.create_params(group_id)?;
    let created: MaintenanceIds = session.call_as("maintenance.create", params)?;

    info!(
        "Created maintenance {:?} for group {} for {} seconds",
        created.maintenanceids, group_id, plan.period
    );
    Ok(created.maintenanceids)
}

/// Ids of every maintenance covering a group
#[instrument(skip(session))]
pub fn list_maintenance_ids<T: Transport>(
    session: &Session<T>,
    group_id: GroupId,
) -> Result<Vec<MaintenanceId>> {
    let records = fetch_maintenances(session, group_id, json!(["maintenanceid"]))?;
    Ok(records.into_iter().map(|r| r.maintenanceid).collect())
}

/// Every maintenance covering a group, one formatted line each
#[instrument(skip(session))]
pub fn list_maintenances<T: Transport>(
    session: &Session<T>,
    group_id: GroupId,
) -> Result<Vec<String>> {
    list_maintenances_in(session, group_id, &chrono::Local)
}

/// Same as [`list_maintenances`] with an explicit time zone
pub fn list_maintenances_in<T, Tz>(
    session: &Session<T>,
    group_id: GroupId,
    tz: &Tz,
) -> Result<Vec<String>>
where
    T: Transport,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fetch_maintenances(session, group_id, json!("extend"))?
        .iter()
        .map(|record| format_maintenance(record, tz))
        .collect()
}

/// `<id>: <name> till <end time>`
pub fn format_maintenance<Tz>(record: &MaintenanceRecord, tz: &Tz) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let till = parse_epoch(&record.active_till)
        .and_then(|secs| format_epoch(secs, tz))
        .ok_or_else(|| {
            MaintenanceError::invalid_response(
                "maintenance.get",
                format!(
                    "maintenance {} has invalid active_till {:?}",
                    record.maintenanceid, record.active_till
                ),
            )
        })?;

    Ok(format!(
        "{}: {} till {}",
        record.maintenanceid, record.name, till
    ))
}

/// Delete maintenances by id
#[instrument(skip(session))]
pub fn delete_maintenances<T: Transport>(
    session: &Session<T>,
    ids: &[MaintenanceId],
) -> Result<()> {
    session.call("maintenance.delete", json!(ids))?;
    info!("Deleted {} maintenance(s)", ids.len());
    Ok(())
}

fn fetch_maintenances<T: Transport>(
    session: &Session<T>,
    group_id: GroupId,
    output: Value,
) -> Result<Vec<MaintenanceRecord>> {
    let records: Vec<MaintenanceRecord> = session.call_as(
        "maintenance.get",
        json!({
            "output": output,
            "groupids": [group_id.0],
        }),
    )?;

    if records.is_empty() {
        return Err(MaintenanceError::no_maintenances(group_id));
    }

    debug!("Group {} has {} maintenance(s)", group_id, records.len());
    Ok(records)
}
