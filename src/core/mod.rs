//! Core maintenance logic
//!
//! Group lookup and the create/list/delete operations built on an API
//! session.

pub mod maintenance;

pub use maintenance::{
    GroupId, MaintenanceId, MaintenancePlan, MaintenanceRecord, MaintenanceType,
    create_maintenance, delete_maintenances, format_maintenance, list_maintenance_ids,
    list_maintenances, resolve_group_id,
};
