// ABOUTME: Memory and CPU utilization from a single usage snapshot.
// ABOUTME: Absent counters and zero denominators are errors, never zeros.

use super::error::ManagerError;
use crate::model::MemoryUsage;
use crate::runtime::UsageSnapshot;

pub fn memory_usage(snapshot: &UsageSnapshot) -> Result<MemoryUsage, ManagerError> {
    let used = snapshot
        .memory_stats
        .usage
        .ok_or(ManagerError::MissingField("memory_stats.usage"))? as f64;
    let limit = snapshot
        .memory_stats
        .limit
        .ok_or(ManagerError::MissingField("memory_stats.limit"))? as f64;

    if limit == 0.0 {
        return Err(ManagerError::DegenerateMetric {
            metric: "memory percent",
            reason: "memory limit",
        });
    }

    Ok(MemoryUsage {
        percent: used / limit * 100.0,
        used,
        limit,
    })
}

/// Share of host CPU time used between the daemon's two samples.
pub fn cpu_percent(snapshot: &UsageSnapshot) -> Result<f64, ManagerError> {
    let cpu_total = snapshot
        .cpu_stats
        .total_usage()
        .ok_or(ManagerError::MissingField("cpu_stats.cpu_usage.total_usage"))?;
    let precpu_total = snapshot
        .precpu_stats
        .total_usage()
        .ok_or(ManagerError::MissingField("precpu_stats.cpu_usage.total_usage"))?;
    let system = snapshot
        .cpu_stats
        .system_cpu_usage
        .ok_or(ManagerError::MissingField("cpu_stats.system_cpu_usage"))?;
    let presystem = snapshot
        .precpu_stats
        .system_cpu_usage
        .ok_or(ManagerError::MissingField("precpu_stats.system_cpu_usage"))?;

    // Counters can go backwards across a daemon restart, so work in f64.
    let cpu_delta = cpu_total as f64 - precpu_total as f64;
    let system_delta = system as f64 - presystem as f64;

    if system_delta == 0.0 {
        return Err(ManagerError::DegenerateMetric {
            metric: "cpu percent",
            reason: "system cpu delta",
        });
    }

    Ok(cpu_delta / system_delta * 100.0)
}
