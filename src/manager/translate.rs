// ABOUTME: Translation of raw runtime records into summary entities.
// ABOUTME: State reconciliation, uptime, primary IP, tag expansion and CIDR stripping.

use super::error::ManagerError;
use crate::model::{
    ContainerSummary, ImageSummary, NetworkSummary, SubnetConfig, TIME_FORMAT, Version,
};
use crate::runtime::{
    ContainerInfo, ContainerRecord, ContainerState, HealthState, ImageInfo, ImageRecord,
    NetworkRecord, RuntimeMetadata,
};
use crate::types::{ImageId, NetworkId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Render Unix seconds in UTC.
pub fn format_unix(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Render an RFC 3339 timestamp in UTC; `None` when it does not parse.
pub fn format_rfc3339(timestamp: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| t.with_timezone(&Utc).format(TIME_FORMAT).to_string())
}

/// A healthy container is running whatever the daemon says.
pub fn reconcile_state(state: ContainerState, health: Option<HealthState>) -> ContainerState {
    match health {
        Some(HealthState::Healthy) => ContainerState::Running,
        _ => state,
    }
}

/// Formatted start time of a running container, empty otherwise.
pub fn uptime(state: ContainerState, started_at: Option<&str>) -> String {
    if state != ContainerState::Running {
        return String::new();
    }
    started_at.and_then(format_rfc3339).unwrap_or_default()
}

/// First non-empty address, networks taken in name order.
pub fn primary_ip(networks: &BTreeMap<String, String>) -> String {
    networks
        .values()
        .find(|ip| !ip.is_empty())
        .cloned()
        .unwrap_or_default()
}

/// Summarize a listed container, refined by its inspect details when available.
pub fn container_summary(record: &ContainerRecord, info: Option<&ContainerInfo>) -> ContainerSummary {
    let state = reconcile_state(record.state, info.and_then(|i| i.health));
    let started_at = info.and_then(|i| i.started_at.as_deref());

    ContainerSummary {
        id: record.id.clone(),
        name: record.name().to_string(),
        image: record.image.clone(),
        state,
        created: format_unix(record.created),
        uptime: uptime(state, started_at),
        ip: primary_ip(&record.networks),
        labels: record.labels.clone(),
    }
}

/// Split `name:tag` on its first colon. A reference without a colon has an
/// empty tag.
pub fn split_repo_tag(repo_tag: &str) -> (String, String) {
    match repo_tag.split_once(':') {
        Some((name, tag)) => (name.to_string(), tag.to_string()),
        None => (repo_tag.to_string(), String::new()),
    }
}

/// Bytes as decimal megabytes with two decimals, e.g. `187.32MB`.
pub fn format_size(bytes: i64) -> String {
    format!("{:.2}MB", bytes as f64 / 1_000_000.0)
}

fn image_summary(id: &ImageId, repo_tag: &str, created: String, size: i64) -> ImageSummary {
    let (name, tag) = split_repo_tag(repo_tag);
    ImageSummary {
        id: id.clone(),
        name,
        tag,
        created,
        size: format_size(size),
    }
}

/// One summary per repo tag; untagged images yield nothing.
pub fn image_summaries(record: &ImageRecord) -> Vec<ImageSummary> {
    let created = format_unix(record.created);
    record
        .repo_tags
        .iter()
        .map(|repo_tag| image_summary(&record.id, repo_tag, created.clone(), record.size))
        .collect()
}

/// Summary of the image's first repo tag; `NoTag` when it has none.
pub fn image_summary_from_info(info: &ImageInfo) -> Result<ImageSummary, ManagerError> {
    let repo_tag = info
        .repo_tags
        .first()
        .ok_or_else(|| ManagerError::NoTag(info.id.to_string()))?;
    let created = format_rfc3339(&info.created).unwrap_or_default();
    Ok(image_summary(&info.id, repo_tag, created, info.size))
}

/// `172.20.0.5/24` becomes `172.20.0.5`.
pub fn strip_cidr(address: &str) -> &str {
    address
        .split_once('/')
        .map(|(ip, _)| ip)
        .unwrap_or(address)
}

pub fn network_summary(record: NetworkRecord) -> NetworkSummary {
    let subnets = record
        .ipam_pools
        .into_iter()
        .map(|pool| SubnetConfig {
            subnet: pool.subnet,
            gateway: pool.gateway,
        })
        .collect();

    let containers = record
        .containers
        .into_iter()
        .map(|(id, member)| {
            let ip = strip_cidr(&member.ipv4_address).to_string();
            (id, ip)
        })
        .collect();

    NetworkSummary {
        id: NetworkId::new(record.id),
        name: record.name,
        driver: record.driver,
        scope: record.scope,
        created: format_rfc3339(&record.created).unwrap_or_default(),
        internal: record.internal,
        subnets,
        containers,
        labels: record.labels,
    }
}

pub fn version(meta: RuntimeMetadata) -> Version {
    Version {
        docker_version: meta.version,
        api_version: meta.api_version,
        min_api_version: meta.min_api_version,
        git_commit: meta.git_commit,
        go_version: meta.go_version,
        os: meta.os,
        arch: meta.arch,
    }
}
