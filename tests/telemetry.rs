// ABOUTME: Integration tests for memory and CPU utilization.
// ABOUTME: Snapshots are decoded from the daemon's JSON stats layout.

mod support;

use dockhand::manager::{Manager, ManagerErrorKind, telemetry};
use dockhand::runtime::UsageSnapshot;
use dockhand::types::ContainerId;
use support::FakeRuntime;

fn snapshot(json: serde_json::Value) -> UsageSnapshot {
    serde_json::from_value(json).unwrap()
}

fn full_snapshot() -> UsageSnapshot {
    snapshot(serde_json::json!({
        "read": "2024-07-09T14:13:56Z",
        "memory_stats": { "usage": 50, "limit": 100, "stats": {} },
        "cpu_stats": {
            "cpu_usage": { "total_usage": 200, "percpu_usage": [100, 100] },
            "system_cpu_usage": 1100,
            "online_cpus": 2
        },
        "precpu_stats": {
            "cpu_usage": { "total_usage": 100 },
            "system_cpu_usage": 1000
        }
    }))
}

mod percentages {
    use super::*;

    #[test]
    fn memory_percent_of_limit() {
        let usage = telemetry::memory_usage(&full_snapshot()).unwrap();
        assert_eq!(usage.percent, 50.0);
        assert_eq!(usage.used, 50.0);
        assert_eq!(usage.limit, 100.0);
    }

    #[test]
    fn cpu_percent_of_system_delta() {
        assert_eq!(telemetry::cpu_percent(&full_snapshot()).unwrap(), 100.0);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let snap = full_snapshot();
        assert_eq!(snap.cpu_stats.online_cpus, Some(2));
    }
}

mod degenerate {
    use super::*;

    #[test]
    fn zero_memory_limit() {
        let snap = snapshot(serde_json::json!({
            "memory_stats": { "usage": 50, "limit": 0 }
        }));
        let err = telemetry::memory_usage(&snap).unwrap_err();
        assert_eq!(err.kind(), ManagerErrorKind::DegenerateMetric);
    }

    #[test]
    fn zero_system_delta() {
        let snap = snapshot(serde_json::json!({
            "cpu_stats": { "cpu_usage": { "total_usage": 200 }, "system_cpu_usage": 1000 },
            "precpu_stats": { "cpu_usage": { "total_usage": 100 }, "system_cpu_usage": 1000 }
        }));
        let err = telemetry::cpu_percent(&snap).unwrap_err();
        assert_eq!(err.kind(), ManagerErrorKind::DegenerateMetric);
    }

    #[test]
    fn first_sample_without_precpu_is_missing_field() {
        let snap = snapshot(serde_json::json!({
            "cpu_stats": { "cpu_usage": { "total_usage": 200 }, "system_cpu_usage": 1000 },
            "precpu_stats": { "cpu_usage": {} }
        }));
        let err = telemetry::cpu_percent(&snap).unwrap_err();
        assert_eq!(err.kind(), ManagerErrorKind::MissingField);
        assert!(err.to_string().contains("precpu_stats.cpu_usage.total_usage"));
    }

    #[test]
    fn empty_document_is_missing_memory_usage() {
        let err = telemetry::memory_usage(&snapshot(serde_json::json!({}))).unwrap_err();
        assert_eq!(err.kind(), ManagerErrorKind::MissingField);
    }
}

mod through_manager {
    use super::*;

    #[tokio::test]
    async fn usage_comes_from_one_snapshot_each() {
        let manager = Manager::new(FakeRuntime::new().with_snapshot(full_snapshot()));
        let id = ContainerId::new("abc");

        assert_eq!(manager.memory_usage(&id).await.unwrap().percent, 50.0);
        assert_eq!(manager.cpu_usage(&id).await.unwrap(), 100.0);
        assert_eq!(manager.runtime().calls(), vec!["stats abc", "stats abc"]);
    }

    #[tokio::test]
    async fn unknown_container_is_not_found() {
        let manager = Manager::new(FakeRuntime::new());
        let err = manager
            .memory_usage(&ContainerId::new("ghost"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ManagerErrorKind::NotFound);
    }
}
