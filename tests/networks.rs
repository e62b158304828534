// ABOUTME: Integration tests for network operations.
// ABOUTME: Summaries, lookups, creation and container membership.

mod support;

use dockhand::manager::{Manager, ManagerErrorKind, Resource};
use dockhand::manager::ManagerError;
use dockhand::runtime::IpamPool;
use dockhand::types::{ContainerId, NetworkId};
use std::collections::HashMap;
use support::{FakeRuntime, container_info, member, network_record};

fn populated_runtime() -> FakeRuntime {
    let mut edge = network_record("net-edge-id", "edge");
    edge.ipam_pools = vec![
        IpamPool {
            subnet: "172.20.0.0/16".to_string(),
            gateway: "172.20.0.1".to_string(),
        },
        IpamPool {
            subnet: "fd00::/64".to_string(),
            gateway: String::new(),
        },
    ];
    edge.containers
        .insert("ctr-1".to_string(), member("web", "172.20.0.5/24"));
    edge.containers.insert("ctr-2".to_string(), member("db", ""));
    edge.labels.insert("team".to_string(), "infra".to_string());

    let runtime = FakeRuntime::new().with_network("net-bridge-id", "bridge");
    runtime.state.lock().networks.push(edge);
    runtime
}

mod summaries {
    use super::*;

    #[tokio::test]
    async fn member_addresses_lose_cidr_suffix() {
        let manager = Manager::new(populated_runtime());

        let edge = manager.network_by_name("edge").await.unwrap();

        assert_eq!(edge.containers["ctr-1"], "172.20.0.5");
        assert_eq!(edge.containers["ctr-2"], "");
    }

    #[tokio::test]
    async fn one_subnet_per_ipam_pool_in_order() {
        let manager = Manager::new(populated_runtime());

        let edge = manager.network_by_name("edge").await.unwrap();

        assert_eq!(edge.subnets.len(), 2);
        assert_eq!(edge.subnets[0].subnet, "172.20.0.0/16");
        assert_eq!(edge.subnets[0].gateway, "172.20.0.1");
        assert_eq!(edge.subnets[1].subnet, "fd00::/64");
        assert_eq!(edge.created, "2024-07-09 14:14:31");
        assert_eq!(edge.labels["team"], "infra");
    }

    #[tokio::test]
    async fn list_and_lookup_by_id_agree() {
        let manager = Manager::new(populated_runtime());

        let listed = manager.list_networks().await.unwrap();
        let by_id = manager
            .network_by_id(&NetworkId::new("net-edge-id"))
            .await
            .unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1], by_id);
    }
}

mod lookups {
    use super::*;

    #[tokio::test]
    async fn exists_compares_exact_names() {
        let manager = Manager::new(populated_runtime());

        assert!(manager.network_exists("edge").await.unwrap());
        assert!(!manager.network_exists("edg").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let manager = Manager::new(populated_runtime());

        let err = manager.network_by_name("missing").await.unwrap_err();

        assert!(matches!(
            err,
            ManagerError::NotFound {
                resource: Resource::Network,
                ..
            }
        ));
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn create_is_attachable_with_one_pool() {
        let manager = Manager::new(FakeRuntime::new());
        let labels = HashMap::from([("team".to_string(), "infra".to_string())]);

        let id = manager
            .create_network("edge", "bridge", "172.20.0.0/16", "172.20.0.1", labels)
            .await
            .unwrap();

        assert_eq!(id.as_str(), "net-edge");
        let state = manager.runtime().state.lock();
        let config = &state.created_networks[0];
        assert!(config.attachable);
        assert!(!config.internal);
        assert_eq!(config.driver.as_deref(), Some("bridge"));
        assert_eq!(config.subnet.as_deref(), Some("172.20.0.0/16"));
        assert_eq!(config.gateway.as_deref(), Some("172.20.0.1"));
        assert_eq!(config.labels["team"], "infra");
    }

    #[tokio::test]
    async fn empty_strings_defer_to_daemon() {
        let manager = Manager::new(FakeRuntime::new());

        manager
            .create_network("plain", "", "", "", HashMap::new())
            .await
            .unwrap();

        let state = manager.runtime().state.lock();
        let config = &state.created_networks[0];
        assert!(config.driver.is_none());
        assert!(config.subnet.is_none());
        assert!(config.gateway.is_none());
    }

    #[tokio::test]
    async fn delete_and_prune_pass_through() {
        let manager = Manager::new(FakeRuntime::new());

        manager
            .delete_network(&NetworkId::new("net-1"))
            .await
            .unwrap();
        manager.prune_networks().await.unwrap();

        assert_eq!(
            manager.runtime().calls(),
            vec!["remove-network net-1", "prune-networks"]
        );
    }
}

mod membership {
    use super::*;

    fn runtime_with_container() -> FakeRuntime {
        populated_runtime().with_inspection(container_info(
            "ctr-9",
            None,
            None,
        ))
    }

    #[tokio::test]
    async fn join_checks_both_then_connects() {
        let manager = Manager::new(runtime_with_container());

        manager
            .join_network(&ContainerId::new("ctr-9"), &NetworkId::new("net-edge-id"))
            .await
            .unwrap();

        assert_eq!(
            manager.runtime().calls(),
            vec![
                "inspect-network net-edge-id",
                "inspect-container ctr-9",
                "connect ctr-9 net-edge-id"
            ]
        );
    }

    #[tokio::test]
    async fn leave_forces_disconnect() {
        let manager = Manager::new(runtime_with_container());

        manager
            .leave_network(&ContainerId::new("ctr-9"), &NetworkId::new("edge"))
            .await
            .unwrap();

        assert!(manager.runtime().called("disconnect ctr-9 edge force=true"));
    }

    #[tokio::test]
    async fn join_with_unknown_container_does_not_connect() {
        let manager = Manager::new(populated_runtime());

        let err = manager
            .join_network(&ContainerId::new("ghost"), &NetworkId::new("edge"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ManagerErrorKind::NotFound);
        assert!(!manager.runtime().called("connect"));
    }

    #[tokio::test]
    async fn join_with_unknown_network_does_not_inspect_container() {
        let manager = Manager::new(runtime_with_container());

        let err = manager
            .join_network(&ContainerId::new("ctr-9"), &NetworkId::new("nowhere"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ManagerErrorKind::NotFound);
        assert!(!manager.runtime().called("inspect-container"));
    }
}
