// ABOUTME: Property and example tests for port and volume spec parsing.
// ABOUTME: Uses proptest for grammar-wide invariants.

use dockhand::binding::{
    AccessMode, DEFAULT_HOST_IP, Protocol, SpecError, parse_port_spec, parse_volume_spec,
};
use proptest::prelude::*;

mod ports {
    use super::*;

    #[test]
    fn host_and_container_default_to_any_address() {
        let bindings = parse_port_spec("8080:80").unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].ip, DEFAULT_HOST_IP);
        assert_eq!(bindings[0].host_port, Some(8080));
        assert_eq!(bindings[0].container_port, 80);
        assert_eq!(bindings[0].protocol, Protocol::Tcp);
    }

    #[test]
    fn ranges_expand_pairwise() {
        let bindings = parse_port_spec("8000-8002:80-82/udp").unwrap();
        let pairs: Vec<_> = bindings
            .iter()
            .map(|b| (b.host_port, b.container_port))
            .collect();
        assert_eq!(pairs, vec![(Some(8000), 80), (Some(8001), 81), (Some(8002), 82)]);
        assert!(bindings.iter().all(|b| b.protocol == Protocol::Udp));
    }

    #[test]
    fn grammar_violations_are_rejected() {
        for spec in [
            "", "abc", "80:abc", "0:80", "80/sctp", "1.2.3.4:5:6:7", "8000-8001:80",
            "bad-ip:80:80", "[::1:80:80", "70000:80",
        ] {
            let err = parse_port_spec(spec).unwrap_err();
            assert!(matches!(err, SpecError::Port { .. }), "{spec} should fail");
        }
    }

    #[test]
    fn ipv6_host_address() {
        let bindings = parse_port_spec("[::1]:8080:80").unwrap();
        assert_eq!(bindings[0].ip, "::1");
    }

    proptest! {
        #[test]
        fn display_round_trips(host in 1u16.., container in 1u16.., udp in any::<bool>()) {
            let proto = if udp { "udp" } else { "tcp" };
            let spec = format!("{host}:{container}/{proto}");
            let bindings = parse_port_spec(&spec).unwrap();
            prop_assert_eq!(bindings.len(), 1);
            prop_assert_eq!(bindings[0].to_string(), spec);
            prop_assert_eq!(parse_port_spec(&bindings[0].to_string()).unwrap(), bindings);
        }

        #[test]
        fn range_length_matches_span(start in 1u16..60000, span in 0u16..16) {
            let spec = format!("{}-{}", start, start + span);
            let bindings = parse_port_spec(&spec).unwrap();
            prop_assert_eq!(bindings.len(), usize::from(span) + 1);
            prop_assert!(bindings.iter().all(|b| b.host_port.is_none()));
        }

        #[test]
        fn explicit_ip_is_kept(a in 1u8.., b in any::<u8>(), port in 1u16..) {
            let ip = format!("{a}.{b}.0.1");
            let bindings = parse_port_spec(&format!("{ip}:{port}:{port}")).unwrap();
            prop_assert_eq!(&bindings[0].ip, &ip);
        }

        #[test]
        fn parser_never_panics(spec in "\\PC{0,24}") {
            let _ = parse_port_spec(&spec);
        }
    }
}

mod volumes {
    use super::*;

    #[test]
    fn missing_mode_is_read_write() {
        let volume = parse_volume_spec("/srv/data:/data").unwrap();
        assert_eq!(volume.access_mode, AccessMode::Rw);
        assert_eq!(volume.bind_string(), "/srv/data:/data:rw");
    }

    #[test]
    fn ro_is_read_only() {
        let volume = parse_volume_spec("data:/data:ro").unwrap();
        assert_eq!(volume.access_mode, AccessMode::Ro);
        assert_eq!(volume.bind_string(), "data:/data:ro");
    }

    #[test]
    fn missing_parts_are_rejected() {
        for spec in ["/only", ":/dst", "/src:", "a:b:c:d"] {
            let err = parse_volume_spec(spec).unwrap_err();
            assert!(matches!(err, SpecError::Volume { .. }), "{spec} should fail");
            assert_eq!(err.spec(), spec);
        }
    }

    proptest! {
        #[test]
        fn any_mode_but_ro_normalizes_to_rw(mode in "[a-z]{1,4}") {
            let volume = parse_volume_spec(&format!("/a:/b:{mode}")).unwrap();
            let expected = if mode == "ro" { AccessMode::Ro } else { AccessMode::Rw };
            prop_assert_eq!(volume.access_mode, expected);
        }
    }
}
