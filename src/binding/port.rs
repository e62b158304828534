// ABOUTME: Port spec parsing: [ip:][hostPort:]containerPort[/proto].
// ABOUTME: Ranges expand into one binding per port pair.

use super::SpecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Host address used when a spec does not name one.
pub const DEFAULT_HOST_IP: &str = "0.0.0.0";

/// Transport protocol of a published port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            other => Err(format!("unsupported protocol '{other}'")),
        }
    }
}

/// One container port published (or only exposed) on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBinding {
    pub protocol: Protocol,
    /// Host address; `0.0.0.0` unless the spec named one.
    pub ip: String,
    /// `None` for an ephemeral host port or an exposed-only port.
    pub host_port: Option<u16>,
    pub container_port: u16,
    /// Whether the spec named a host side (address or port field).
    /// An unpublished binding is only exposed.
    pub published: bool,
}

impl PortBinding {
    /// Key the runtime uses for exposed ports and binding tables, e.g. `80/tcp`.
    pub fn port_key(&self) -> String {
        format!("{}/{}", self.container_port, self.protocol)
    }
}

impl fmt::Display for PortBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.host_port {
            Some(host) => write!(f, "{}:{}/{}", host, self.container_port, self.protocol),
            None if self.published && self.ip.contains(':') => {
                write!(f, "[{}]::{}/{}", self.ip, self.container_port, self.protocol)
            }
            None if self.published => {
                write!(f, "{}::{}/{}", self.ip, self.container_port, self.protocol)
            }
            None => write!(f, "{}/{}", self.container_port, self.protocol),
        }
    }
}

/// Parse a port spec into its bindings.
///
/// Accepted forms:
/// - `80`, `80/udp` (exposed, no host port)
/// - `8080:80`, `8080:80/tcp`
/// - `127.0.0.1:8080:80`, `127.0.0.1::80`, `[::1]:8080:80`
/// - `8000-8001:80-81`, `80-81` (one binding per port)
pub fn parse_port_spec(spec: &str) -> Result<Vec<PortBinding>, SpecError> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(SpecError::port(spec, "empty spec"));
    }

    let (ports_part, protocol) = match trimmed.rsplit_once('/') {
        Some((rest, proto)) => (
            rest,
            proto
                .parse::<Protocol>()
                .map_err(|reason| SpecError::port(spec, reason))?,
        ),
        None => (trimmed, Protocol::Tcp),
    };

    let (ip, host, container) = split_fields(spec, ports_part)?;
    let published = ip.is_some() || host.is_some();

    let ip = match ip {
        None | Some("") => DEFAULT_HOST_IP.to_string(),
        Some(addr) => {
            addr.parse::<IpAddr>()
                .map_err(|_| SpecError::port(spec, format!("invalid host ip '{addr}'")))?;
            addr.to_string()
        }
    };

    let (container_start, container_end) = parse_range(spec, container)?;
    let container_ports = container_start..=container_end;

    let host_ports: Vec<Option<u16>> = match host {
        None | Some("") => container_ports.clone().map(|_| None).collect(),
        Some(host) => {
            let (start, end) = parse_range(spec, host)?;
            if end - start != container_end - container_start {
                return Err(SpecError::port(
                    spec,
                    "host and container port ranges differ in length",
                ));
            }
            (start..=end).map(Some).collect()
        }
    };

    Ok(container_ports
        .zip(host_ports)
        .map(|(container_port, host_port)| PortBinding {
            protocol,
            ip: ip.clone(),
            host_port,
            container_port,
            published,
        })
        .collect())
}

/// Split `[ip:][host:]container` into its fields.
fn split_fields<'a>(
    spec: &str,
    ports: &'a str,
) -> Result<(Option<&'a str>, Option<&'a str>, &'a str), SpecError> {
    // Bracketed IPv6 host address.
    if let Some(rest) = ports.strip_prefix('[') {
        let (addr, rest) = rest
            .split_once("]:")
            .ok_or_else(|| SpecError::port(spec, "unterminated IPv6 address"))?;
        let (host, container) = rest
            .split_once(':')
            .ok_or_else(|| SpecError::port(spec, "missing container port"))?;
        return Ok((Some(addr), Some(host), container));
    }

    let fields: Vec<&str> = ports.split(':').collect();
    match fields.as_slice() {
        [container] => Ok((None, None, container)),
        [host, container] => Ok((None, Some(host), container)),
        [ip, host, container] => Ok((Some(ip), Some(host), container)),
        _ => Err(SpecError::port(spec, "too many ':' separated fields")),
    }
}

/// Parse `80` or `80-90` into an inclusive range.
fn parse_range(spec: &str, value: &str) -> Result<(u16, u16), SpecError> {
    match value.split_once('-') {
        Some((start, end)) => {
            let start = parse_port(spec, start)?;
            let end = parse_port(spec, end)?;
            if end < start {
                return Err(SpecError::port(spec, format!("invalid range '{value}'")));
            }
            Ok((start, end))
        }
        None => {
            let port = parse_port(spec, value)?;
            Ok((port, port))
        }
    }
}

fn parse_port(spec: &str, value: &str) -> Result<u16, SpecError> {
    match value.parse::<u16>() {
        Ok(0) => Err(SpecError::port(spec, "port 0 is not allowed")),
        Ok(port) => Ok(port),
        Err(_) => Err(SpecError::port(spec, format!("invalid port '{value}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_port_only() {
        let bindings = parse_port_spec("80").unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].host_port, None);
        assert_eq!(bindings[0].container_port, 80);
        assert_eq!(bindings[0].ip, DEFAULT_HOST_IP);
    }

    #[test]
    fn explicit_ip_is_kept() {
        let bindings = parse_port_spec("127.0.0.1:8080:80/udp").unwrap();
        assert_eq!(bindings[0].ip, "127.0.0.1");
        assert_eq!(bindings[0].host_port, Some(8080));
        assert_eq!(bindings[0].protocol, Protocol::Udp);
    }

    #[test]
    fn ip_with_empty_host_port() {
        let bindings = parse_port_spec("127.0.0.1::80").unwrap();
        assert_eq!(bindings[0].ip, "127.0.0.1");
        assert_eq!(bindings[0].host_port, None);
        assert!(bindings[0].published);
        assert_eq!(bindings[0].to_string(), "127.0.0.1::80/tcp");
    }

    #[test]
    fn container_port_alone_is_not_published() {
        assert!(!parse_port_spec("80").unwrap()[0].published);
        assert!(parse_port_spec("8080:80").unwrap()[0].published);
    }

    #[test]
    fn bracketed_ipv6() {
        let bindings = parse_port_spec("[::1]:8080:80").unwrap();
        assert_eq!(bindings[0].ip, "::1");
        assert_eq!(bindings[0].host_port, Some(8080));
    }

    #[test]
    fn ranges_expand_pairwise() {
        let bindings = parse_port_spec("8000-8002:80-82").unwrap();
        let pairs: Vec<_> = bindings
            .iter()
            .map(|b| (b.host_port, b.container_port))
            .collect();
        assert_eq!(
            pairs,
            vec![(Some(8000), 80), (Some(8001), 81), (Some(8002), 82)]
        );
    }

    #[test]
    fn mismatched_ranges_rejected() {
        assert!(parse_port_spec("8000-8005:80-81").is_err());
    }

    #[test]
    fn bad_input_rejected() {
        for spec in ["", "abc", "80/icmp", "0:80", "1:2:3:4", "70000:80", "90-80", "x.y:80:80"] {
            assert!(parse_port_spec(spec).is_err(), "{spec} should fail");
        }
    }

    #[test]
    fn port_key_uses_container_side() {
        let bindings = parse_port_spec("8080:80").unwrap();
        assert_eq!(bindings[0].port_key(), "80/tcp");
    }
}
