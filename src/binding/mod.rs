// ABOUTME: Parsers for human-written port and volume specs.
// ABOUTME: Turns "8080:80/tcp" and "src:dst:ro" strings into typed bindings.

mod port;
mod volume;

pub use port::{DEFAULT_HOST_IP, PortBinding, Protocol, parse_port_spec};
pub use volume::{AccessMode, VolumeBinding, parse_volume_spec};

/// A port or volume spec that does not follow its grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    #[error("invalid port spec '{spec}': {reason}")]
    Port { spec: String, reason: String },

    #[error("invalid volume spec '{spec}': {reason}")]
    Volume { spec: String, reason: String },
}

impl SpecError {
    pub(crate) fn port(spec: &str, reason: impl Into<String>) -> Self {
        SpecError::Port {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn volume(spec: &str, reason: impl Into<String>) -> Self {
        SpecError::Volume {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }

    /// The offending spec string.
    pub fn spec(&self) -> &str {
        match self {
            SpecError::Port { spec, .. } | SpecError::Volume { spec, .. } => spec,
        }
    }
}
