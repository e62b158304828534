// ABOUTME: Volume spec parsing: source:destination[:mode].
// ABOUTME: Any mode other than "ro" normalizes to read-write.

use super::SpecError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access mode of a bind mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    Ro,
    #[default]
    Rw,
}

impl AccessMode {
    /// Only the literal `ro` is read-only.
    pub fn from_mode(mode: &str) -> Self {
        if mode == "ro" {
            AccessMode::Ro
        } else {
            AccessMode::Rw
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::Ro => "ro",
            AccessMode::Rw => "rw",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A host path bound into a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBinding {
    pub source: String,
    pub destination: String,
    pub access_mode: AccessMode,
}

impl VolumeBinding {
    /// Bind string handed to the runtime, e.g. `/data:/app/data:ro`.
    pub fn bind_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VolumeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.destination, self.access_mode)
    }
}

/// Parse a `source:destination[:mode]` volume spec.
pub fn parse_volume_spec(spec: &str) -> Result<VolumeBinding, SpecError> {
    let fields: Vec<&str> = spec.trim().split(':').collect();
    let (source, destination, mode) = match fields.as_slice() {
        [source, destination] => (*source, *destination, None),
        [source, destination, mode] => (*source, *destination, Some(*mode)),
        [_] => return Err(SpecError::volume(spec, "missing destination")),
        _ => return Err(SpecError::volume(spec, "too many ':' separated fields")),
    };

    if source.is_empty() {
        return Err(SpecError::volume(spec, "missing source"));
    }
    if destination.is_empty() {
        return Err(SpecError::volume(spec, "missing destination"));
    }

    Ok(VolumeBinding {
        source: source.to_string(),
        destination: destination.to_string(),
        access_mode: mode.map(AccessMode::from_mode).unwrap_or_default(),
    })
}
