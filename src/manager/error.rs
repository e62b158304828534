// ABOUTME: Error taxonomy of the manager facade.
// ABOUTME: Maps gateway errors onto NotFound/InvalidSpec/Runtime and friends.

use crate::binding::SpecError;
use crate::runtime::{
    ContainerError, ImageError, LogError, NetworkError, RuntimeInfoError, StatsError,
};
use std::fmt;
use thiserror::Error;

/// The kind of runtime object an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Container,
    Image,
    Network,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Container => write!(f, "container"),
            Resource::Image => write!(f, "image"),
            Resource::Network => write!(f, "network"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("{resource} not found: {name}")]
    NotFound { resource: Resource, name: String },

    #[error(transparent)]
    InvalidSpec(#[from] SpecError),

    #[error("{operation} failed: {message}")]
    Runtime {
        operation: &'static str,
        message: String,
    },

    #[error("image {0} has no tags")]
    NoTag(String),

    #[error("{metric} is undefined: {reason} is zero")]
    DegenerateMetric {
        metric: &'static str,
        reason: &'static str,
    },

    #[error("usage snapshot has no {0}")]
    MissingField(&'static str),

    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerErrorKind {
    NotFound,
    InvalidSpec,
    Runtime,
    NoTag,
    DegenerateMetric,
    MissingField,
    Io,
}

impl ManagerError {
    pub fn kind(&self) -> ManagerErrorKind {
        match self {
            ManagerError::NotFound { .. } => ManagerErrorKind::NotFound,
            ManagerError::InvalidSpec(_) => ManagerErrorKind::InvalidSpec,
            ManagerError::Runtime { .. } => ManagerErrorKind::Runtime,
            ManagerError::NoTag(_) => ManagerErrorKind::NoTag,
            ManagerError::DegenerateMetric { .. } => ManagerErrorKind::DegenerateMetric,
            ManagerError::MissingField(_) => ManagerErrorKind::MissingField,
            ManagerError::Io { .. } => ManagerErrorKind::Io,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ManagerErrorKind::NotFound
    }

    pub(crate) fn not_found(resource: Resource, name: impl Into<String>) -> Self {
        ManagerError::NotFound {
            resource,
            name: name.into(),
        }
    }

    pub(crate) fn io(path: impl fmt::Display) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_string();
        move |source| ManagerError::Io { path, source }
    }

    fn runtime(operation: &'static str, message: impl fmt::Display) -> Self {
        ManagerError::Runtime {
            operation,
            message: message.to_string(),
        }
    }

    /// Mapper for container gateway errors about `id`.
    pub(crate) fn container(
        operation: &'static str,
        id: impl fmt::Display,
    ) -> impl FnOnce(ContainerError) -> Self {
        let id = id.to_string();
        move |e| match e {
            ContainerError::NotFound(_) => Self::not_found(Resource::Container, id),
            ContainerError::ImageNotFound(image) => Self::not_found(Resource::Image, image),
            other => Self::runtime(operation, other),
        }
    }

    /// Mapper for image gateway errors about `reference`.
    pub(crate) fn image(
        operation: &'static str,
        reference: impl fmt::Display,
    ) -> impl FnOnce(ImageError) -> Self {
        let reference = reference.to_string();
        move |e| match e {
            ImageError::NotFound(_) => Self::not_found(Resource::Image, reference),
            other => Self::runtime(operation, other),
        }
    }

    /// Mapper for network gateway errors about `name`.
    pub(crate) fn network(
        operation: &'static str,
        name: impl fmt::Display,
    ) -> impl FnOnce(NetworkError) -> Self {
        let name = name.to_string();
        move |e| match e {
            NetworkError::NotFound(_) => Self::not_found(Resource::Network, name),
            other => Self::runtime(operation, other),
        }
    }
}

impl From<StatsError> for ManagerError {
    fn from(e: StatsError) -> Self {
        match e {
            StatsError::ContainerNotFound(id) => Self::not_found(Resource::Container, id),
            other => Self::runtime("usage snapshot", other),
        }
    }
}

impl From<LogError> for ManagerError {
    fn from(e: LogError) -> Self {
        match e {
            LogError::ContainerNotFound(id) => Self::not_found(Resource::Container, id),
            other => Self::runtime("container logs", other),
        }
    }
}

impl From<RuntimeInfoError> for ManagerError {
    fn from(e: RuntimeInfoError) -> Self {
        Self::runtime("version", e)
    }
}
