// ABOUTME: Library root for dockhand - container, image and network management.
// ABOUTME: The dockhand binary is in main.rs.

pub mod binding;
pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod output;
pub mod runtime;
pub mod types;
