// ABOUTME: Type-safe identifiers shared by the runtime gateway and the manager.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;

pub use id::{ContainerId, Id, ImageId, NetworkId};
