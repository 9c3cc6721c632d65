mod config;
mod registry;
mod snapshot;

pub use self::config::{ProjectConfig, WorkspaceConfig};
pub use self::registry::{ProjectEntry, Registry, WorkspaceEntry};
pub use self::snapshot::SnapshotMeta;

// Registry and config documents written by interrupted runs may carry
// fields that are present but blank; both shapes count as absent.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
