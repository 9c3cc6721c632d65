use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::non_empty;

/// Snapshot metadata document (`.baseline/snapshots/<id>.meta.json`).
///
/// A record without an `id` is not a candidate for anything; one without a
/// resolvable `manifest_hash` cannot be replicated. Neither is repaired by
/// fabrication.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SnapshotMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_hash: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SnapshotMeta {
    pub fn id(&self) -> Option<&str> {
        non_empty(&self.id)
    }

    pub fn created_at(&self) -> Option<&str> {
        non_empty(&self.created_at)
    }

    pub fn manifest_hash(&self) -> Option<&str> {
        non_empty(&self.manifest_hash)
    }
}
