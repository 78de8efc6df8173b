//! The serializable fragment metadata record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fragment metadata as stored and as exposed to the HTTP layer.
///
/// Serialized field names follow the wire shape consumed by API clients:
/// `{id, ownerId, created, updated, type, size}`, timestamps in RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentRecord {
    pub id: String,
    pub owner_id: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
}
