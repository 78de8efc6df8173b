//! The fragment entity.

use crate::{FragmentError, FragmentResult};
use chrono::{DateTime, Utc};
use fragments_store::{FragmentListing, FragmentRecord, FragmentStore};
use fragments_types::{FragmentId, FragmentType, TargetFormat};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Loosely-typed construction input, as carried by a create request or a
/// raw metadata record from a store.
///
/// `size` stays a JSON value so malformed caller input (a string, a
/// negative number) is rejected by validation rather than by
/// deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FragmentDraft {
    pub id: Option<String>,
    pub owner_id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub size: Option<serde_json::Value>,
}

/// A stored binary payload plus its metadata (owner, type, size,
/// timestamps), bound to the storage collaborator it lives in.
///
/// `id`, `owner_id`, `type` and `created` are immutable after
/// construction: the record fields are private and no mutator exists for
/// them. `size` and `updated` change only through [`Fragment::set_data`]
/// and [`Fragment::save`].
#[derive(Clone)]
pub struct Fragment {
    store: Arc<dyn FragmentStore>,
    record: FragmentRecord,
    fragment_type: FragmentType,
}

impl Fragment {
    /// Creates a fresh fragment with a generated id and zero size.
    ///
    /// Nothing is persisted until [`Fragment::save`] or
    /// [`Fragment::set_data`] is called.
    pub fn create(
        store: Arc<dyn FragmentStore>,
        owner_id: &str,
        content_type: &str,
    ) -> FragmentResult<Self> {
        Self::build(
            store,
            FragmentDraft {
                id: None,
                owner_id: owner_id.to_string(),
                content_type: content_type.to_string(),
                created: None,
                updated: None,
                size: None,
            },
        )
    }

    /// Builds a fragment from a loosely-typed draft, validating every
    /// field.
    pub fn build(store: Arc<dyn FragmentStore>, draft: FragmentDraft) -> FragmentResult<Self> {
        if draft.owner_id.is_empty() {
            return Err(FragmentError::Validation("ownerId is required".to_string()));
        }
        if draft.content_type.is_empty() {
            return Err(FragmentError::Validation("type is required".to_string()));
        }
        let fragment_type = FragmentType::parse(&draft.content_type).ok_or_else(|| {
            FragmentError::Validation(format!(
                "unsupported fragment type: {}",
                draft.content_type
            ))
        })?;
        let size = validate_size(draft.size)?;

        let now = Utc::now();
        let record = FragmentRecord {
            id: draft
                .id
                .unwrap_or_else(|| FragmentId::new().to_string()),
            owner_id: draft.owner_id,
            created: draft.created.unwrap_or(now),
            updated: draft.updated.unwrap_or(now),
            content_type: draft.content_type,
            size,
        };

        Ok(Self {
            store,
            record,
            fragment_type,
        })
    }

    /// Rebuilds a fragment from a stored metadata record.
    fn from_record(store: Arc<dyn FragmentStore>, record: FragmentRecord) -> FragmentResult<Self> {
        let fragment_type = FragmentType::parse(&record.content_type).ok_or_else(|| {
            FragmentError::Validation(format!(
                "unsupported fragment type: {}",
                record.content_type
            ))
        })?;
        Ok(Self {
            store,
            record,
            fragment_type,
        })
    }

    // ── Persistence ──────────────────────────────────────────────

    /// Persists the metadata record, refreshing `updated`.
    pub async fn save(&mut self) -> FragmentResult<()> {
        self.record.updated = Utc::now();
        self.store
            .write_fragment(self.record.clone())
            .await
            .map_err(|err| {
                warn!(
                    owner_id = %self.record.owner_id,
                    id = %self.record.id,
                    %err,
                    "failed to save fragment metadata"
                );
                FragmentError::from(err)
            })
    }

    /// Replaces the payload, recomputing `size` and refreshing `updated`.
    ///
    /// The metadata save and the payload write are sequential, not
    /// atomic; concurrent writers to the same fragment must be serialized
    /// by the caller (see the `fragments-store` crate docs).
    pub async fn set_data(&mut self, data: &[u8]) -> FragmentResult<()> {
        self.record.size = data.len() as u64;
        self.save().await?;
        self.store
            .write_fragment_data(&self.record.owner_id, &self.record.id, data.to_vec())
            .await
            .map_err(|err| {
                warn!(
                    owner_id = %self.record.owner_id,
                    id = %self.record.id,
                    %err,
                    "failed to write fragment payload"
                );
                FragmentError::from(err)
            })
    }

    /// Reads the payload bytes.
    pub async fn data(&self) -> FragmentResult<Vec<u8>> {
        self.store
            .read_fragment_data(&self.record.owner_id, &self.record.id)
            .await
            .map_err(FragmentError::from)?
            .ok_or_else(|| FragmentError::NotFound {
                owner_id: self.record.owner_id.clone(),
                id: self.record.id.clone(),
            })
    }

    // ── Directory operations ─────────────────────────────────────

    /// Looks up one fragment for the owner.
    pub async fn by_id(
        store: &Arc<dyn FragmentStore>,
        owner_id: &str,
        id: &str,
    ) -> FragmentResult<Self> {
        let record = store
            .read_fragment(owner_id, id)
            .await
            .map_err(FragmentError::from)?
            .ok_or_else(|| {
                warn!(owner_id, id, "fragment lookup missed");
                FragmentError::NotFound {
                    owner_id: owner_id.to_string(),
                    id: id.to_string(),
                }
            })?;
        Self::from_record(Arc::clone(store), record)
    }

    /// Lists the owner's fragments: ids, or full records when `expand`.
    pub async fn by_user(
        store: &Arc<dyn FragmentStore>,
        owner_id: &str,
        expand: bool,
    ) -> FragmentResult<FragmentListing> {
        store
            .list_fragments(owner_id, expand)
            .await
            .map_err(FragmentError::from)
    }

    /// Deletes the metadata record and the payload for `id`.
    pub async fn delete(
        store: &Arc<dyn FragmentStore>,
        owner_id: &str,
        id: &str,
    ) -> FragmentResult<()> {
        store.delete_fragment(owner_id, id).await.map_err(|err| {
            warn!(owner_id, id, %err, "failed to delete fragment");
            FragmentError::from(err)
        })
    }

    // ── Content negotiation ──────────────────────────────────────

    /// The MIME types this fragment's payload can be served as.
    #[must_use]
    pub fn formats(&self) -> &'static [&'static str] {
        self.fragment_type.formats()
    }

    /// Reads the payload and converts it into `target`.
    pub async fn convert_data(&self, target: TargetFormat) -> FragmentResult<Vec<u8>> {
        let data = self.data().await?;
        fragments_convert::convert(&data, self.fragment_type, target).map_err(|err| {
            warn!(
                owner_id = %self.record.owner_id,
                id = %self.record.id,
                target = %target,
                %err,
                "fragment conversion failed"
            );
            FragmentError::from(err)
        })
    }

    // ── Accessors ────────────────────────────────────────────────

    /// The fragment's id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// The owning principal.
    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.record.owner_id
    }

    /// The full Content-Type string, parameters included.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.record.content_type
    }

    /// The base MIME type, without parameters.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.fragment_type.mime()
    }

    /// The parsed fragment type.
    #[must_use]
    pub fn fragment_type(&self) -> FragmentType {
        self.fragment_type
    }

    /// Payload size in bytes, as last recorded.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.record.size
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created(&self) -> DateTime<Utc> {
        self.record.created
    }

    /// Last metadata or payload write.
    #[must_use]
    pub fn updated(&self) -> DateTime<Utc> {
        self.record.updated
    }

    /// Returns true for `text/*` fragments.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.fragment_type.is_text()
    }

    /// The metadata record exposed to the HTTP layer.
    #[must_use]
    pub fn record(&self) -> &FragmentRecord {
        &self.record
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

fn validate_size(size: Option<serde_json::Value>) -> FragmentResult<u64> {
    match size {
        None | Some(serde_json::Value::Null) => Ok(0),
        Some(value) => {
            if !value.is_number() {
                return Err(FragmentError::Validation(
                    "size must be a number".to_string(),
                ));
            }
            value.as_u64().ok_or_else(|| {
                FragmentError::Validation("size cannot be negative".to_string())
            })
        }
    }
}
