//! In-memory annotation store keyed by conversation id

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::model::{Bucket, ConversationId};
use crate::{Error, Result};

/// Buckets checked for one conversation, each with a trimmed comment
///
/// Iteration follows the fixed bucket order.
pub type Annotation = BTreeMap<Bucket, String>;

/// Session-scoped mapping from conversation id to its annotation
///
/// Entries only come into existence through [`AnnotationStore::save`], and a
/// stored annotation always has at least one bucket.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    entries: HashMap<ConversationId, Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the annotation for `id` with exactly the selected buckets
    ///
    /// Comments are trimmed; a selected bucket without a comment gets `""`.
    /// Comments for unselected buckets are ignored, and buckets stored by a
    /// previous save but not selected now are dropped.
    ///
    /// # Errors
    /// `Error::NoBucketSelected` when `selections` is empty. The existing
    /// entry for `id`, if any, is left untouched.
    pub fn save(
        &mut self,
        id: &ConversationId,
        selections: &BTreeSet<Bucket>,
        comments: &HashMap<Bucket, String>,
    ) -> Result<()> {
        if selections.is_empty() {
            return Err(Error::NoBucketSelected);
        }

        let annotation: Annotation = selections
            .iter()
            .map(|bucket| {
                let comment = comments
                    .get(bucket)
                    .map(|c| c.trim().to_string())
                    .unwrap_or_default();
                (*bucket, comment)
            })
            .collect();

        debug!(conversation_id = %id, buckets = annotation.len(), "Annotation saved");
        self.entries.insert(id.clone(), annotation);
        Ok(())
    }

    /// Saved annotation for `id`, or an empty one if never saved
    pub fn load(&self, id: &ConversationId) -> Annotation {
        self.entries.get(id).cloned().unwrap_or_default()
    }

    pub fn get(&self, id: &ConversationId) -> Option<&Annotation> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
