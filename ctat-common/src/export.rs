//! Re-flattens annotated conversations into output rows

use std::collections::HashSet;

use tracing::info;

use crate::annotations::AnnotationStore;
use crate::model::{Bucket, Conversation, ConversationId, IdCell};
use crate::{Error, Result};

/// One row of the exported table
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub id: ConversationId,
    /// Id cell of the source row, written back unchanged
    pub id_cell: IdCell,
    pub user_message: String,
    pub bot_message: String,
    pub customer_feedback: String,
    /// Bucket comments, indexed by [`Bucket::index`]
    pub buckets: [String; Bucket::COUNT],
}

impl OutputRow {
    pub fn bucket(&self, bucket: Bucket) -> &str {
        &self.buckets[bucket.index()]
    }
}

/// Flattened export plus the number of conversations it covers
#[derive(Debug, Clone)]
pub struct Export {
    pub rows: Vec<OutputRow>,
    /// Distinct conversation ids present in `rows`
    pub annotated_conversations: usize,
}

/// Build output rows for every annotated conversation
///
/// Conversations are visited in list order; those without a saved
/// annotation contribute no rows at all.
///
/// # Errors
/// `Error::NothingToExport` when the store is empty.
pub fn export(conversations: &[Conversation], store: &AnnotationStore) -> Result<Export> {
    if store.is_empty() {
        return Err(Error::NothingToExport);
    }

    let mut rows = Vec::new();

    for conversation in conversations {
        let annotation = match store.get(conversation.id()) {
            Some(annotation) if !annotation.is_empty() => annotation,
            _ => continue,
        };

        let last = conversation.len() - 1;
        let feedback = conversation.feedback().unwrap_or_default();

        for (index, message) in conversation.rows().iter().enumerate() {
            // Annotations are conversation-level metadata and go on the first
            // row only. Duplicating them per message changes the output shape.
            let buckets = std::array::from_fn(|i| {
                if index == 0 {
                    annotation.get(&Bucket::ALL[i]).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            });

            rows.push(OutputRow {
                id: message.id.clone(),
                id_cell: message.id_cell.clone(),
                user_message: message.user_message.clone().unwrap_or_default(),
                bot_message: message.bot_message.clone().unwrap_or_default(),
                customer_feedback: if index == last {
                    feedback.to_string()
                } else {
                    String::new()
                },
                buckets,
            });
        }
    }

    let annotated_conversations = rows.iter().map(|row| &row.id).collect::<HashSet<_>>().len();

    info!(
        rows = rows.len(),
        conversations = annotated_conversations,
        "Export prepared"
    );

    Ok(Export {
        rows,
        annotated_conversations,
    })
}
