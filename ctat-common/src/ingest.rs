//! Tabular ingestor: groups raw rows into conversations

use std::collections::HashMap;

use tracing::debug;

use crate::model::{Conversation, ConversationId, Row};
use crate::{Error, Result};

/// Group rows by id into conversations
///
/// Grouping is stable: conversations appear in first-seen order of their id
/// and rows keep their input order within each conversation. Nothing is
/// sorted.
///
/// # Errors
/// `Error::EmptyInput` when `rows` is empty.
pub fn ingest(rows: Vec<Row>) -> Result<Vec<Conversation>> {
    if rows.is_empty() {
        return Err(Error::EmptyInput);
    }

    let total_rows = rows.len();
    let mut slots: HashMap<ConversationId, usize> = HashMap::new();
    let mut groups: Vec<Vec<Row>> = Vec::new();

    for row in rows {
        match slots.get(&row.id) {
            Some(&slot) => groups[slot].push(row),
            None => {
                slots.insert(row.id.clone(), groups.len());
                groups.push(vec![row]);
            }
        }
    }

    debug!(
        rows = total_rows,
        conversations = groups.len(),
        "Grouped rows into conversations"
    );

    Ok(groups.into_iter().map(Conversation::from_rows).collect())
}
