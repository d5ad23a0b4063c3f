//! Annotation session: conversations, cursor and store as one value
//!
//! A session is created by loading rows and replaced wholesale by the next
//! load. Every reviewer intent is a method on it that either commits fully or
//! returns an error with the session unchanged.

use std::collections::{BTreeSet, HashMap};

use tracing::info;

use crate::annotations::{Annotation, AnnotationStore};
use crate::export::{export, Export};
use crate::ingest::ingest;
use crate::model::{Bucket, Conversation, ConversationId, Row};
use crate::navigator::{NavOutcome, Navigator, Progress};
use crate::workbook;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Session {
    conversations: Vec<Conversation>,
    navigator: Navigator,
    store: AnnotationStore,
}

impl Session {
    /// Start a fresh session from parsed rows
    ///
    /// The cursor starts at the first conversation and the store is empty;
    /// nothing carries over from any previous session.
    ///
    /// # Errors
    /// `Error::EmptyInput` when `rows` is empty.
    pub fn load(rows: Vec<Row>) -> Result<Self> {
        let conversations = ingest(rows)?;
        info!(conversations = conversations.len(), "Session loaded");

        Ok(Self {
            navigator: Navigator::new(conversations.len()),
            conversations,
            store: AnnotationStore::new(),
        })
    }

    /// Validate, parse and load an uploaded workbook
    pub fn from_workbook(file_name: &str, bytes: &[u8]) -> Result<Self> {
        workbook::validate_file_name(file_name)?;
        let rows = workbook::read_rows(bytes)?;
        Self::load(rows)
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn current_index(&self) -> usize {
        self.navigator.current_index()
    }

    pub fn current(&self) -> Result<&Conversation> {
        self.conversations
            .get(self.navigator.current_index())
            .ok_or(Error::NoConversations)
    }

    pub fn progress(&self) -> Option<Progress> {
        self.navigator.progress()
    }

    pub fn next(&mut self) -> NavOutcome {
        self.navigator.next()
    }

    pub fn previous(&mut self) -> NavOutcome {
        self.navigator.previous()
    }

    /// Save an annotation for a conversation of this session
    ///
    /// # Errors
    /// `Error::UnknownConversation` if `id` was not loaded, otherwise as
    /// [`AnnotationStore::save`].
    pub fn save(
        &mut self,
        id: &ConversationId,
        selections: &BTreeSet<Bucket>,
        comments: &HashMap<Bucket, String>,
    ) -> Result<()> {
        if !self.conversations.iter().any(|c| c.id() == id) {
            return Err(Error::UnknownConversation(id.to_string()));
        }
        self.store.save(id, selections, comments)
    }

    /// Saved annotation for `id`, empty if none
    pub fn annotation(&self, id: &ConversationId) -> Annotation {
        self.store.load(id)
    }

    pub fn export(&self) -> Result<Export> {
        export(&self.conversations, &self.store)
    }

    /// Export and encode as an xlsx workbook
    pub fn export_workbook(&self) -> Result<(Vec<u8>, usize)> {
        let export = self.export()?;
        let bytes = workbook::write_rows(&export.rows)?;
        Ok((bytes, export.annotated_conversations))
    }
}
