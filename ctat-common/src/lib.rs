//! # CTAT Common Library
//!
//! Core of the conversation transcript annotation tool:
//! - Data model (rows, conversations, buckets)
//! - Tabular ingestion and stable grouping by conversation id
//! - Navigation cursor and in-memory annotation store
//! - Export back into the original tabular shape
//! - xlsx codec and configuration loading
//!
//! HTTP concerns live in `ctat-ui`; nothing here performs network I/O.

pub mod annotations;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod model;
pub mod navigator;
pub mod session;
pub mod workbook;

pub use annotations::{Annotation, AnnotationStore};
pub use error::{Error, Result};
pub use export::{export, Export, OutputRow};
pub use ingest::ingest;
pub use model::{Bucket, Conversation, ConversationId, IdCell, Row};
pub use navigator::{NavOutcome, Navigator, Progress};
pub use session::Session;
