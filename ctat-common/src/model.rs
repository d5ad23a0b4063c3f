//! Core data model: rows, conversations and buckets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column header for the conversation identifier
pub const ID_COLUMN: &str = "Id";
/// Column header for the customer utterance
pub const USER_MESSAGE_COLUMN: &str = "llmGeneratedUserMessage";
/// Column header for the bot utterance
pub const BOT_MESSAGE_COLUMN: &str = "botMessage";
/// Column header for the terminal sentiment label
pub const FEEDBACK_COLUMN: &str = "Customer Feedback";

/// Opaque conversation identifier
///
/// Spreadsheet cells may hold the id as text or as a number; both are reduced
/// to their canonical text so `1` and `"1"` group together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for ConversationId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Id exactly as the source cell held it
///
/// Grouping uses the canonical [`ConversationId`]; export writes this back so
/// a text cell stays text and a number keeps its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IdCell {
    Text(String),
    Number(f64),
}

impl IdCell {
    /// Grouping key for this cell
    pub fn key(&self) -> ConversationId {
        match self {
            IdCell::Text(text) => ConversationId::new(text.clone()),
            // f64 Display renders whole numbers without a fraction
            IdCell::Number(n) => ConversationId::new(n.to_string()),
        }
    }
}

/// One record of the input table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: ConversationId,
    pub id_cell: IdCell,
    pub user_message: Option<String>,
    pub bot_message: Option<String>,
    pub customer_feedback: Option<String>,
}

impl Row {
    /// Create a row with only a text id; text fields are absent
    pub fn new(id: impl Into<ConversationId>) -> Self {
        let id = id.into();
        Self {
            id_cell: IdCell::Text(id.as_str().to_string()),
            id,
            user_message: None,
            bot_message: None,
            customer_feedback: None,
        }
    }

    /// Create a row keyed by a spreadsheet id cell
    pub fn from_id_cell(id_cell: IdCell) -> Self {
        Self {
            id: id_cell.key(),
            id_cell,
            user_message: None,
            bot_message: None,
            customer_feedback: None,
        }
    }

    pub fn with_user_message(mut self, text: impl Into<String>) -> Self {
        self.user_message = Some(text.into());
        self
    }

    pub fn with_bot_message(mut self, text: impl Into<String>) -> Self {
        self.bot_message = Some(text.into());
        self
    }

    pub fn with_feedback(mut self, label: impl Into<String>) -> Self {
        self.customer_feedback = Some(label.into());
        self
    }
}

/// Ordered, non-empty group of rows sharing one id
///
/// Only the ingestor builds conversations, so the non-empty invariant holds
/// for every instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    rows: Vec<Row>,
}

impl Conversation {
    pub(crate) fn from_rows(rows: Vec<Row>) -> Self {
        debug_assert!(!rows.is_empty());
        Self { rows }
    }

    /// Canonical id, taken from the first row
    pub fn id(&self) -> &ConversationId {
        &self.rows[0].id
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Feedback label of the last row, if any
    pub fn feedback(&self) -> Option<&str> {
        self.rows
            .last()
            .and_then(|row| row.customer_feedback.as_deref())
    }

    /// Case-insensitive `negative` check, used for display styling only
    pub fn has_negative_feedback(&self) -> bool {
        self.feedback()
            .map(|label| label.eq_ignore_ascii_case("negative"))
            .unwrap_or(false)
    }
}

/// Fixed topical category a reviewer can tag a conversation with
///
/// Declaration order is the export column order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "Bot Response")]
    BotResponse,
    #[serde(rename = "HVA")]
    Hva,
    #[serde(rename = "AB feature/HVA Related Query")]
    AbFeatureHvaQuery,
    #[serde(rename = "Personalized/Account-Specific Queries")]
    PersonalizedAccountQueries,
    #[serde(rename = "Promo & Freebie Related Queries")]
    PromoFreebieQueries,
    #[serde(rename = "Help-page/Direct Customer Service")]
    HelpPageCustomerService,
    #[serde(rename = "BP for Non-Profit Organisation Related Query")]
    NonProfitQuery,
    #[serde(rename = "Personal Prime Related Query")]
    PersonalPrimeQuery,
    #[serde(rename = "Customer Behavior")]
    CustomerBehavior,
    #[serde(rename = "Other Queries")]
    OtherQueries,
    #[serde(rename = "Overall Observations")]
    OverallObservations,
}

impl Bucket {
    pub const COUNT: usize = 11;

    /// All buckets in export column order
    pub const ALL: [Bucket; Bucket::COUNT] = [
        Bucket::BotResponse,
        Bucket::Hva,
        Bucket::AbFeatureHvaQuery,
        Bucket::PersonalizedAccountQueries,
        Bucket::PromoFreebieQueries,
        Bucket::HelpPageCustomerService,
        Bucket::NonProfitQuery,
        Bucket::PersonalPrimeQuery,
        Bucket::CustomerBehavior,
        Bucket::OtherQueries,
        Bucket::OverallObservations,
    ];

    /// Display label, also used as the spreadsheet column header
    pub fn label(self) -> &'static str {
        match self {
            Bucket::BotResponse => "Bot Response",
            Bucket::Hva => "HVA",
            Bucket::AbFeatureHvaQuery => "AB feature/HVA Related Query",
            Bucket::PersonalizedAccountQueries => "Personalized/Account-Specific Queries",
            Bucket::PromoFreebieQueries => "Promo & Freebie Related Queries",
            Bucket::HelpPageCustomerService => "Help-page/Direct Customer Service",
            Bucket::NonProfitQuery => "BP for Non-Profit Organisation Related Query",
            Bucket::PersonalPrimeQuery => "Personal Prime Related Query",
            Bucket::CustomerBehavior => "Customer Behavior",
            Bucket::OtherQueries => "Other Queries",
            Bucket::OverallObservations => "Overall Observations",
        }
    }

    /// Position of this bucket in export column order
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .iter()
            .copied()
            .find(|bucket| bucket.label() == s)
            .ok_or_else(|| format!("Unknown bucket: {}", s))
    }
}
