//! Message types and the message-factory seam.

use serde::{Deserialize, Serialize};

/// Process-local handle for one in-flight message.
///
/// Receipts are assigned sequentially at receive time, starting at zero, and
/// are never reused within the lifetime of a [`Queue`](crate::Queue) instance,
/// not even after the message they identified was completed or returned.
/// They are not persisted and carry no meaning outside the assigning process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReceiptId(u64);

impl ReceiptId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the receipt as a plain integer.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message read from a queue.
///
/// Carries the opaque body, the queue it was read from, and, once received
/// through a [`Queue`](crate::Queue), the receipt identifying it in that
/// instance's ledger. The receipt is process-local state and is skipped when
/// the message is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMessage {
    body: String,
    queue_id: String,
    #[serde(skip)]
    receipt_id: Option<ReceiptId>,
}

impl QueueMessage {
    /// Create a message for a queue. No receipt is attached until the message
    /// is handed out by a receive operation.
    pub fn new(body: impl Into<String>, queue_id: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            queue_id: queue_id.into(),
            receipt_id: None,
        }
    }

    /// The opaque message body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The queue this message was read from.
    pub fn queue_id(&self) -> &str {
        &self.queue_id
    }

    /// The receipt assigned at receive time, if any.
    pub fn receipt_id(&self) -> Option<ReceiptId> {
        self.receipt_id
    }

    /// Attach a receipt.
    pub fn set_receipt_id(&mut self, receipt_id: ReceiptId) {
        self.receipt_id = Some(receipt_id);
    }
}

/// Builds a [`QueueMessage`] from the raw body popped off the store.
///
/// The queue calls this for every successful receive; implementations may
/// decorate or validate the body but must be side-effect free.
pub trait MessageFactory: Send + Sync {
    fn create_message(&self, body: String, queue_id: &str) -> QueueMessage;
}

/// Factory producing plain [`QueueMessage`]s with the body unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessageFactory;

impl MessageFactory for DefaultMessageFactory {
    fn create_message(&self, body: String, queue_id: &str) -> QueueMessage {
        QueueMessage::new(body, queue_id)
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
