//! The message lifecycle core: send, receive, complete, return, plus the
//! receipt ledger and the shutdown sweep that backs at-least-once delivery.

use crate::error::StoreError;
use crate::message::{DefaultMessageFactory, MessageFactory, QueueMessage, ReceiptId};
use crate::store::QueueStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;

/// Options accepted by [`Queue::create_queue`].
///
/// The list store creates queues implicitly on first push, so nothing is
/// configurable here; the type exists for interface symmetry with backends
/// that do provision queues up front.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueOptions {}

/// Messages received by this process but not yet completed or returned,
/// keyed by receipt.
#[derive(Default)]
struct ReceiptLedger {
    next_receipt: u64,
    in_flight: HashMap<ReceiptId, QueueMessage>,
}

/// An at-least-once message queue over a list store.
///
/// A `Queue` has one default queue id; every operation accepts an explicit
/// override and falls back to the default when the override is absent or
/// empty.
///
/// Receiving a message moves it from the store into the in-memory receipt
/// ledger. [`complete_message`](Queue::complete_message) drops the ledger
/// entry once the message is processed; [`return_message`](Queue::return_message)
/// pushes it back to the *head* of its queue first, so retried work is
/// redelivered before newer messages. [`close`](Queue::close) returns every
/// still-outstanding message and must be called before the consuming process
/// exits; a message popped off the store exists nowhere else until then.
///
/// The ledger is process-local and rebuilt empty on restart; coordination
/// between consumer processes comes solely from the store's atomic pop. One
/// instance per worker task is the intended shape; the internal lock keeps
/// the ledger consistent but provides no cross-operation ordering.
pub struct Queue {
    store: Arc<dyn QueueStore>,
    factory: Box<dyn MessageFactory>,
    queue_id: String,
    wait_time: Duration,
    ledger: Mutex<ReceiptLedger>,
}

impl Queue {
    /// Create a queue over `store` with a default queue id, building plain
    /// messages via [`DefaultMessageFactory`].
    pub fn new(store: Arc<dyn QueueStore>, queue_id: impl Into<String>) -> Self {
        Self::with_factory(store, Box::new(DefaultMessageFactory), queue_id)
    }

    /// Create a queue with a custom message factory.
    pub fn with_factory(
        store: Arc<dyn QueueStore>,
        factory: Box<dyn MessageFactory>,
        queue_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            factory,
            queue_id: queue_id.into(),
            wait_time: Duration::ZERO,
            ledger: Mutex::new(ReceiptLedger::default()),
        }
    }

    /// Set the default wait time used when [`receive_message`](Queue::receive_message)
    /// is called without one.
    pub fn with_wait_time(mut self, wait_time: Duration) -> Self {
        self.wait_time = wait_time;
        self
    }

    /// The default queue id.
    pub fn queue_id(&self) -> &str {
        &self.queue_id
    }

    /// Number of received-but-unacknowledged messages tracked by this
    /// instance.
    pub fn in_flight(&self) -> usize {
        self.ledger().in_flight.len()
    }

    /// No-op: lists are created by the store on first push.
    pub async fn create_queue(
        &self,
        _queue_id: &str,
        _options: QueueOptions,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    /// Destroy the store-side list.
    ///
    /// Receipts for messages already popped from that queue stay tracked and
    /// can still be completed or returned normally.
    pub async fn delete_queue(&self, queue_id: Option<&str>) -> Result<(), StoreError> {
        let queue_id = self.resolve_queue_id(queue_id);
        self.store.delete(queue_id).await?;
        debug!(queue = %queue_id, "deleted queue");
        Ok(())
    }

    /// Append a message body to the tail of the queue.
    pub async fn send_message(&self, body: &str, queue_id: Option<&str>) -> Result<(), StoreError> {
        let queue_id = self.resolve_queue_id(queue_id);
        let length = self.store.push_back(queue_id, body).await?;
        debug!(queue = %queue_id, length, "sent message");
        Ok(())
    }

    /// Pop the next message, waiting up to the resolved wait time for one to
    /// arrive.
    ///
    /// Returns `Ok(None)` when the wait elapsed with the queue still empty;
    /// nothing is allocated or tracked in that case. On success the message
    /// carries a freshly assigned receipt and is recorded in the ledger until
    /// completed or returned. If the store fails, no receipt is allocated;
    /// a message lost to a partial pop is not recovered by this process.
    pub async fn receive_message(
        &self,
        queue_id: Option<&str>,
        wait_time: Option<Duration>,
    ) -> Result<Option<QueueMessage>, StoreError> {
        let queue_id = self.resolve_queue_id(queue_id);
        let wait_time = wait_time.unwrap_or(self.wait_time);

        let Some((_, body)) = self.store.pop_front(queue_id, wait_time).await? else {
            return Ok(None);
        };

        let mut message = self.factory.create_message(body, queue_id);
        let receipt = {
            let mut ledger = self.ledger();
            let receipt = ReceiptId::new(ledger.next_receipt);
            ledger.next_receipt += 1;
            message.set_receipt_id(receipt);
            ledger.in_flight.insert(receipt, message.clone());
            receipt
        };

        debug!(queue = %queue_id, receipt = %receipt, "received message");
        Ok(Some(message))
    }

    /// Acknowledge a message as processed, dropping its ledger entry.
    ///
    /// Touches no store state. Completing an already-completed or
    /// never-tracked message is a silent no-op, so the shutdown sweep and
    /// explicit completion cannot trip over each other.
    pub fn complete_message(&self, message: &QueueMessage) {
        let Some(receipt) = message.receipt_id() else {
            return;
        };
        if self.ledger().in_flight.remove(&receipt).is_some() {
            debug!(queue = %message.queue_id(), receipt = %receipt, "completed message");
        }
    }

    /// Push a message back to the head of its queue for redelivery, then
    /// forget its receipt.
    ///
    /// If the store push fails, the ledger entry is left intact so a later
    /// retry (or the shutdown sweep) can attempt the return again.
    pub async fn return_message(&self, message: &QueueMessage) -> Result<(), StoreError> {
        self.store
            .push_front(message.queue_id(), message.body())
            .await?;
        debug!(queue = %message.queue_id(), "returned message to queue head");
        self.complete_message(message);
        Ok(())
    }

    /// Return every outstanding message to the store.
    ///
    /// The safety net for consumer shutdown: call this before the process
    /// exits so nothing received-but-unprocessed is lost. The sweep is
    /// best-effort: every entry is attempted in receipt order, entries whose
    /// return failed stay in the ledger, and the first failure is surfaced
    /// once the sweep finishes. With an empty ledger this performs no store
    /// calls, so repeated invocation is harmless.
    pub async fn close(&self) -> Result<(), StoreError> {
        let mut outstanding: Vec<QueueMessage> =
            self.ledger().in_flight.values().cloned().collect();
        if outstanding.is_empty() {
            return Ok(());
        }
        outstanding.sort_by_key(|message| message.receipt_id());

        info!(count = outstanding.len(), "returning in-flight messages");
        let mut first_error = None;
        for message in outstanding {
            if let Err(err) = self.return_message(&message).await {
                warn!(
                    queue = %message.queue_id(),
                    error = %err,
                    "failed to return in-flight message, keeping it tracked"
                );
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    fn resolve_queue_id<'a>(&'a self, queue_id: Option<&'a str>) -> &'a str {
        match queue_id {
            Some(id) if !id.is_empty() => id,
            _ => &self.queue_id,
        }
    }

    fn ledger(&self) -> MutexGuard<'_, ReceiptLedger> {
        self.ledger
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        let remaining = self
            .ledger
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .in_flight
            .len();
        if remaining > 0 {
            warn!(
                count = remaining,
                "queue dropped with in-flight messages, call close() to return them"
            );
        }
    }
}
