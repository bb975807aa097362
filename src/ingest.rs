use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::model::activity::ActivityEvent;

/// Producer half of the bounded ingest queue.
///
/// Gateway event handlers push into this from the dispatch path; detection
/// drains it on a fixed tick. Submission never blocks: when the queue is
/// full the event is dropped, trading completeness for keeping the gateway
/// responsive under a flood.
#[derive(Clone)]
pub struct IngestQueue {
    sender: mpsc::Sender<ActivityEvent>,
}

/// Consumer half, held by the drain loop.
pub struct IngestReceiver {
    receiver: mpsc::Receiver<ActivityEvent>,
}

/// Creates a bounded queue with the given capacity.
pub fn channel(capacity: usize) -> (IngestQueue, IngestReceiver) {
    let (sender, receiver) = mpsc::channel(capacity);
    (IngestQueue { sender }, IngestReceiver { receiver })
}

impl IngestQueue {
    /// Enqueues an event for detection.
    ///
    /// Malformed events (missing ids) and events that do not fit in the
    /// queue are dropped, each with a log line but no error.
    pub fn submit(&self, event: ActivityEvent) {
        if !event.is_well_formed() {
            debug!("Dropping malformed activity event");
            return;
        }

        if let Err(mpsc::error::TrySendError::Full(event)) = self.sender.try_send(event) {
            warn!(
                actor_id = event.actor_id,
                "Ingest queue full, dropping activity event"
            );
        }
    }
}

impl IngestReceiver {
    /// Takes up to `batch` queued events without waiting.
    pub fn drain(&mut self, batch: usize) -> Vec<ActivityEvent> {
        let mut events = Vec::with_capacity(batch);
        while events.len() < batch {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(_) => break,
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(actor_id: u64) -> ActivityEvent {
        ActivityEvent {
            actor_id,
            realm_id: 1,
            channel_id: 2,
            content: "hello".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn drains_at_most_the_batch_size() {
        let (queue, mut receiver) = channel(64);
        for i in 1..=15 {
            queue.submit(event(i));
        }

        let first = receiver.drain(10);
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].actor_id, 1);

        let second = receiver.drain(10);
        assert_eq!(second.len(), 5);
        assert!(receiver.drain(10).is_empty());
    }

    #[tokio::test]
    async fn drops_events_past_capacity() {
        let (queue, mut receiver) = channel(3);
        for i in 1..=5 {
            queue.submit(event(i));
        }

        let drained = receiver.drain(10);
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[2].actor_id, 3);
    }

    #[tokio::test]
    async fn drops_malformed_events() {
        let (queue, mut receiver) = channel(8);
        let mut malformed = event(1);
        malformed.channel_id = 0;

        queue.submit(malformed);
        queue.submit(event(2));

        let drained = receiver.drain(10);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].actor_id, 2);
    }
}
