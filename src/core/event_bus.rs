//! Pub/Sub bus carrying session events to the host.
//!
//! - Subscribers register callbacks (immediate invocation)
//! - emit() invokes callbacks immediately AND queues for deferred processing
//! - poll() returns queued events for batch processing in the host loop
//!
//! Callback order: FIFO (first-subscribed, first-called).

use std::sync::{Arc, Mutex, RwLock};

use log::warn;

use super::events::InstreamEvent;

/// Maximum events in queue before oldest are evicted
const MAX_QUEUE_SIZE: usize = 1000;

type Callback = Arc<dyn Fn(&InstreamEvent) + Send + Sync>;

/// Event bus with immediate callbacks and a deferred queue.
///
/// Both modes work together - callbacks fire immediately, and events
/// are also available for batch processing via poll(). Handles are
/// cheap clones over shared state.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Callback>>>,
    queue: Arc<Mutex<Vec<InstreamEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all session events.
    ///
    /// The callback is invoked synchronously from emit().
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&InstreamEvent) + Send + Sync + 'static,
    {
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(callback));
    }

    /// Emit an event: invoke callbacks immediately AND queue it for poll().
    pub fn emit(&self, event: InstreamEvent) {
        for cb in self.subscribers.read().unwrap_or_else(|e| e.into_inner()).iter() {
            cb(&event);
        }

        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if queue.len() >= MAX_QUEUE_SIZE {
            let evict_count = queue.len() / 2;
            warn!("EventBus queue full ({} events), evicting oldest {}", queue.len(), evict_count);
            queue.drain(0..evict_count);
        }
        queue.push(event);
    }

    /// Poll all queued events since the last poll.
    pub fn poll(&self) -> Vec<InstreamEvent> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Drop all subscribers (session teardown).
    pub fn clear_subscribers(&self) {
        self.subscribers.write().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.read().unwrap_or_else(|e| e.into_inner()).is_empty()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.read().map(|s| s.len()).unwrap_or(0))
            .field("queue_len", &self.queue.lock().map(|q| q.len()).unwrap_or(0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn test_subscribe_emit_immediate() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicI32::new(0));
        let c = Arc::clone(&counter);

        bus.subscribe(move |e| {
            if matches!(e, InstreamEvent::AdBreakEnd) {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        bus.emit(InstreamEvent::AdBreakEnd);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        bus.emit(InstreamEvent::PodComplete);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_emit_queues_for_poll() {
        let bus = EventBus::new();

        bus.emit(InstreamEvent::AdBreakEnd);
        bus.emit(InstreamEvent::PodComplete);

        let events = bus.poll();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], InstreamEvent::AdBreakEnd);

        // Queue is empty after poll
        assert!(bus.poll().is_empty());
    }

    #[test]
    fn test_multiple_subscribers_fifo() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o1 = Arc::clone(&order);
        bus.subscribe(move |_| o1.lock().unwrap().push(1));
        let o2 = Arc::clone(&order);
        bus.subscribe(move |_| o2.lock().unwrap().push(2));

        bus.emit(InstreamEvent::AdBreakEnd);
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_clear_subscribers() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicI32::new(0));
        let c = Arc::clone(&counter);

        bus.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        bus.clear_subscribers();

        bus.emit(InstreamEvent::AdBreakEnd);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        // Event still queued for poll
        assert_eq!(bus.poll().len(), 1);
    }

    #[test]
    fn test_clone_shares_queue() {
        let bus = EventBus::new();
        let handle = bus.clone();
        handle.emit(InstreamEvent::PodComplete);
        assert_eq!(bus.poll().len(), 1);
    }
}
