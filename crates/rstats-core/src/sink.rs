//! The gauge sink capability.

use std::sync::{Arc, Mutex};

/// Receives one gauge reading per call and forwards it to a metrics
/// backend.
///
/// Keys are dot-separated statsd-style paths ("mem.heap.Alloc"); a gauge
/// overwrites the backend's previous reading for that key. Delivery is
/// best-effort: implementations must not surface errors to the caller,
/// and they may block only as long as a fire-and-forget send takes.
pub trait GaugeSink: Send + Sync {
    fn gauge(&self, key: &str, value: u64);
}

/// Sink that records every emission in memory.
///
/// A test double for asserting on emitted key sequences. Clones share
/// the same buffer, so a clone kept outside the collector observes
/// everything the collector emits.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<(String, u64)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far, in emission order.
    pub fn events(&self) -> Vec<(String, u64)> {
        self.events.lock().unwrap().clone()
    }

    /// Drains and returns the recorded events.
    pub fn take(&self) -> Vec<(String, u64)> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GaugeSink for RecordingSink {
    fn gauge(&self, key: &str, value: u64) {
        self.events.lock().unwrap().push((key.to_string(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_buffer() {
        let sink = RecordingSink::new();
        let observer = sink.clone();

        sink.gauge("cpu.NumGoroutine", 12);
        assert_eq!(observer.events(), vec![("cpu.NumGoroutine".to_string(), 12)]);

        let drained = observer.take();
        assert_eq!(drained.len(), 1);
        assert!(sink.is_empty());
    }
}
