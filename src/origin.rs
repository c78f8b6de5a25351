//! FIFO worklist of pending chain-start addresses (spec.md §3, §4.3).
//!
//! Duplicates and already-decoded addresses are tolerated by design — the
//! traversal engine no-ops on an origin whose address is already `decoded`
//! (spec.md §9) — so this is a plain FIFO, not a dedup set.

use queues::{IsQueue, Queue};

/// Pending chain-start addresses, drained oldest-first.
#[derive(Debug, Default)]
pub struct OriginQueue {
    queue: Queue<u16>,
}

impl OriginQueue {
    pub fn new() -> Self {
        OriginQueue {
            queue: Queue::new(),
        }
    }

    /// Seed the queue with the reset/IRQ vector table `0..irq_table_size`.
    pub fn seeded_with_irq_table(irq_table_size: u16) -> Self {
        let mut origins = OriginQueue::new();
        for addr in 0..irq_table_size {
            origins.push(addr);
        }
        origins
    }

    pub fn push(&mut self, addr: u16) {
        self.queue
            .add(addr)
            .expect("pushing onto an unbounded queue should work");
    }

    pub fn pop(&mut self) -> Option<u16> {
        self.queue.remove().ok()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_fifo() {
        let mut origins = OriginQueue::new();
        origins.push(1);
        origins.push(2);
        origins.push(3);
        assert_eq!(origins.pop(), Some(1));
        assert_eq!(origins.pop(), Some(2));
        assert_eq!(origins.pop(), Some(3));
        assert_eq!(origins.pop(), None);
    }

    #[test]
    fn seeded_with_irq_table_is_0_to_n() {
        let mut origins = OriginQueue::seeded_with_irq_table(3);
        assert_eq!(origins.pop(), Some(0));
        assert_eq!(origins.pop(), Some(1));
        assert_eq!(origins.pop(), Some(2));
        assert!(origins.is_empty());
    }

    #[test]
    fn duplicates_are_kept_not_deduplicated() {
        let mut origins = OriginQueue::new();
        origins.push(5);
        origins.push(5);
        assert_eq!(origins.pop(), Some(5));
        assert_eq!(origins.pop(), Some(5));
    }
}
