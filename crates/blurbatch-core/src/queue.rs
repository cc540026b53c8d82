//! Fixed-capacity blocking FIFO shared by scanners and workers.
//!
//! The queue owns a ring of slots, a head index, a tail index and a count, all
//! guarded by a single mutex. Two condition variables carry the wake-ups:
//! `space_available` for producers blocked on a full queue and
//! `data_available` for consumers blocked on an empty one.
//!
//! Every wait sits inside a predicate loop. A push makes exactly one item
//! available and a pop frees exactly one slot, so each transition wakes one
//! waiter on the opposite side; a woken thread that loses the race re-checks and
//! waits again. Closing the queue wakes everyone.

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::error::QueueError;

/// Default number of slots, matching `pool.queue_capacity`.
pub const DEFAULT_CAPACITY: usize = 1000;

struct Ring<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    count: usize,
    closed: bool,
}

impl<T> Ring<T> {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    fn insert(&mut self, item: T) {
        debug_assert!(self.count < self.capacity());
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.capacity();
        self.count += 1;
    }

    fn remove(&mut self) -> T {
        debug_assert!(self.count > 0);
        let item = self.slots[self.head]
            .take()
            .unwrap_or_else(|| unreachable!("occupied slot at head"));
        self.head = (self.head + 1) % self.capacity();
        self.count -= 1;
        item
    }
}

/// A bounded, blocking, multi-producer multi-consumer FIFO queue.
///
/// Capacity is fixed at construction. `push` blocks while the queue is full,
/// `pop` blocks while it is empty. Items come out in the exact order they went
/// in, across all producers.
pub struct BoundedQueue<T> {
    ring: Mutex<Ring<T>>,
    space_available: Condvar,
    data_available: Condvar,
}

impl<T> BoundedQueue<T> {
    /// Create a queue with room for `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be > 0");
        let slots = std::iter::repeat_with(|| None).take(capacity).collect();
        Self {
            ring: Mutex::new(Ring {
                slots,
                head: 0,
                tail: 0,
                count: 0,
                closed: false,
            }),
            space_available: Condvar::new(),
            data_available: Condvar::new(),
        }
    }

    /// Append an item, blocking while the queue is full.
    ///
    /// Returns [`QueueError::Closed`] if the queue is closed before space
    /// becomes available; the item is dropped in that case.
    pub fn push(&self, item: T) -> Result<(), QueueError> {
        let mut ring = self.ring.lock();
        while ring.is_full() && !ring.closed {
            self.space_available.wait(&mut ring);
        }
        self.finish_push(ring, item)
    }

    /// Like [`push`](Self::push), but gives up after `timeout`.
    pub fn push_timeout(&self, item: T, timeout: Duration) -> Result<(), QueueError> {
        let deadline = Instant::now() + timeout;
        let mut ring = self.ring.lock();
        while ring.is_full() && !ring.closed {
            if self
                .space_available
                .wait_until(&mut ring, deadline)
                .timed_out()
                && ring.is_full()
                && !ring.closed
            {
                return Err(QueueError::Timeout(timeout));
            }
        }
        self.finish_push(ring, item)
    }

    fn finish_push(&self, mut ring: MutexGuard<'_, Ring<T>>, item: T) -> Result<(), QueueError> {
        if ring.closed {
            return Err(QueueError::Closed);
        }
        ring.insert(item);
        drop(ring);
        self.data_available.notify_one();
        Ok(())
    }

    /// Remove the oldest item, blocking while the queue is empty.
    ///
    /// After [`close`](Self::close), items still queued are handed out in order;
    /// `None` is returned once the queue is both closed and empty.
    pub fn pop(&self) -> Option<T> {
        let mut ring = self.ring.lock();
        while ring.count == 0 && !ring.closed {
            self.data_available.wait(&mut ring);
        }
        if ring.count == 0 {
            return None;
        }
        Some(self.finish_pop(ring))
    }

    /// Like [`pop`](Self::pop), but gives up after `timeout`.
    pub fn pop_timeout(&self, timeout: Duration) -> Result<T, QueueError> {
        let deadline = Instant::now() + timeout;
        let mut ring = self.ring.lock();
        while ring.count == 0 && !ring.closed {
            if self
                .data_available
                .wait_until(&mut ring, deadline)
                .timed_out()
                && ring.count == 0
                && !ring.closed
            {
                return Err(QueueError::Timeout(timeout));
            }
        }
        if ring.count == 0 {
            return Err(QueueError::Closed);
        }
        Ok(self.finish_pop(ring))
    }

    fn finish_pop(&self, mut ring: MutexGuard<'_, Ring<T>>) -> T {
        let item = ring.remove();
        drop(ring);
        self.space_available.notify_one();
        item
    }

    /// Stop accepting items and wake every blocked producer and consumer.
    ///
    /// Idempotent.
    pub fn close(&self) {
        let mut ring = self.ring.lock();
        ring.closed = true;
        drop(ring);
        self.space_available.notify_all();
        self.data_available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.ring.lock().closed
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.ring.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.ring.lock().is_full()
    }

    pub fn capacity(&self) -> usize {
        self.ring.lock().capacity()
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ring = self.ring.lock();
        f.debug_struct("BoundedQueue")
            .field("len", &ring.count)
            .field("capacity", &ring.capacity())
            .field("closed", &ring.closed)
            .finish()
    }
}
