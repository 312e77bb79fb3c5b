// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! An unbounded, lock-free single-producer/single-consumer queue.
//!
//! The contract is **exactly one producer thread and exactly one consumer
//! thread**; violating that cardinality is undefined behavior. [`Queue::acquire_producer`]
//! and [`Queue::acquire_consumer`] enforce it at runtime by handing out at
//! most one [`Producer`] and one [`Consumer`] borrow at a time, the same
//! shape as a bounded SPSC ring buffer, but backed by a singly linked list
//! with a sentinel node so the queue never reports "full".
//!
//! # Example
//!
//! ```
//! use sim_queue::Queue;
//!
//! let queue = Queue::<u64>::new();
//! let mut producer = queue.acquire_producer().unwrap();
//! let mut consumer = queue.acquire_consumer().unwrap();
//!
//! producer.push(42);
//! assert_eq!(consumer.pop(), Some(42));
//! assert_eq!(consumer.pop(), None);
//! ```

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

use thiserror::Error;

/// The queue's only representable failure (spec §4.1/§7). Rust's global
/// allocator aborts the process on allocation failure rather than returning
/// an error in the common case, so `push`/`push_batch` are documented as
/// infallible in practice; this type exists for symmetry with the spec's
/// failure model and for any future caller that boxes nodes through a
/// fallible allocation path.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("allocation failed")]
    AllocationFailed,
}

struct Node<T> {
    next: AtomicPtr<Node<T>>,
    data: UnsafeCell<Option<T>>,
}

impl<T> Node<T> {
    fn sentinel() -> *mut Node<T> {
        Box::into_raw(Box::new(Node {
            next: AtomicPtr::new(std::ptr::null_mut()),
            data: UnsafeCell::new(None),
        }))
    }

    fn with_data(item: T) -> *mut Node<T> {
        Box::into_raw(Box::new(Node {
            next: AtomicPtr::new(std::ptr::null_mut()),
            data: UnsafeCell::new(Some(item)),
        }))
    }
}

/// The lock-free SPSC queue itself. Construct one `Queue`, then hand a
/// [`Producer`] to the I/O thread and a [`Consumer`] to the worker thread
/// (see spec §4.1 / §5: the queue is the bus the pipeline runs on top of).
pub struct Queue<T> {
    head: AtomicPtr<Node<T>>,
    tail: AtomicPtr<Node<T>>,
    has_producer: AtomicBool,
    has_consumer: AtomicBool,
}

unsafe impl<T: Send> Send for Queue<T> {}
unsafe impl<T: Send> Sync for Queue<T> {}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        let sentinel = Node::sentinel();
        Self {
            head: AtomicPtr::new(sentinel),
            tail: AtomicPtr::new(sentinel),
            has_producer: AtomicBool::new(true),
            has_consumer: AtomicBool::new(true),
        }
    }

    /// Returns the [`Producer`] half, or `None` if one has already been
    /// acquired and not yet dropped.
    pub fn acquire_producer(&self) -> Option<Producer<'_, T>> {
        self.has_producer
            .compare_exchange(true, false, Ordering::Relaxed, Ordering::Relaxed)
            .ok()
            .map(|_| Producer { queue: self })
    }

    /// Returns the [`Consumer`] half, or `None` if one has already been
    /// acquired and not yet dropped.
    pub fn acquire_consumer(&self) -> Option<Consumer<'_, T>> {
        self.has_consumer
            .compare_exchange(true, false, Ordering::Relaxed, Ordering::Relaxed)
            .ok()
            .map(|_| Consumer { queue: self })
    }

    /// Producer-side push. Never blocks.
    ///
    /// Publishing protocol (spec §4.1): first a **release** store links the
    /// new node after the current tail (the publish point), then the `tail`
    /// pointer itself is updated with a **relaxed** store, since only the
    /// producer ever reads it.
    fn push(&self, item: T) {
        let node = Node::with_data(item);
        let tail = self.tail.load(Ordering::Relaxed);
        unsafe { (*tail).next.store(node, Ordering::Release) };
        self.tail.store(node, Ordering::Relaxed);
    }

    /// Producer-side batch push. Builds a private chain with relaxed `next`
    /// stores, then performs a single release store from the old tail to the
    /// batch head, so the whole batch becomes visible to the consumer at
    /// once (consumers draining the list one `next` hop at a time still see
    /// FIFO order starting from the batch head).
    fn push_batch(&self, items: impl IntoIterator<Item = T>) {
        let mut iter = items.into_iter();
        let Some(first) = iter.next() else {
            return;
        };
        let batch_head = Node::with_data(first);
        let mut batch_tail = batch_head;
        for item in iter {
            let node = Node::with_data(item);
            unsafe { (*batch_tail).next.store(node, Ordering::Relaxed) };
            batch_tail = node;
        }
        let old_tail = self.tail.load(Ordering::Relaxed);
        unsafe { (*old_tail).next.store(batch_head, Ordering::Release) };
        self.tail.store(batch_tail, Ordering::Relaxed);
    }

    /// Consumer-side pop. The acquire load on `head->next` pairs with the
    /// producer's release store, making the new node's fields observable.
    fn pop(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);
        let next = unsafe { (*head).next.load(Ordering::Acquire) };
        if next.is_null() {
            return None;
        }
        let data = unsafe { (*next).data.get().as_mut().unwrap().take() };
        self.head.store(next, Ordering::Relaxed);
        // SAFETY: the consumer is the only thread that ever frees a node,
        // and it only frees the node it just advanced past (the old
        // sentinel), which the producer never dereferences again.
        unsafe { drop(Box::from_raw(head)) };
        data
    }

    fn pop_batch(&self, out: &mut Vec<T>, max: usize) -> usize {
        let mut count = 0;
        while count < max {
            match self.pop() {
                Some(item) => {
                    out.push(item);
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    fn empty(&self) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        unsafe { (*head).next.load(Ordering::Acquire).is_null() }
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        let mut node = *self.head.get_mut();
        while !node.is_null() {
            let next = *unsafe { (*node).next.get_mut() };
            unsafe { drop(Box::from_raw(node)) };
            node = next;
        }
    }
}

/// The producer endpoint. Enqueues by move; never blocks, never fails
/// except on allocation failure when boxing a new node (see spec §4.1/§7).
pub struct Producer<'a, T> {
    queue: &'a Queue<T>,
}

impl<T> Producer<'_, T> {
    pub fn push(&mut self, item: T) {
        self.queue.push(item);
    }

    pub fn push_batch(&mut self, items: impl IntoIterator<Item = T>) {
        self.queue.push_batch(items);
    }
}

impl<T> Drop for Producer<'_, T> {
    fn drop(&mut self) {
        self.queue.has_producer.store(true, Ordering::Relaxed);
    }
}

/// The consumer endpoint.
pub struct Consumer<'a, T> {
    queue: &'a Queue<T>,
}

impl<T> Consumer<'_, T> {
    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop()
    }

    /// Pops up to `max` items into `out`, returning the number popped.
    pub fn pop_batch(&mut self, out: &mut Vec<T>, max: usize) -> usize {
        self.queue.pop_batch(out, max)
    }

    /// Best-effort snapshot: may return `true` immediately before the
    /// producer publishes an item.
    pub fn empty(&self) -> bool {
        self.queue.empty()
    }
}

impl<T> Drop for Consumer<'_, T> {
    fn drop(&mut self) {
        self.queue.has_consumer.store(true, Ordering::Relaxed);
    }
}
