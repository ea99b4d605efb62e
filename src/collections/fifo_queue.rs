// -----------------------------------------------------------------------------
// src/collections/fifo_queue.rs
// -----------------------------------------------------------------------------

use std::fmt;
use std::iter::{FromIterator, FusedIterator};

/// Smallest buffer allocated on the first enqueue.
const MIN_CAPACITY: usize = 4;

/// A first-in, first-out queue backed by a growable ring buffer.
///
/// Items are appended at the tail and removed from the head. The backing
/// buffer doubles when full and is never shrunk, so long-lived queues that
/// cycle through many enqueue/drain rounds settle on a stable allocation.
///
/// ### Performance
/// - **Enqueue**: amortized O(1); O(n) only on the doubling step.
/// - **Dequeue / peek / len**: O(1).
/// - **Lazy allocation**: `FifoQueue::new()` does not allocate.
///
/// ### Draining
/// [`FifoQueue::drain`] yields items head first and removes each one as it is
/// yielded. Dropping the iterator early leaves the rest queued; a later
/// `drain()` picks up from there.
///
/// ### Examples
/// ```rust
/// use pipe_sugars::FifoQueue;
///
/// let mut queue = FifoQueue::new();
/// queue.enqueue(1);
/// queue.enqueue(2);
/// assert_eq!(queue.peek_front(), Some(&1));
/// assert_eq!(queue.drain().collect::<Vec<_>>(), vec![1, 2]);
/// assert!(queue.is_empty());
/// ```
#[derive(Clone)]
pub struct FifoQueue<T> {
    buffer: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> FifoQueue<T> {
    /// Creates an empty queue without allocating.
    #[inline]
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            head: 0,
            len: 0,
        }
    }

    /// Creates an empty queue able to hold `capacity` items before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = Vec::with_capacity(capacity);
        buffer.resize_with(capacity, || None);
        Self {
            buffer,
            head: 0,
            len: 0,
        }
    }

    /// Appends an item at the tail.
    pub fn enqueue(&mut self, item: T) {
        if self.len == self.buffer.len() {
            self.grow();
        }
        let tail = self.slot(self.len);
        self.buffer[tail] = Some(item);
        self.len += 1;
    }

    /// Removes and returns the head item, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.buffer[self.head].take();
        self.len -= 1;
        self.head = if self.len == 0 {
            0
        } else {
            (self.head + 1) % self.buffer.len()
        };
        item
    }

    /// Returns the head item without removing it.
    #[inline]
    pub fn peek_front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the tail item without removing it.
    #[inline]
    pub fn peek_back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Returns a mutable reference to the tail item.
    pub fn peek_back_mut(&mut self) -> Option<&mut T> {
        let last = self.len.checked_sub(1)?;
        let slot = self.slot(last);
        self.buffer[slot].as_mut()
    }

    /// Returns the item `index` positions behind the head.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.buffer[self.slot(index)].as_ref()
    }

    /// Number of queued items.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when nothing is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of items the current buffer holds before it must grow.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Drops every queued item, keeping the allocation.
    pub fn clear(&mut self) {
        for slot in &mut self.buffer {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Returns a consuming iterator that dequeues one item per `next()`.
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { queue: self }
    }

    /// Returns a non-consuming iterator from head to tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            index: 0,
        }
    }

    #[inline]
    fn slot(&self, index: usize) -> usize {
        (self.head + index) % self.buffer.len()
    }

    // Unwraps the ring into a fresh buffer so the head lands at slot 0.
    fn grow(&mut self) {
        let capacity = (self.buffer.len() * 2).max(MIN_CAPACITY);
        let mut next = Vec::with_capacity(capacity);
        for index in 0..self.len {
            let slot = self.slot(index);
            next.push(self.buffer[slot].take());
        }
        next.resize_with(capacity, || None);
        self.buffer = next;
        self.head = 0;
    }
}

impl<T> Default for FifoQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for FifoQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for FifoQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<T> FromIterator<T> for FifoQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = FifoQueue::new();
        queue.extend(iter);
        queue
    }
}

/// Consuming iterator returned by [`FifoQueue::drain`].
pub struct Drain<'a, T> {
    queue: &'a mut FifoQueue<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.queue.dequeue()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len, Some(self.queue.len))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}
impl<T> FusedIterator for Drain<'_, T> {}

/// Borrowing iterator returned by [`FifoQueue::iter`].
pub struct Iter<'a, T> {
    queue: &'a FifoQueue<T>,
    index: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.queue.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.queue.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Owning iterator, dequeues until empty.
pub struct IntoIter<T> {
    queue: FifoQueue<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.queue.dequeue()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len, Some(self.queue.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for FifoQueue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { queue: self }
    }
}

impl<'a, T> IntoIterator for &'a FifoQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
