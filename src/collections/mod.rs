//! Collection utilities and data structures

/// A ring-buffer FIFO queue with consuming drain.
pub mod fifo_queue;

pub use fifo_queue::{Drain, FifoQueue, IntoIter, Iter};
