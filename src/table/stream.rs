//! Lazy Streams
//!
//! A producer thread hands items to the consumer one at a time.
//!
//! ## Channels
//! - items: zero-capacity rendezvous channel; each send blocks until the
//!   consumer takes the item, so at most one item is in flight
//! - status: one-slot channel carrying the producer's terminal result
//!
//! Dropping or cancelling the stream disconnects the item channel. A producer
//! blocked on a send wakes up, sees the disconnect, and exits.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use tracing::warn;

use crate::error::{FileTableError, Result};

/// Producer side of a stream
pub(crate) struct Emitter<T> {
    tx: Sender<T>,
}

impl<T> Emitter<T> {
    /// Hand one item to the consumer, blocking until it is taken.
    ///
    /// Returns false once the consumer has gone away; the producer should
    /// stop and return.
    pub(crate) fn emit(&self, item: T) -> bool {
        self.tx.send(item).is_ok()
    }
}

/// Finite, non-restartable sequence produced on a background thread
///
/// Yields `Ok` items in production order. If the producer fails, the error is
/// yielded once as the final item; failures before the first item (such as a
/// missing key) therefore show up as the first and only item.
pub struct Stream<T> {
    items: Option<Receiver<T>>,
    status: Receiver<Result<()>>,
    producer: Option<JoinHandle<()>>,
    finished: bool,
}

impl<T: Send + 'static> Stream<T> {
    /// Start `produce` on a named thread
    pub(crate) fn spawn<F>(name: &str, produce: F) -> Self
    where
        F: FnOnce(&Emitter<T>) -> Result<()> + Send + 'static,
    {
        let (item_tx, item_rx) = channel::bounded(0);
        let (status_tx, status_rx) = channel::bounded(1);

        let spawned = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let emitter = Emitter { tx: item_tx };
                let result = produce(&emitter);
                drop(emitter);
                // Nobody is listening after a cancel
                let _ = status_tx.send(result);
            });

        match spawned {
            Ok(handle) => Self {
                items: Some(item_rx),
                status: status_rx,
                producer: Some(handle),
                finished: false,
            },
            Err(e) => {
                warn!(thread = name, error = %e, "failed to spawn stream producer");
                Self::failed(FileTableError::Io(e))
            }
        }
    }
}

impl<T> Stream<T> {
    /// A stream whose only item is `err`
    pub(crate) fn failed(err: FileTableError) -> Self {
        let (status_tx, status_rx) = channel::bounded(1);
        let _ = status_tx.send(Err(err));
        Self {
            items: None,
            status: status_rx,
            producer: None,
            finished: false,
        }
    }

    /// Stop consuming and release the producer
    pub fn cancel(self) {
        drop(self);
    }

    /// Drain the remaining items and return the terminal status
    pub fn finish(mut self) -> Result<()> {
        for item in &mut self {
            item?;
        }
        Ok(())
    }
}

impl<T> Iterator for Stream<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(items) = &self.items {
            if let Ok(item) = items.recv() {
                return Some(Ok(item));
            }
        }

        // Item channel closed: the producer is done, collect its verdict
        self.finished = true;
        self.items = None;
        match self.status.recv() {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(Err(e)),
            Err(_) => Some(Err(FileTableError::Io(io::Error::new(
                io::ErrorKind::Other,
                "stream producer exited without a status",
            )))),
        }
    }
}

impl<T> Drop for Stream<T> {
    fn drop(&mut self) {
        // Disconnect first so a producer blocked on send can exit
        self.items = None;
        if let Some(handle) = self.producer.take() {
            let _ = handle.join();
        }
    }
}
