//! Producer/consumer handles for sharing the buffer across threads.
//!
//! Splits a [`RingBuffer`] into a [`Producer`] for the decoder thread and a
//! [`Consumer`] for the audio output callback. The buffer sits behind a
//! mutex that is held only for the duration of the memory copy, never across
//! I/O, so the critical section stays O(copied bytes) and the realtime
//! thread keeps its non-blocking contract in practice.
//!
//! A poisoned lock is recovered rather than propagated: the buffer holds no
//! invariants a panicking peer could break mid-copy that matter more than
//! keeping the audio callback total, so every operation still returns a
//! plain byte count.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::trace;

use crate::ringbuf::RingBuffer;

/// Creates a shared buffer of `capacity` bytes, split into its two handles.
///
/// The producer half belongs on the decoder thread, the consumer half on the
/// audio output thread. Both handles may also be held together by the
/// pipeline that owns them, e.g. to flush on a seek.
#[must_use]
pub fn bounded(capacity: usize) -> (Producer, Consumer) {
    let shared = Arc::new(Shared {
        buffer: Mutex::new(RingBuffer::new(capacity)),
        capacity,
    });

    (
        Producer {
            shared: Arc::clone(&shared),
        },
        Consumer { shared },
    )
}

/// State shared between the two handles.
#[derive(Debug)]
struct Shared {
    /// The buffer itself, locked only for the duration of a copy
    buffer: Mutex<RingBuffer>,

    /// Capacity kept outside the lock for lock-free inspection
    capacity: usize,
}

impl Shared {
    /// Locks the buffer, recovering from poisoning.
    fn lock(&self) -> MutexGuard<'_, RingBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Write half of a shared buffer, held by the decoder thread.
#[derive(Debug)]
pub struct Producer {
    shared: Arc<Shared>,
}

/// Read half of a shared buffer, held by the audio output thread.
#[derive(Debug)]
pub struct Consumer {
    shared: Arc<Shared>,
}

impl Producer {
    /// Appends as much of `data` as fits.
    ///
    /// A return value smaller than `data.len()` signals backpressure: the
    /// caller should hold on to the unconsumed suffix and resubmit it once
    /// the consumer has drained some room.
    pub fn append(&self, data: &[u8]) -> usize {
        let copied = self.shared.lock().attempt_append(data);
        if copied < data.len() {
            trace!("buffer full: accepted {copied} of {} bytes", data.len());
        }
        copied
    }

    /// Appends whole frames of `frame_size` bytes each.
    ///
    /// Rounds the accepted byte count down to a frame boundary so the
    /// consumer never observes a torn frame. `frame_size == 0` behaves like
    /// [`append`](Self::append).
    pub fn append_frames(&self, data: &[u8], frame_size: usize) -> usize {
        let copied = self.shared.lock().attempt_append_chunked(data, frame_size);
        if copied < data.len() {
            trace!("buffer full: accepted {copied} of {} bytes", data.len());
        }
        copied
    }

    /// Discards all buffered data.
    ///
    /// The lock serializes this against an in-flight read or append, so it
    /// is safe to call from either side on a seek or track change.
    pub fn clear(&self) {
        self.shared.lock().clear();
    }

    /// Returns the number of buffered bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    /// Returns `true` when the buffer holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }
}

impl Consumer {
    /// Reads up to `buf.len()` bytes in FIFO order.
    ///
    /// Returns immediately with however many bytes are available; the audio
    /// callback covers any shortfall with silence rather than waiting.
    pub fn read(&self, buf: &mut [u8]) -> usize {
        let count = self.shared.lock().read(buf);
        if count < buf.len() {
            trace!("buffer underrun: filled {count} of {} bytes", buf.len());
        }
        count
    }

    /// Discards all buffered data.
    pub fn clear(&self) {
        self.shared.lock().clear();
    }

    /// Returns the number of buffered bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    /// Returns `true` when the buffer holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }
}
