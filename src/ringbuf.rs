//! Fixed-capacity byte ring buffer for streaming audio.
//!
//! Provides a bounded circular buffer that decouples an audio-decoding
//! producer from a realtime output consumer. Unlike a ring that overwrites
//! its oldest data, this buffer has a hard capacity: once full, appends
//! short-write and the caller re-delivers the remainder later. This matches
//! how streaming decoders work, which can be asked to re-deliver audio data
//! at a later time.
//!
//! Every operation is total: there are no error returns, no panics on the
//! data path and no blocking. Insufficient room or insufficient data is
//! reported purely through a byte count smaller than requested. This keeps
//! an entire class of priority-inversion and deadlock bugs off the audio
//! path.

/// A bounded byte FIFO with fixed backing storage.
///
/// The buffer:
/// * Holds at most `capacity` bytes, allocated once at construction
/// * Preserves FIFO order across any interleaving of appends and reads
/// * Reports overflow and underrun through short writes and short reads
/// * Never blocks, never errors, never grows
///
/// Valid data occupies the possibly-wrapping span `[start, start + len)`
/// taken modulo `capacity`; both copy directions split into at most two
/// `copy_from_slice` calls at the physical end of storage.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    /// The underlying fixed-size storage, allocated once
    storage: Box<[u8]>,

    /// Index of the first valid (unread) byte
    start: usize,

    /// Number of valid bytes currently held
    len: usize,
}

impl RingBuffer {
    /// Creates an empty buffer with room for `capacity` bytes.
    ///
    /// The backing storage is allocated up front and never reallocated.
    /// `capacity == 0` is legal: such a buffer accepts and yields nothing.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity].into_boxed_slice(),
            start: 0,
            len: 0,
        }
    }

    /// Returns the number of valid bytes currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no valid bytes are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the maximum number of bytes the buffer can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the number of bytes that can still be appended.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.storage.len() - self.len
    }

    /// Discards all buffered data and resets the read cursor.
    ///
    /// Used as the cancellation primitive on seeks and track changes.
    /// Idempotent.
    pub fn clear(&mut self) {
        self.start = 0;
        self.len = 0;
    }

    /// Attempts to copy `data` into the buffer.
    ///
    /// Copies `min(data.len(), remaining())` bytes from the front of `data`,
    /// wrapping around the end of storage as needed. If the return value is
    /// smaller than `data.len()`, exactly that prefix was stored and the
    /// caller is expected to resubmit the unconsumed suffix later.
    ///
    /// # Returns
    ///
    /// The number of bytes actually copied in. Never more than `data.len()`.
    pub fn attempt_append(&mut self, data: &[u8]) -> usize {
        self.append_bytes(data, data.len().min(self.remaining()))
    }

    /// Attempts to copy `data` into the buffer in whole chunks only.
    ///
    /// As [`attempt_append`](Self::attempt_append), but the copy count is
    /// first rounded down to the largest multiple of `chunk_size`. A chunk
    /// is typically one sample frame across all channels; rounding down
    /// guarantees a frame is never split across an append, so a consumer
    /// draining `len()` bytes always reads whole frames. With less than one
    /// chunk of room, nothing is copied. `chunk_size == 0` disables the
    /// rounding.
    ///
    /// # Returns
    ///
    /// The number of bytes actually copied in, always a multiple of
    /// `chunk_size` when `chunk_size > 0`.
    pub fn attempt_append_chunked(&mut self, data: &[u8], chunk_size: usize) -> usize {
        let mut count = data.len().min(self.remaining());
        if chunk_size > 0 {
            count -= count % chunk_size;
        }
        self.append_bytes(data, count)
    }

    /// Reads up to `buf.len()` bytes into `buf`.
    ///
    /// Copies `min(buf.len(), len())` bytes in FIFO order into the front of
    /// `buf` and consumes them. An under-filled buffer yields a short read;
    /// an empty buffer yields 0. The caller (typically the audio output
    /// callback) decides how to cover the shortfall, e.g. with silence.
    ///
    /// # Returns
    ///
    /// The number of bytes actually copied out.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let count = buf.len().min(self.len);
        if count == 0 {
            return 0;
        }

        let capacity = self.storage.len();
        let first = count.min(capacity - self.start);
        buf[..first].copy_from_slice(&self.storage[self.start..self.start + first]);
        if count > first {
            buf[first..count].copy_from_slice(&self.storage[..count - first]);
        }

        self.start = (self.start + count) % capacity;
        self.len -= count;
        count
    }

    /// Copies the first `count` bytes of `data` in at the write cursor.
    ///
    /// `count` must not exceed `remaining()`.
    fn append_bytes(&mut self, data: &[u8], count: usize) -> usize {
        if count == 0 {
            return 0;
        }

        let capacity = self.storage.len();
        let end = (self.start + self.len) % capacity;
        let first = count.min(capacity - end);
        self.storage[end..end + first].copy_from_slice(&data[..first]);
        if count > first {
            self.storage[..count - first].copy_from_slice(&data[first..count]);
        }

        self.len += count;
        count
    }
}
