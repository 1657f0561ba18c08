//! Bounded, non-blocking byte ring buffer for realtime audio pipelines.
//!
//! `pcmring` decouples an audio-decoding producer thread from a realtime
//! output consumer with a fixed-capacity circular byte buffer. The buffer
//! never grows, never blocks and never errors: overflow and underrun are
//! reported as short writes and short reads, and the producer re-delivers
//! whatever did not fit.
//!
//! # Components
//!
//! * [`ringbuf::RingBuffer`] - the core single-owner buffer
//! * [`shared`] - producer/consumer handles for cross-thread use
//! * [`source::PcmSource`] - drains a shared buffer as a [`rodio::Source`],
//!   yielding silence on underrun
//!
//! # Example
//!
//! ```no_run
//! use pcmring::{shared::bounded, source::PcmSource};
//!
//! // Room for one second of 16-bit stereo at 44.1 kHz.
//! let (producer, consumer) = bounded(44_100 * 4);
//!
//! // Decoder thread: submit frames, retry whatever did not fit.
//! let pcm = [0u8; 4096];
//! let mut offset = 0;
//! while offset < pcm.len() {
//!     offset += producer.append_frames(&pcm[offset..], 4);
//! }
//!
//! // Audio thread: endless source, silent when the buffer runs dry.
//! let source = PcmSource::new(consumer, 2, 44_100);
//! ```

pub mod ringbuf;
pub mod shared;
pub mod source;

pub use ringbuf::RingBuffer;
pub use shared::{Consumer, Producer, bounded};
pub use source::PcmSource;
