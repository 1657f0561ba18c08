//! Drains a shared buffer as a rodio audio source.
//!
//! Bridges the consumer half of a buffer into an audio pipeline: interleaved
//! little-endian 16-bit PCM bytes come out of the buffer, `f32` samples go
//! into the sink. When the buffer runs dry the source yields silence instead
//! of blocking or ending, so a slow producer causes a dropout rather than a
//! stalled or torn-down output stream.

use std::time::Duration;

use rodio::Source;

use crate::shared::Consumer;

/// Bytes per interleaved 16-bit sample.
const SAMPLE_BYTES: usize = 2;

/// Size of the staging block refilled from the buffer, in bytes.
///
/// One lock acquisition per refill rather than per sample.
const STAGING_SIZE: usize = 4096;

/// Endless audio source backed by the read half of a shared buffer.
///
/// Decodes interleaved little-endian `i16` samples to `f32` on the fly.
/// Expects the producer to append whole frames (see
/// [`Producer::append_frames`](crate::shared::Producer::append_frames)); a
/// trailing partial sample left by an unaligned producer is discarded.
#[derive(Debug)]
pub struct PcmSource {
    /// Read half of the shared buffer
    consumer: Consumer,

    /// Number of interleaved channels
    channels: u16,

    /// Sample rate in Hz
    sample_rate: u32,

    /// Staging block holding the most recent read from the buffer
    staging: Box<[u8]>,

    /// Number of valid bytes in the staging block
    filled: usize,

    /// Read position within the staging block
    pos: usize,
}

impl PcmSource {
    /// Creates a source draining `consumer` with the given stream layout.
    #[must_use]
    pub fn new(consumer: Consumer, channels: u16, sample_rate: u32) -> Self {
        Self {
            consumer,
            channels,
            sample_rate,
            staging: vec![0; STAGING_SIZE].into_boxed_slice(),
            filled: 0,
            pos: 0,
        }
    }

    /// Returns a reference to the consumer half.
    #[inline]
    pub fn inner(&self) -> &Consumer {
        &self.consumer
    }

    /// Consumes the source and returns the consumer half.
    #[inline]
    pub fn into_inner(self) -> Consumer {
        self.consumer
    }

    /// Pulls the next sample out of the staging block, refilling it from the
    /// buffer when exhausted. `None` means the buffer is dry right now.
    fn next_sample(&mut self) -> Option<f32> {
        if self.pos >= self.filled {
            let count = self.consumer.read(&mut self.staging);
            // Drop a torn trailing byte rather than desync the stream.
            self.filled = count - count % SAMPLE_BYTES;
            self.pos = 0;
            if self.filled == 0 {
                return None;
            }
        }

        let raw = i16::from_le_bytes([self.staging[self.pos], self.staging[self.pos + 1]]);
        self.pos += SAMPLE_BYTES;
        Some(f32::from(raw) / 32_768.0)
    }
}

impl Iterator for PcmSource {
    type Item = f32;

    /// Provides the next sample, substituting silence on underrun.
    ///
    /// Never returns `None`: the stream outlives gaps in production.
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_sample().unwrap_or(0.0))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl Source for PcmSource {
    /// Returns `None`: a live stream has no frame boundaries to report.
    #[inline]
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    #[inline]
    fn channels(&self) -> u16 {
        self.channels
    }

    #[inline]
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns `None`: the stream is endless.
    #[inline]
    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::bounded;

    fn append_samples(producer: &crate::shared::Producer, samples: &[i16]) {
        let bytes: Vec<u8> = samples
            .iter()
            .flat_map(|sample| sample.to_le_bytes())
            .collect();
        assert_eq!(producer.append_frames(&bytes, SAMPLE_BYTES), bytes.len());
    }

    #[test]
    fn decodes_interleaved_i16_to_f32() {
        let (producer, consumer) = bounded(64);
        append_samples(&producer, &[0, 16_384, -16_384, i16::MIN]);

        let mut source = PcmSource::new(consumer, 2, 44_100);
        assert_eq!(source.next(), Some(0.0));
        assert_eq!(source.next(), Some(0.5));
        assert_eq!(source.next(), Some(-0.5));
        assert_eq!(source.next(), Some(-1.0));
    }

    #[test]
    fn dry_buffer_yields_silence_and_recovers() {
        let (producer, consumer) = bounded(64);
        let mut source = PcmSource::new(consumer, 2, 44_100);

        // Dry: silence, not end-of-stream.
        assert_eq!(source.next(), Some(0.0));
        assert_eq!(source.next(), Some(0.0));

        append_samples(&producer, &[16_384]);
        assert_eq!(source.next(), Some(0.5));
        assert_eq!(source.next(), Some(0.0));
    }

    #[test]
    fn reports_stream_layout() {
        let (_producer, consumer) = bounded(64);
        let source = PcmSource::new(consumer, 2, 48_000);
        assert_eq!(source.channels(), 2);
        assert_eq!(source.sample_rate(), 48_000);
        assert_eq!(source.current_frame_len(), None);
        assert_eq!(source.total_duration(), None);
    }

    #[test]
    fn drains_more_than_one_staging_block() {
        let (producer, consumer) = bounded(16_384);
        let samples: Vec<i16> = (0..4096).map(|sample| sample as i16).collect();
        append_samples(&producer, &samples);

        let mut source = PcmSource::new(consumer, 2, 44_100);
        for &expected in &samples {
            assert_eq!(source.next(), Some(f32::from(expected) / 32_768.0));
        }
        assert!(source.inner().is_empty());
    }
}
