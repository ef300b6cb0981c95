//! Fixed-capacity byte ring buffer
//!
//! Every operation runs inside one lock-guarded critical section, so a
//! producer and a consumer on different threads can share one buffer. The
//! buffer never blocks and never fails: overflow evicts the oldest bytes and
//! underrun is padded with zeros.

use super::native::EncodedBuffer;
use crate::error::{CodecError, Result};
use crate::types::FormatDescriptor;
use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;
use tracing::{debug, trace};

struct RingState {
    store: Box<[u8]>,
    start: usize,
    len: usize,
}

impl RingState {
    fn capacity(&self) -> usize {
        self.store.len()
    }

    /// Copy out up to `out.len()` buffered bytes, oldest first
    fn drain_into(&mut self, out: &mut [u8]) -> usize {
        let wanted = out.len().min(self.len);
        let first = wanted.min(self.capacity() - self.start);

        out[..first].copy_from_slice(&self.store[self.start..self.start + first]);
        out[first..wanted].copy_from_slice(&self.store[..wanted - first]);

        self.start = (self.start + wanted) % self.capacity();
        self.len -= wanted;
        wanted
    }

    /// Append `data`, evicting the oldest bytes to make room
    fn append(&mut self, data: &[u8]) {
        let capacity = self.capacity();

        // Only the newest `capacity` bytes can survive
        let data = &data[data.len().saturating_sub(capacity)..];

        let overflow = (self.len + data.len()).saturating_sub(capacity);
        if overflow > 0 {
            self.start = (self.start + overflow) % capacity;
            self.len -= overflow;
        }

        let offset = (self.start + self.len) % capacity;
        let first = data.len().min(capacity - offset);
        self.store[offset..offset + first].copy_from_slice(&data[..first]);
        self.store[..data.len() - first].copy_from_slice(&data[first..]);
        self.len += data.len();
    }
}

/// Thread-safe fixed-capacity byte ring buffer
///
/// # Example
/// ```
/// use voicecodec_core::buffer::RingBuffer;
/// use voicecodec_core::types::{Encoding, FormatDescriptor};
///
/// let buffer = RingBuffer::new(FormatDescriptor::new(Encoding::MuLaw), 4).unwrap();
/// buffer.put(&[1, 2, 3]);
/// assert_eq!(&buffer.get(5)[..], &[1, 2, 3, 0, 0]);
/// ```
pub struct RingBuffer {
    info: FormatDescriptor,
    state: Mutex<RingState>,
}

impl RingBuffer {
    /// Create a buffer holding up to `capacity` bytes of `info`-encoded data
    pub fn new(info: FormatDescriptor, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CodecError::invalid_config("ring buffer capacity must be non-zero"));
        }

        debug!("Created {} byte ring buffer for {}", capacity, info.annotation);
        Ok(Self {
            info,
            state: Mutex::new(RingState {
                store: vec![0u8; capacity].into_boxed_slice(),
                start: 0,
                len: 0,
            }),
        })
    }

    /// Create a buffer holding `millis` milliseconds of whole frames
    ///
    /// At least one frame is always held.
    pub fn with_duration(info: FormatDescriptor, millis: u32) -> Result<Self> {
        let samples = (info.rate as u64 * millis as u64 / 1000) as usize;
        let capacity = info.to_bytes(samples).max(info.framesize);
        Self::new(info, capacity)
    }

    /// Descriptor of the buffered data
    pub fn info(&self) -> &FormatDescriptor {
        &self.info
    }

    /// Capacity in bytes
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity()
    }

    /// Bytes currently buffered
    pub fn len(&self) -> usize {
        self.state.lock().len
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard everything buffered
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.start = 0;
        state.len = 0;
    }

    /// Append `data`, evicting the oldest bytes on overflow
    ///
    /// Always accepts the whole input and returns its length. If `data` alone
    /// exceeds the capacity, the buffer ends up holding its last `capacity`
    /// bytes.
    pub fn put(&self, data: &[u8]) -> usize {
        if data.is_empty() {
            return 0;
        }

        let mut state = self.state.lock();
        let evicted = (state.len + data.len()).saturating_sub(state.capacity());
        if evicted > 0 {
            debug!("ring buffer overflow: evicting {} bytes", evicted);
        }
        state.append(data);
        trace!("ring buffer put {} bytes, {} buffered", data.len(), state.len);
        data.len()
    }

    /// Fill `out` with buffered bytes, zero-padding on underrun
    ///
    /// Always reports `out.len()`; use [`read_available`](Self::read_available)
    /// when the caller needs to see the underrun.
    pub fn get_into(&self, out: &mut [u8]) -> usize {
        let copied = self.read_available(out);
        out[copied..].fill(0);
        out.len()
    }

    /// Take `amount` bytes, zero-padded on underrun
    pub fn get(&self, amount: usize) -> Bytes {
        let mut out = BytesMut::zeroed(amount);
        self.get_into(&mut out);
        out.freeze()
    }

    /// Copy out up to `out.len()` buffered bytes without padding
    ///
    /// Returns the number of real bytes copied; the rest of `out` is untouched.
    pub fn read_available(&self, out: &mut [u8]) -> usize {
        if out.is_empty() {
            return 0;
        }

        let mut state = self.state.lock();
        let copied = state.drain_into(out);
        if copied < out.len() {
            trace!("ring buffer underrun: {} of {} bytes", copied, out.len());
        }
        copied
    }
}

impl std::fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RingBuffer")
            .field("info", &self.info)
            .field("capacity", &state.capacity())
            .field("len", &state.len)
            .finish()
    }
}

impl EncodedBuffer for RingBuffer {
    fn info(&self) -> &FormatDescriptor {
        &self.info
    }

    fn put_buffer(&self, data: &[u8]) -> usize {
        self.put(data)
    }

    fn get_buffer(&self, out: &mut [u8]) -> usize {
        self.get_into(out)
    }
}
