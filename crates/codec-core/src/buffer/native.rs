//! Native byte-order adapter
//!
//! Linear PCM travels in the byte order its descriptor declares. The adapter
//! swaps 16-bit words on the way in and out when that order differs from the
//! host's, so callers always see native samples. Compressed bitstreams are
//! octet streams and pass through untouched.

use crate::types::FormatDescriptor;
use std::borrow::Cow;
use tracing::trace;

/// Byte-level put/get endpoint for encoded data
pub trait EncodedBuffer {
    /// Descriptor of the data carried
    fn info(&self) -> &FormatDescriptor;

    /// Store `data`; returns the number of bytes accepted
    fn put_buffer(&self, data: &[u8]) -> usize;

    /// Fill `out`; returns the number of bytes delivered
    fn get_buffer(&self, out: &mut [u8]) -> usize;
}

/// Swap 16-bit words of `data` in place when `info` is not in host order
///
/// A trailing odd byte is left as is.
pub fn swap_encoded(info: &FormatDescriptor, data: &mut [u8]) {
    if !info.needs_swap() {
        return;
    }

    for word in data.chunks_exact_mut(2) {
        word.swap(0, 1);
    }
}

/// Applies byte-order correction around an [`EncodedBuffer`]
#[derive(Debug)]
pub struct NativeAdapter<B> {
    inner: B,
}

impl<B: EncodedBuffer> NativeAdapter<B> {
    /// Wrap `inner`
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    /// The wrapped endpoint
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Unwrap the endpoint
    pub fn into_inner(self) -> B {
        self.inner
    }

    /// Store host-order `data`, converting to the declared order
    pub fn put_native(&self, data: &[u8]) -> usize {
        let info = self.inner.info();
        let data: Cow<'_, [u8]> = if info.needs_swap() {
            let mut swapped = data.to_vec();
            swap_encoded(info, &mut swapped);
            trace!("swapped {} bytes for {}", swapped.len(), info.annotation);
            Cow::Owned(swapped)
        } else {
            Cow::Borrowed(data)
        };
        self.inner.put_buffer(&data)
    }

    /// Fill `out` with host-order data converted from the declared order
    pub fn get_native(&self, out: &mut [u8]) -> usize {
        let delivered = self.inner.get_buffer(out);
        if delivered == 0 {
            return 0;
        }

        swap_encoded(self.inner.info(), &mut out[..delivered]);
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RingBuffer;
    use crate::types::{ByteOrder, Encoding};

    fn foreign_order() -> ByteOrder {
        match ByteOrder::native() {
            ByteOrder::Little => ByteOrder::Big,
            ByteOrder::Big => ByteOrder::Little,
        }
    }

    #[test]
    fn test_swap_encoded() {
        let foreign = FormatDescriptor::new(Encoding::Pcm16Mono).with_order(foreign_order());
        let mut data = [1u8, 2, 3, 4, 5];
        swap_encoded(&foreign, &mut data);
        assert_eq!(data, [2, 1, 4, 3, 5]);

        let native = FormatDescriptor::new(Encoding::Pcm16Mono);
        swap_encoded(&native, &mut data);
        assert_eq!(data, [2, 1, 4, 3, 5]);
    }

    #[test]
    fn test_compressed_data_passes_through() {
        let info = FormatDescriptor::new(Encoding::G721Adpcm).with_order(foreign_order());
        let adapter = NativeAdapter::new(RingBuffer::new(info, 16).unwrap());

        adapter.put_native(&[0x12, 0x34]);
        assert_eq!(&adapter.inner().get(2)[..], &[0x12, 0x34]);
    }

    #[test]
    fn test_foreign_order_round_trip() {
        let info = FormatDescriptor::new(Encoding::Pcm16Mono).with_order(foreign_order());
        let adapter = NativeAdapter::new(RingBuffer::new(info, 16).unwrap());

        let sample: i16 = 0x1234;
        let native = sample.to_ne_bytes();
        assert_eq!(adapter.put_native(&native), 2);

        // Stored in the declared (foreign) order
        assert_eq!(adapter.inner().len(), 2);
        let mut stored = [0u8; 2];
        adapter.inner().read_available(&mut stored);
        assert_eq!(stored, [native[1], native[0]]);

        // And converted back on the way out
        adapter.inner().put(&stored);
        let mut out = [0u8; 2];
        assert_eq!(adapter.get_native(&mut out), 2);
        assert_eq!(i16::from_ne_bytes(out), sample);
    }
}
