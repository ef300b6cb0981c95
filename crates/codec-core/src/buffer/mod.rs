//! Streaming buffers
//!
//! [`RingBuffer`] is the hand-off point between an encode or decode flow and a
//! transport running on its own clock. [`NativeAdapter`] wraps any
//! [`EncodedBuffer`] and corrects byte order for linear formats.

pub mod native;
pub mod ring;

pub use native::{swap_encoded, EncodedBuffer, NativeAdapter};
pub use ring::RingBuffer;
