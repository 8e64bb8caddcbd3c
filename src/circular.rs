use alloc::boxed::Box;
use alloc::collections::TryReserveError;
use alloc::vec;
use alloc::vec::Vec;
use log::{debug, error, warn};
use num_traits::float::FloatCore;

use crate::interpolate::linear_interpolate;

/// Capacity hint used by [`CircularBuffer::default`].
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Smallest power of two that holds `min_size` samples.
///
/// Zero is treated as one. Requests beyond the largest representable power
/// of two saturate to it, which then fails to allocate.
pub fn capacity_for(min_size: usize) -> usize {
    min_size
        .max(1)
        .checked_next_power_of_two()
        .unwrap_or(1 << (usize::BITS - 1))
}

/// Power-of-two ring buffer for delayed reads over a sample stream.
///
/// Every [`write`](Self::write) advances the cursor one slot and
/// [`read`](Self::read) looks back a given number of writes. Wraparound is a
/// bitmask, so both are O(1) and branch-free.
///
/// Delays must lie in `[0, capacity)`. Larger values are not checked and
/// silently alias to another slot.
#[derive(Clone, Debug)]
pub struct CircularBuffer<T> {
    buffer: Box<[T]>,
    write_index: usize,
    wrap_bits: usize,
}

impl<T: FloatCore> CircularBuffer<T> {
    /// Create a zeroed buffer of at least `min_size` samples.
    pub fn new(min_size: usize) -> Self {
        let mut circular = Self {
            buffer: Box::new([]),
            write_index: 0,
            wrap_bits: 0,
        };
        circular.reset(min_size);
        circular
    }

    /// Like [`new`](Self::new) but reports allocation failure instead of
    /// aborting.
    pub fn try_new(min_size: usize) -> Result<Self, TryReserveError> {
        let mut circular = Self {
            buffer: Box::new([]),
            write_index: 0,
            wrap_bits: 0,
        };
        circular.try_reset(min_size)?;
        Ok(circular)
    }

    /// Reallocate to at least `min_size` samples. Prior contents are
    /// discarded and the cursor returns to zero.
    pub fn reset(&mut self, min_size: usize) {
        let length = Self::sized(min_size);
        self.install(vec![T::zero(); length].into_boxed_slice());
    }

    /// Like [`reset`](Self::reset) but reports allocation failure. On error
    /// the buffer keeps its previous capacity and contents.
    pub fn try_reset(&mut self, min_size: usize) -> Result<(), TryReserveError> {
        let length = Self::sized(min_size);
        let mut buffer = Vec::new();
        if let Err(err) = buffer.try_reserve_exact(length) {
            error!("failed to allocate {} samples: {}", length, err);
            return Err(err);
        }
        buffer.resize(length, T::zero());
        self.install(buffer.into_boxed_slice());
        Ok(())
    }

    fn sized(min_size: usize) -> usize {
        if min_size == 0 {
            warn!("zero-sized circular buffer requested, using capacity 1");
        }
        let length = capacity_for(min_size);
        debug!("circular buffer sized to {} (requested {})", length, min_size);
        length
    }

    fn install(&mut self, buffer: Box<[T]>) {
        self.wrap_bits = buffer.len() - 1;
        self.buffer = buffer;
        self.write_index = 0;
    }

    /// Zero every slot. Capacity and cursor are unchanged.
    pub fn clear(&mut self) {
        self.buffer.fill(T::zero());
    }

    /// Store `value` at the cursor and advance it. NaN and infinities are
    /// stored as zero.
    #[inline]
    pub fn write(&mut self, value: T) {
        self.buffer[self.write_index] = if value.is_finite() {
            value
        } else {
            T::zero()
        };
        self.write_index = (self.write_index + 1) & self.wrap_bits;
    }

    /// Sample written `delay` writes ago; `read(0)` is the slot the next
    /// write will overwrite, i.e. the oldest sample.
    ///
    /// `delay` must be below [`capacity`](Self::capacity); larger values
    /// alias.
    #[inline]
    pub fn read(&self, delay: usize) -> T {
        self.buffer[self.write_index.wrapping_sub(delay) & self.wrap_bits]
    }

    /// Read at a fractional delay. The integer part selects `read(i)`; with
    /// `interpolate` the result blends towards `read(i + 1)` by the
    /// fractional part, otherwise it is `read(i)` unchanged.
    ///
    /// Same aliasing precondition as [`read`](Self::read). A delay whose
    /// integer part does not fit an `isize` (including NaN) reads from
    /// delay zero.
    #[inline]
    pub fn read_fractional(&self, delay: T, interpolate: bool) -> T {
        let whole = delay.trunc();
        let index = whole.to_isize().unwrap_or(0) as usize;
        let y1 = self.read(index);
        if !interpolate {
            return y1;
        }
        let y2 = self.read(index.wrapping_add(1));
        linear_interpolate(y1, y2, delay - whole)
    }

    /// Interpolated read, see [`read_fractional`](Self::read_fractional).
    #[inline]
    pub fn read_interpolated(&self, delay: T) -> T {
        self.read_fractional(delay, true)
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }
}

impl<T: FloatCore> Default for CircularBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}
