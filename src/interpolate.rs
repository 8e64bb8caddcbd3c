use num_traits::float::FloatCore;

/// Point at `fraction` along the line from `v0` to `v1`.
///
/// No clamping: a `fraction` outside `[0.0, 1.0]` extrapolates.
#[inline]
pub fn linear_interpolate<T: FloatCore>(v0: T, v1: T, fraction: T) -> T {
    fraction * (v1 - v0) + v0
}
