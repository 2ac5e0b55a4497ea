//! Index walks around a closed contour.

/// Yields the indices of a closed contour of `len` points starting after
/// `start` and wrapping around, ending with `start` itself.
pub(crate) fn ring_forward(len: usize, start: usize) -> impl Iterator<Item = usize> {
    (1..=len).map(move |step| (start + step) % len)
}

/// Yields the indices of a closed contour of `len` points starting before
/// `start` and wrapping around backwards, ending with `start` itself.
pub(crate) fn ring_backward(len: usize, start: usize) -> impl Iterator<Item = usize> {
    (1..=len).map(move |step| (start + len * step - step) % len)
}
