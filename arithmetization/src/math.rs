//! Small integer helpers used by the table packers.

/// Returns floor(log2(d)), i.e. the position of the highest set bit,
/// but panics if d = 0.
pub fn floor_log2(d: usize) -> usize {
    assert!(d != 0);
    (usize::BITS - 1 - d.leading_zeros()) as usize
}

/// Shrinks a row bound to `2^floor(log2(x)) - 3`.
///
/// The result is always strictly smaller than `x`. Returns `None` when the
/// subtraction would underflow, i.e. when there is nothing left to shrink to.
pub fn next_power_of_two_minus_3(x: usize) -> Option<usize> {
    if x == 0 {
        return None;
    }
    (1usize << floor_log2(x)).checked_sub(3)
}
