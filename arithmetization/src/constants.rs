//! Crate-wide constants.

/// Rows at the top of the constant columns that lookup tables never occupy.
/// Row 0 stays all-zero so that an inactive lookup (all inputs zero) always
/// has a matching entry.
pub const RESERVED_ROWS: usize = 1;

/// Default upper bound on the row budget used by the horizontal packer.
pub const DEFAULT_MAX_USABLE_ROWS: usize = 250_000;

/// Separates a table name from a subtable name, as in `range_16bit/full`.
pub const TABLE_NAME_SEPARATOR: char = '/';
