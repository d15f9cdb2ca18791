//! Built-in lookup tables.

pub mod range;
pub mod xor;

pub use range::range_table;
pub use xor::xor_table;
