//! Range tables

//~ A range table is a single-column table containing the numbers from 0 to
//~ 2^bits (excluded). Its `full` subtable checks that a value fits in `bits`
//~ bits; the `{bits/2}bit` subtable is the prefix of the column holding the
//~ numbers below 2^(bits/2).

use crate::lookup::table::LookupTableDefinition;
use ark_ff::Field;

/// Name of the range table over `bits` bits.
pub fn range_table_name(bits: usize) -> String {
    format!("range_{bits}bit")
}

/// A single-column table containing the numbers from 0 to 2^`bits` (exclusive)
///
/// # Panics
///
/// Will panic if `bits` is not in `2..=20`.
pub fn range_table<F: Field>(bits: usize) -> LookupTableDefinition<F> {
    assert!(
        (2..=20).contains(&bits),
        "range tables are supported from 2 to 20 bits, not {bits}"
    );
    let upper_bound = 1u64 << bits;
    let half = bits / 2;
    LookupTableDefinition::new(range_table_name(bits), 1, move || {
        vec![(0..upper_bound).map(F::from).collect()]
    })
    .subtable("full", vec![0], 0, (upper_bound - 1) as usize)
    .subtable(format!("{half}bit"), vec![0], 0, (1usize << half) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr as Fp;

    #[test]
    fn test_range_table() {
        let table = range_table::<Fp>(8);
        assert_eq!(table.name(), "range_8bit");
        assert_eq!(table.rows(), 256);
        assert_eq!(table.get_table()[0][255], Fp::from(255u64));

        let half = table.get_subtable("4bit").unwrap();
        assert_eq!((half.begin, half.end), (0, 15));
        assert!(table.get_subtable("full").unwrap().spans(256));
    }
}
