use crate::lookup::table::LookupTableDefinition;
use ark_ff::Field;

/// Name of the 4-bit xor table.
pub const XOR_TABLE_NAME: &str = "xor_4bit";

//~ The lookup table for 4-bit xor, with columns `left`, `right` and
//~ `left ^ right`, one row per pair of 4-bit arguments.

/// Returns the XOR lookup table
pub fn xor_table<F: Field>() -> LookupTableDefinition<F> {
    LookupTableDefinition::new(XOR_TABLE_NAME, 3, || {
        let mut data = vec![vec![]; 3];

        // XOR for all possible four-bit arguments.
        for i in 0u32..=0b1111 {
            for j in 0u32..=0b1111 {
                data[0].push(F::from(i));
                data[1].push(F::from(j));
                data[2].push(F::from(i ^ j));
            }
        }
        data
    })
    .subtable("full", vec![0, 1, 2], 0, 255)
}
