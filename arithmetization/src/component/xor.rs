//! Xor of two 4-bit values, checked against the `xor_4bit` lookup table.
//!
//! Layout, on a single row: `| left | right | output |`, with one lookup gate
//! asserting that the row is an entry of `xor_4bit/full`.

use crate::{
    circuits::{
        assignment::AssignmentTable, constraints::ConstraintSystem, expr::Expr,
        gate::LookupConstraint, variable::Variable,
    },
    component::{
        arithmetic::{ArithmeticInput, ArithmeticOutput},
        Component, Manifest,
    },
    lookup::{packing::full_table_name, tables::xor::XOR_TABLE_NAME},
};
use ark_ff::{BigInteger, PrimeField};

#[derive(Clone, Debug)]
pub struct Xor {
    pub witness: [usize; 3],
}

/// The low 64 bits of a field element.
fn to_u64<F: PrimeField>(x: F) -> u64 {
    x.into_bigint().to_bytes_le()[..8]
        .iter()
        .rev()
        .fold(0, |acc, byte| (acc << 8) | u64::from(*byte))
}

impl<F: PrimeField> Component<F> for Xor {
    type Input = ArithmeticInput;
    type Output = ArithmeticOutput;

    fn manifest(&self) -> Manifest {
        Manifest::covering(&self.witness)
    }

    fn witness_amount(&self) -> usize {
        3
    }

    fn rows_amount(&self) -> usize {
        1
    }

    fn gates_amount(&self) -> usize {
        0
    }

    fn lookup_gates_amount(&self) -> usize {
        1
    }

    fn lookup_tables(&self) -> Vec<String> {
        vec![full_table_name(XOR_TABLE_NAME, "full")]
    }

    fn generate_gates(&self, cs: &mut ConstraintSystem<F>) -> Vec<usize> {
        let table_id = cs.lookup_table_id(&full_table_name(XOR_TABLE_NAME, "full"));
        let lookup_input = self
            .witness
            .iter()
            .map(|&c| Expr::var(Variable::witness(c, 0)))
            .collect();
        vec![cs.add_lookup_gate(vec![LookupConstraint {
            table_id,
            lookup_input,
        }])]
    }

    fn enable_selectors(
        &self,
        selectors: &[usize],
        assignment: &mut AssignmentTable<F>,
        start_row: usize,
    ) {
        assignment.enable_selector(selectors[0], start_row);
    }

    fn generate_copy_constraints(
        &self,
        cs: &mut ConstraintSystem<F>,
        input: &ArithmeticInput,
        start_row: usize,
    ) {
        cs.add_copy_constraint(input.x, Variable::witness_at(self.witness[0], start_row));
        cs.add_copy_constraint(input.y, Variable::witness_at(self.witness[1], start_row));
    }

    fn generate_assignments(
        &self,
        assignment: &mut AssignmentTable<F>,
        input: &ArithmeticInput,
        start_row: usize,
    ) -> ArithmeticOutput {
        let left = assignment.value(&input.x);
        let right = assignment.value(&input.y);
        let output = F::from(to_u64(left) ^ to_u64(right));
        assignment.set_witness(self.witness[0], start_row, left);
        assignment.set_witness(self.witness[1], start_row, right);
        assignment.set_witness(self.witness[2], start_row, output);
        <Self as Component<F>>::result(self, start_row)
    }

    fn result(&self, start_row: usize) -> ArithmeticOutput {
        ArithmeticOutput {
            output: Variable::witness_at(self.witness[2], start_row),
        }
    }
}
