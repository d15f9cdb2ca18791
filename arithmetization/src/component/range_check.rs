//! Range check of one value through a range table subtable, e.g.
//! `range_16bit/full` for 16 bits or `range_16bit/8bit` for 8 bits.

use crate::{
    circuits::{
        assignment::AssignmentTable, constraints::ConstraintSystem, expr::Expr,
        gate::LookupConstraint, variable::Variable,
    },
    component::{Component, ComponentVariables, Manifest},
    lookup::{packing::full_table_name, tables::range::range_table_name},
};
use ark_ff::PrimeField;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeCheckInput {
    pub x: Variable,
}

impl ComponentVariables for RangeCheckInput {
    fn all_vars(&self) -> Vec<Variable> {
        vec![self.x]
    }
}

/// The checked value, copied in the witness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeCheckOutput {
    pub x: Variable,
}

impl ComponentVariables for RangeCheckOutput {
    fn all_vars(&self) -> Vec<Variable> {
        vec![self.x]
    }
}

#[derive(Clone, Debug)]
pub struct RangeCheck {
    pub witness: usize,
    /// `table/subtable` the value is looked up in.
    pub table: String,
}

impl RangeCheck {
    /// Checks values against the whole range table over `bits` bits.
    pub fn new(witness: usize, bits: usize) -> Self {
        Self::with_subtable(witness, bits, "full")
    }

    /// Checks values against one subtable of the range table over `bits` bits.
    pub fn with_subtable(witness: usize, bits: usize, subtable: &str) -> Self {
        RangeCheck {
            witness,
            table: full_table_name(&range_table_name(bits), subtable),
        }
    }
}

impl<F: PrimeField> Component<F> for RangeCheck {
    type Input = RangeCheckInput;
    type Output = RangeCheckOutput;

    fn manifest(&self) -> Manifest {
        Manifest::new(self.witness + 1)
    }

    fn witness_amount(&self) -> usize {
        1
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
        vec![self.table.clone()]
    }

    fn generate_gates(&self, cs: &mut ConstraintSystem<F>) -> Vec<usize> {
        let table_id = cs.lookup_table_id(&self.table);
        vec![cs.add_lookup_gate(vec![LookupConstraint {
            table_id,
            lookup_input: vec![Expr::var(Variable::witness(self.witness, 0))],
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
        input: &RangeCheckInput,
        start_row: usize,
    ) {
        cs.add_copy_constraint(input.x, Variable::witness_at(self.witness, start_row));
    }

    fn generate_assignments(
        &self,
        assignment: &mut AssignmentTable<F>,
        input: &RangeCheckInput,
        start_row: usize,
    ) -> RangeCheckOutput {
        let x = assignment.value(&input.x);
        assignment.set_witness(self.witness, start_row, x);
        <Self as Component<F>>::result(self, start_row)
    }

    fn result(&self, start_row: usize) -> RangeCheckOutput {
        RangeCheckOutput {
            x: Variable::witness_at(self.witness, start_row),
        }
    }
}
