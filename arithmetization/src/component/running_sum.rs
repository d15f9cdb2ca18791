//! Sum of `n` field elements, one per row.
//!
//! Layout, on row `r0 + i`: `| a_i | prev_i | acc_i |` where `a_i` is the
//! i-th input, `prev_i` a copy of `acc_{i-1}` and `acc_i = prev_i + a_i`.
//! The first row has no `prev`: `acc_0 = a_0`.
//!
//! Two gates:
//! - `first`, on row `r0`: `acc - a = 0`,
//! - `step`, on rows `r0 + 1..r0 + n`: `acc - prev - a = 0`.

use crate::{
    circuits::{
        assignment::AssignmentTable, constraints::ConstraintSystem, expr::Expr,
        variable::Variable,
    },
    component::{Component, ComponentVariables, Manifest},
};
use ark_ff::PrimeField;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunningSumInput {
    pub values: Vec<Variable>,
}

impl ComponentVariables for RunningSumInput {
    fn all_vars(&self) -> Vec<Variable> {
        self.values.clone()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunningSumOutput {
    pub sum: Variable,
}

impl ComponentVariables for RunningSumOutput {
    fn all_vars(&self) -> Vec<Variable> {
        vec![self.sum]
    }
}

#[derive(Clone, Debug)]
pub struct RunningSum {
    /// Columns of `a`, `prev` and `acc`.
    pub witness: [usize; 3],
    pub terms: usize,
}

impl RunningSum {
    /// # Panics
    ///
    /// Will panic if `terms` is zero.
    pub fn new(witness: [usize; 3], terms: usize) -> Self {
        assert!(terms > 0, "a running sum needs at least one term");
        RunningSum { witness, terms }
    }

    fn a(&self, row: usize) -> Variable {
        Variable::witness_at(self.witness[0], row)
    }

    fn prev(&self, row: usize) -> Variable {
        Variable::witness_at(self.witness[1], row)
    }

    fn acc(&self, row: usize) -> Variable {
        Variable::witness_at(self.witness[2], row)
    }
}

impl<F: PrimeField> Component<F> for RunningSum {
    type Input = RunningSumInput;
    type Output = RunningSumOutput;

    fn manifest(&self) -> Manifest {
        Manifest::covering(&self.witness)
    }

    fn witness_amount(&self) -> usize {
        3
    }

    fn rows_amount(&self) -> usize {
        self.terms
    }

    fn gates_amount(&self) -> usize {
        2
    }

    fn generate_gates(&self, cs: &mut ConstraintSystem<F>) -> Vec<usize> {
        let [a, prev, acc] = self.witness.map(|c| Expr::<F>::var(Variable::witness(c, 0)));
        let first = cs.add_gate(vec![acc.clone() - a.clone()]);
        let step = cs.add_gate(vec![acc - prev - a]);
        vec![first, step]
    }

    fn enable_selectors(
        &self,
        selectors: &[usize],
        assignment: &mut AssignmentTable<F>,
        start_row: usize,
    ) {
        assignment.enable_selector(selectors[0], start_row);
        assignment.enable_selector_range(selectors[1], start_row + 1..start_row + self.terms);
    }

    fn generate_copy_constraints(
        &self,
        cs: &mut ConstraintSystem<F>,
        input: &RunningSumInput,
        start_row: usize,
    ) {
        assert_eq!(
            input.values.len(),
            self.terms,
            "running sum of {} terms given {} inputs",
            self.terms,
            input.values.len()
        );
        for (i, value) in input.values.iter().enumerate() {
            cs.add_copy_constraint(*value, self.a(start_row + i));
        }
        for row in start_row + 1..start_row + self.terms {
            cs.add_copy_constraint(self.prev(row), self.acc(row - 1));
        }
    }

    fn generate_assignments(
        &self,
        assignment: &mut AssignmentTable<F>,
        input: &RunningSumInput,
        start_row: usize,
    ) -> RunningSumOutput {
        let mut acc = F::zero();
        for (i, value) in input.values.iter().enumerate() {
            let row = start_row + i;
            let a = assignment.value(value);
            if i > 0 {
                assignment.set(&self.prev(row), acc);
            }
            acc += a;
            assignment.set(&self.a(row), a);
            assignment.set(&self.acc(row), acc);
        }
        <Self as Component<F>>::result(self, start_row)
    }

    fn result(&self, start_row: usize) -> RunningSumOutput {
        RunningSumOutput {
            sum: self.acc(start_row + self.terms - 1),
        }
    }
}
