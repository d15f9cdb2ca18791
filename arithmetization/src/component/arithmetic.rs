//! One-row addition and multiplication of two field elements.
//!
//! Layout, on a single row: `| x | y | output |` in the three witness
//! columns given at construction.

use crate::{
    circuits::{
        assignment::AssignmentTable, constraints::ConstraintSystem, expr::Expr,
        variable::Variable,
    },
    component::{Component, ComponentVariables, Manifest},
};
use ark_ff::PrimeField;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArithmeticInput {
    pub x: Variable,
    pub y: Variable,
}

impl ComponentVariables for ArithmeticInput {
    fn all_vars(&self) -> Vec<Variable> {
        vec![self.x, self.y]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArithmeticOutput {
    pub output: Variable,
}

impl ComponentVariables for ArithmeticOutput {
    fn all_vars(&self) -> Vec<Variable> {
        vec![self.output]
    }
}

/// `output = x + y`
#[derive(Clone, Debug)]
pub struct Addition {
    pub witness: [usize; 3],
}

/// `output = x * y`
#[derive(Clone, Debug)]
pub struct Multiplication {
    pub witness: [usize; 3],
}

fn operand<F: PrimeField>(column: usize) -> Expr<F> {
    Expr::var(Variable::witness(column, 0))
}

fn copy_operands<F: PrimeField>(
    witness: &[usize; 3],
    cs: &mut ConstraintSystem<F>,
    input: &ArithmeticInput,
    start_row: usize,
) {
    cs.add_copy_constraint(input.x, Variable::witness_at(witness[0], start_row));
    cs.add_copy_constraint(input.y, Variable::witness_at(witness[1], start_row));
}

fn assign<F: PrimeField>(
    witness: &[usize; 3],
    assignment: &mut AssignmentTable<F>,
    input: &ArithmeticInput,
    start_row: usize,
    op: impl Fn(F, F) -> F,
) -> ArithmeticOutput {
    let x = assignment.value(&input.x);
    let y = assignment.value(&input.y);
    assignment.set_witness(witness[0], start_row, x);
    assignment.set_witness(witness[1], start_row, y);
    assignment.set_witness(witness[2], start_row, op(x, y));
    ArithmeticOutput {
        output: Variable::witness_at(witness[2], start_row),
    }
}

macro_rules! one_row_component {
    ($component:ident, $constraint:expr, $op:expr) => {
        impl<F: PrimeField> Component<F> for $component {
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
                1
            }

            fn generate_gates(&self, cs: &mut ConstraintSystem<F>) -> Vec<usize> {
                let [x, y, output] = self.witness.map(operand::<F>);
                vec![cs.add_gate(vec![$constraint(x, y, output)])]
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
                copy_operands(&self.witness, cs, input, start_row);
            }

            fn generate_assignments(
                &self,
                assignment: &mut AssignmentTable<F>,
                input: &ArithmeticInput,
                start_row: usize,
            ) -> ArithmeticOutput {
                assign(&self.witness, assignment, input, start_row, $op)
            }

            fn result(&self, start_row: usize) -> ArithmeticOutput {
                ArithmeticOutput {
                    output: Variable::witness_at(self.witness[2], start_row),
                }
            }
        }
    };
}

one_row_component!(
    Addition,
    |x: Expr<F>, y: Expr<F>, output: Expr<F>| x + y - output,
    |x: F, y: F| x + y
);

one_row_component!(
    Multiplication,
    |x: Expr<F>, y: Expr<F>, output: Expr<F>| x * y - output,
    |x: F, y: F| x * y
);
