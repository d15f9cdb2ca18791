//! This module implements the component contract.
//!
//! A component owns a few witness columns and a number of rows. Placed at a
//! start row `r0`, it
//! 1. registers its gates (constraints over rows relative to the activation row),
//! 2. enables their selectors on the rows of `r0..r0 + rows_amount` where they fire,
//! 3. binds its input variables, and its own rows to one another, with copy constraints,
//! 4. fills the witness, and exposes its output variables on its last row.
//!
//! [`generate_circuit`] runs steps 1 to 3. Step 4 runs separately, once per
//! witness, through [`Component::generate_assignments`].

use crate::{
    circuits::{
        assignment::AssignmentTable, constraints::ConstraintSystem, variable::Variable,
    },
    connectedness::{check_connectedness, ConnectednessCheck},
};
use ark_ff::PrimeField;
use log::debug;
use serde::{Deserialize, Serialize};

pub mod arithmetic;
pub mod range_check;
pub mod running_sum;
pub mod xor;

/// Minimum number of columns of each kind a component needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub witness_amount: usize,
    pub constant_required: usize,
    pub public_input_required: usize,
}

impl Manifest {
    pub fn new(witness_amount: usize) -> Self {
        Manifest {
            witness_amount,
            ..Default::default()
        }
    }

    /// The witness columns needed to hold every column index in `columns`.
    pub fn covering(columns: &[usize]) -> Self {
        Manifest::new(columns.iter().max().map_or(0, |max| max + 1))
    }

    #[must_use]
    pub fn constants(mut self, constant_required: usize) -> Self {
        self.constant_required = constant_required;
        self
    }

    #[must_use]
    pub fn public_inputs(mut self, public_input_required: usize) -> Self {
        self.public_input_required = public_input_required;
        self
    }

    /// The requirements of a circuit made of both components.
    #[must_use]
    pub fn merge(self, other: Manifest) -> Manifest {
        Manifest {
            witness_amount: self.witness_amount.max(other.witness_amount),
            constant_required: self.constant_required.max(other.constant_required),
            public_input_required: self.public_input_required.max(other.public_input_required),
        }
    }

    pub fn is_satisfied_by<F: PrimeField>(&self, assignment: &AssignmentTable<F>) -> bool {
        assignment.witnesses_amount() >= self.witness_amount
            && assignment.constants_amount() >= self.constant_required
            && assignment.public_inputs_amount() >= self.public_input_required
    }
}

/// The boundary variables of a component input or output.
pub trait ComponentVariables {
    fn all_vars(&self) -> Vec<Variable>;
}

/// A reusable piece of circuit, placed at a caller-chosen start row.
pub trait Component<F: PrimeField> {
    /// Absolute variables the component reads.
    type Input: ComponentVariables;
    /// Absolute variables holding the results, on the last row.
    type Output: ComponentVariables;

    fn manifest(&self) -> Manifest;

    fn witness_amount(&self) -> usize;

    fn rows_amount(&self) -> usize;

    fn gates_amount(&self) -> usize;

    fn lookup_gates_amount(&self) -> usize {
        0
    }

    /// The `table/subtable` names the lookup gates of the component use.
    /// They must be reserved before the gates are generated.
    fn lookup_tables(&self) -> Vec<String> {
        vec![]
    }

    /// Registers the gates and lookup gates, returning their selectors.
    fn generate_gates(&self, cs: &mut ConstraintSystem<F>) -> Vec<usize>;

    /// Enables the selectors returned by [`Component::generate_gates`] on
    /// the rows where they fire.
    fn enable_selectors(
        &self,
        selectors: &[usize],
        assignment: &mut AssignmentTable<F>,
        start_row: usize,
    );

    fn generate_copy_constraints(
        &self,
        cs: &mut ConstraintSystem<F>,
        input: &Self::Input,
        start_row: usize,
    );

    /// Fills the witness cells of the component from the values of `input`.
    fn generate_assignments(
        &self,
        assignment: &mut AssignmentTable<F>,
        input: &Self::Input,
        start_row: usize,
    ) -> Self::Output;

    /// The output variables of the component placed at `start_row`.
    fn result(&self, start_row: usize) -> Self::Output;
}

/// Places the gates, selectors and copy constraints of `component` at
/// `start_row`. The witness is filled separately.
///
/// # Panics
///
/// Will panic if the assignment table lacks columns the component needs, or
/// if the component returns a selector count that does not match its gates.
pub fn generate_circuit<F, C>(
    component: &C,
    cs: &mut ConstraintSystem<F>,
    assignment: &mut AssignmentTable<F>,
    input: &C::Input,
    start_row: usize,
) -> C::Output
where
    F: PrimeField,
    C: Component<F>,
{
    let manifest = component.manifest();
    assert!(
        manifest.is_satisfied_by(assignment),
        "assignment table does not meet the component manifest {manifest:?}"
    );

    let selectors = component.generate_gates(cs);
    assert_eq!(
        selectors.len(),
        component.gates_amount() + component.lookup_gates_amount(),
        "component returned the wrong number of selectors"
    );
    component.enable_selectors(&selectors, assignment, start_row);
    component.generate_copy_constraints(cs, input, start_row);

    debug!(
        "component placed on rows {}..{} with selectors {selectors:?}",
        start_row,
        start_row + component.rows_amount()
    );
    component.result(start_row)
}

/// Runs the connectedness checker on `component`, placed at `start_row`,
/// from its input variables to its output variables.
pub fn check_component_connectedness<F, C>(
    component: &C,
    cs: &ConstraintSystem<F>,
    assignment: &AssignmentTable<F>,
    input: &C::Input,
    start_row: usize,
    check: ConnectednessCheck,
) -> bool
where
    F: PrimeField,
    C: Component<F>,
{
    check_connectedness(
        cs,
        assignment,
        &input.all_vars(),
        &component.result(start_row).all_vars(),
        start_row,
        component.rows_amount(),
        check,
    )
}
