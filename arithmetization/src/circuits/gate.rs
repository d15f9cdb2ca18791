//! This module implements the gate primitives of the constraint system:
//! polynomial gates, lookup gates, copy constraints and the lookup-table
//! entries that lookup gates resolve against.

use crate::circuits::{
    expr::{collect_variables, Expr},
    variable::{ColumnType, Variable},
};
use ark_ff::Field;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of polynomial constraints that must all evaluate to zero at every
/// row where the selector column `selector_index` is non-zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Gate<F> {
    pub selector_index: usize,
    pub constraints: Vec<Expr<F>>,
}

impl<F: Field> Gate<F> {
    /// The distinct variables referenced by all the constraints of the gate.
    pub fn variables(&self) -> BTreeSet<Variable> {
        collect_variables(&self.constraints)
    }
}

/// Asserts that the tuple of `lookup_input` values is a row of the lookup
/// table `table_id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LookupConstraint<F> {
    pub table_id: usize,
    pub lookup_input: Vec<Expr<F>>,
}

/// A set of lookup constraints guarded by the selector `tag_index`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LookupGate<F> {
    pub tag_index: usize,
    pub constraints: Vec<LookupConstraint<F>>,
}

impl<F: Field> LookupGate<F> {
    /// The distinct variables referenced by all the lookup inputs of the gate.
    pub fn variables(&self) -> BTreeSet<Variable> {
        collect_variables(self.constraints.iter().flat_map(|c| c.lookup_input.iter()))
    }
}

/// An unconditional equality between two absolute cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CopyConstraint {
    pub first: Variable,
    pub second: Variable,
}

impl CopyConstraint {
    /// # Panics
    ///
    /// Will panic if either end is relative or selector-typed.
    pub fn new(first: Variable, second: Variable) -> Self {
        for v in [&first, &second] {
            assert!(!v.relative, "copy constraint end {v} must be absolute");
            assert!(
                v.typ != ColumnType::Selector,
                "copy constraint end {v} cannot be a selector"
            );
        }
        CopyConstraint { first, second }
    }
}

/// A lookup table as registered in the constraint system: the selector
/// marking the rows of the table, and one tuple of column variables per
/// physical placement ("option") of the table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupTable {
    pub tag_index: usize,
    pub columns_number: usize,
    pub lookup_options: Vec<Vec<Variable>>,
}

impl LookupTable {
    pub fn new(columns_number: usize, tag_index: usize) -> Self {
        LookupTable {
            tag_index,
            columns_number,
            lookup_options: vec![],
        }
    }

    /// Adds a placement of the table.
    ///
    /// # Panics
    ///
    /// Will panic if the option does not have `columns_number` columns.
    pub fn append_option(&mut self, option: Vec<Variable>) {
        assert_eq!(
            option.len(),
            self.columns_number,
            "lookup option width does not match the table"
        );
        self.lookup_options.push(option);
    }
}
