//! This module implements the error types returned by the table packers and
//! by the satisfiability check.

use crate::circuits::variable::Variable;
use thiserror::Error;

/// Errors that can arise when placing lookup tables in the assignment table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("table {table} needs {required} constant columns, only {available} are available")]
    NotEnoughConstantColumns {
        table: String,
        required: usize,
        available: usize,
    },

    #[error("selector {selector} does not fit in the {available} selector columns")]
    NotEnoughSelectorColumns { selector: usize, available: usize },

    #[error("table {table} has {rows} rows and cannot be folded, the row budget is {max_usable_rows}")]
    TableTooLong {
        table: String,
        rows: usize,
        max_usable_rows: usize,
    },

    #[error("the lookup tables do not fit in any row budget, gave up at {max_usable_rows} rows")]
    PackingExhausted { max_usable_rows: usize },
}

/// Errors that can arise when checking an assignment against a constraint system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SatisfiabilityError {
    #[error("constraint {constraint} of the gate with selector {selector} does not hold at row {row}")]
    GateNotSatisfied {
        selector: usize,
        row: usize,
        constraint: usize,
    },

    #[error("lookup {constraint} of the lookup gate with tag {tag} finds no match in table {table_id} at row {row}")]
    LookupNotSatisfied {
        tag: usize,
        row: usize,
        constraint: usize,
        table_id: usize,
    },

    #[error("the lookup gate with tag {tag} references table {table_id}, which is not registered")]
    UnregisteredLookupTable { tag: usize, table_id: usize },

    #[error("the copy constraint {first} = {second} does not hold")]
    CopyConstraintViolated { first: Variable, second: Variable },
}
