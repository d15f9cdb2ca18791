//! This module implements the variable primitive: a reference to one cell of
//! the assignment table.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter};

/// The four kinds of columns of the assignment table.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum ColumnType {
    #[strum(serialize = "witness")]
    Witness,
    #[strum(serialize = "constant")]
    Constant,
    #[strum(serialize = "public_input")]
    PublicInput,
    #[strum(serialize = "selector")]
    Selector,
}

/// A cell of the assignment table.
///
/// When `relative` is set, `rotation` is an offset (`-1`, `0`, `+1`, ...)
/// resolved against the row a gate is activated at. Otherwise `rotation` is
/// an absolute row and must be non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub typ: ColumnType,
    pub index: usize,
    pub rotation: i32,
    pub relative: bool,
}

impl Variable {
    pub fn new(typ: ColumnType, index: usize, rotation: i32, relative: bool) -> Self {
        assert!(
            relative || rotation >= 0,
            "absolute variable {typ}[{index}] at negative row {rotation}"
        );
        Variable {
            typ,
            index,
            rotation,
            relative,
        }
    }

    /// Witness cell at a row offset from the activation row.
    pub fn witness(index: usize, rotation: i32) -> Self {
        Self::new(ColumnType::Witness, index, rotation, true)
    }

    /// Witness cell at an absolute row.
    pub fn witness_at(index: usize, row: usize) -> Self {
        Self::new(ColumnType::Witness, index, to_rotation(row), false)
    }

    /// Constant cell at a row offset from the activation row.
    pub fn constant(index: usize, rotation: i32) -> Self {
        Self::new(ColumnType::Constant, index, rotation, true)
    }

    /// Constant cell at an absolute row.
    pub fn constant_at(index: usize, row: usize) -> Self {
        Self::new(ColumnType::Constant, index, to_rotation(row), false)
    }

    /// Public input cell at an absolute row.
    pub fn public_input_at(index: usize, row: usize) -> Self {
        Self::new(ColumnType::PublicInput, index, to_rotation(row), false)
    }

    /// Absolute row of the cell when the gate using it is active at `row`.
    /// Returns `None` if a negative rotation reaches above the first row.
    pub fn row(&self, row: usize) -> Option<usize> {
        if self.relative {
            let resolved = row as i64 + i64::from(self.rotation);
            usize::try_from(resolved).ok()
        } else {
            Some(self.rotation as usize)
        }
    }

    /// The same cell as an absolute variable, given the activation row.
    pub fn resolve(&self, row: usize) -> Option<Variable> {
        self.row(row).map(|r| Variable::new(self.typ, self.index, to_rotation(r), false))
    }

    /// Absolute row of an absolute variable.
    ///
    /// # Panics
    ///
    /// Will panic if the variable is relative.
    pub fn absolute_row(&self) -> usize {
        assert!(!self.relative, "{self} is relative, an absolute row is required");
        self.rotation as usize
    }
}

fn to_rotation(row: usize) -> i32 {
    i32::try_from(row).expect("row does not fit in a rotation")
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.typ {
            ColumnType::Witness => "w",
            ColumnType::Constant => "c",
            ColumnType::PublicInput => "pi",
            ColumnType::Selector => "s",
        };
        if self.relative {
            write!(f, "{prefix}{}[{:+}]", self.index, self.rotation)
        } else {
            write!(f, "{prefix}{}@{}", self.index, self.rotation)
        }
    }
}
