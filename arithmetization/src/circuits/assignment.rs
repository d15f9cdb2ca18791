//! This module implements the assignment table: one growable vector of field
//! values per column, for each of the four column types.

use crate::circuits::variable::{ColumnType, Variable};
use ark_ff::Field;
use std::io::{Result as IoResult, Write};
use strum::IntoEnumIterator;

/// The column/row grid a circuit is assigned into.
///
/// The number of columns of each type is fixed at construction; columns grow
/// on demand when a cell past their end is written. Cells never written read
/// as zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentTable<F> {
    witnesses: Vec<Vec<F>>,
    public_inputs: Vec<Vec<F>>,
    constants: Vec<Vec<F>>,
    selectors: Vec<Vec<F>>,
}

/// Builder for the column layout of an [`AssignmentTable`].
pub struct Builder {
    witnesses: usize,
    public_inputs: usize,
    constants: usize,
    selectors: usize,
}

impl<F: Field> AssignmentTable<F> {
    /// Starts describing a table with `witnesses` witness columns.
    /// It defaults to no public input, constant or selector column.
    ///
    /// How to use it:
    /// 1. `AssignmentTable::create(witnesses)`
    /// 2. any of `public_inputs()`, `constants()`, `selectors()`
    /// 3. `build()`
    pub fn create(witnesses: usize) -> Builder {
        Builder {
            witnesses,
            public_inputs: 0,
            constants: 0,
            selectors: 0,
        }
    }

    pub fn witnesses_amount(&self) -> usize {
        self.witnesses.len()
    }

    pub fn public_inputs_amount(&self) -> usize {
        self.public_inputs.len()
    }

    pub fn constants_amount(&self) -> usize {
        self.constants.len()
    }

    pub fn selectors_amount(&self) -> usize {
        self.selectors.len()
    }

    /// Number of columns of the given type.
    pub fn amount(&self, typ: ColumnType) -> usize {
        self.columns(typ).len()
    }

    fn columns(&self, typ: ColumnType) -> &Vec<Vec<F>> {
        match typ {
            ColumnType::Witness => &self.witnesses,
            ColumnType::PublicInput => &self.public_inputs,
            ColumnType::Constant => &self.constants,
            ColumnType::Selector => &self.selectors,
        }
    }

    fn columns_mut(&mut self, typ: ColumnType) -> &mut Vec<Vec<F>> {
        match typ {
            ColumnType::Witness => &mut self.witnesses,
            ColumnType::PublicInput => &mut self.public_inputs,
            ColumnType::Constant => &mut self.constants,
            ColumnType::Selector => &mut self.selectors,
        }
    }

    /// Number of assigned rows of a column.
    ///
    /// # Panics
    ///
    /// Will panic if the column does not exist.
    pub fn column_size(&self, typ: ColumnType, column: usize) -> usize {
        self.column(typ, column).len()
    }

    pub fn witness_column_size(&self, column: usize) -> usize {
        self.column_size(ColumnType::Witness, column)
    }

    pub fn public_input_column_size(&self, column: usize) -> usize {
        self.column_size(ColumnType::PublicInput, column)
    }

    pub fn constant_column_size(&self, column: usize) -> usize {
        self.column_size(ColumnType::Constant, column)
    }

    pub fn selector_column_size(&self, column: usize) -> usize {
        self.column_size(ColumnType::Selector, column)
    }

    /// Size of the longest column.
    pub fn rows_amount(&self) -> usize {
        ColumnType::iter()
            .flat_map(|typ| self.columns(typ).iter().map(Vec::len))
            .max()
            .unwrap_or(0)
    }

    /// All the values of a column.
    ///
    /// # Panics
    ///
    /// Will panic if the column does not exist.
    pub fn column(&self, typ: ColumnType, column: usize) -> &[F] {
        let columns = self.columns(typ);
        assert!(
            column < columns.len(),
            "{typ} column {column} out of range ({} available)",
            columns.len()
        );
        &columns[column]
    }

    /// Value of a cell; zero if it was never written.
    pub fn get(&self, typ: ColumnType, column: usize, row: usize) -> F {
        self.column(typ, column)
            .get(row)
            .copied()
            .unwrap_or_else(F::zero)
    }

    /// Writes a cell, growing the column if needed.
    pub fn set_cell(&mut self, typ: ColumnType, column: usize, row: usize, value: F) {
        let columns = self.columns_mut(typ);
        assert!(
            column < columns.len(),
            "{typ} column {column} out of range ({} available)",
            columns.len()
        );
        let col = &mut columns[column];
        if row >= col.len() {
            col.resize(row + 1, F::zero());
        }
        col[row] = value;
    }

    pub fn witness(&self, column: usize, row: usize) -> F {
        self.get(ColumnType::Witness, column, row)
    }

    pub fn public_input(&self, column: usize, row: usize) -> F {
        self.get(ColumnType::PublicInput, column, row)
    }

    pub fn constant(&self, column: usize, row: usize) -> F {
        self.get(ColumnType::Constant, column, row)
    }

    pub fn selector(&self, column: usize, row: usize) -> F {
        self.get(ColumnType::Selector, column, row)
    }

    pub fn set_witness(&mut self, column: usize, row: usize, value: F) {
        self.set_cell(ColumnType::Witness, column, row, value)
    }

    pub fn set_public_input(&mut self, column: usize, row: usize, value: F) {
        self.set_cell(ColumnType::PublicInput, column, row, value)
    }

    pub fn set_constant(&mut self, column: usize, row: usize, value: F) {
        self.set_cell(ColumnType::Constant, column, row, value)
    }

    /// Value of an absolute variable.
    pub fn value(&self, var: &Variable) -> F {
        self.get(var.typ, var.index, var.absolute_row())
    }

    /// Value of a variable as seen by a gate active at `row`.
    /// Rows above the first one read as zero.
    pub fn value_at(&self, var: &Variable, row: usize) -> F {
        match var.row(row) {
            Some(r) => self.get(var.typ, var.index, r),
            None => F::zero(),
        }
    }

    /// Writes through an absolute variable.
    pub fn set(&mut self, var: &Variable, value: F) {
        self.set_cell(var.typ, var.index, var.absolute_row(), value)
    }

    pub fn enable_selector(&mut self, selector: usize, row: usize) {
        self.set_cell(ColumnType::Selector, selector, row, F::one())
    }

    /// Sets the selector to one on every row of `rows`.
    pub fn enable_selector_range(&mut self, selector: usize, rows: std::ops::Range<usize>) {
        for row in rows {
            self.enable_selector(selector, row);
        }
    }

    /// Whether the selector is non-zero at `row`.
    pub fn is_selector_enabled(&self, selector: usize, row: usize) -> bool {
        !self.selector(selector, row).is_zero()
    }

    /// Replaces the whole content of a constant column.
    pub fn fill_constant(&mut self, column: usize, values: Vec<F>) {
        let columns = self.columns_mut(ColumnType::Constant);
        assert!(column < columns.len(), "constant column {column} out of range");
        columns[column] = values;
    }

    /// Replaces the whole content of a selector column.
    pub fn fill_selector(&mut self, selector: usize, values: Vec<F>) {
        let columns = self.columns_mut(ColumnType::Selector);
        assert!(selector < columns.len(), "selector column {selector} out of range");
        columns[selector] = values;
    }

    /// Dumps the table row by row: witnesses, constants, public inputs and
    /// selectors, separated by `|`.
    pub fn export_table<W: Write>(&self, w: &mut W) -> IoResult<()> {
        writeln!(
            w,
            "witnesses_size: {} constants_size: {} public_inputs_size: {} selectors_size: {} rows: {}",
            self.witnesses_amount(),
            self.constants_amount(),
            self.public_inputs_amount(),
            self.selectors_amount(),
            self.rows_amount(),
        )?;
        for row in 0..self.rows_amount() {
            let cells: Vec<String> = ColumnType::iter()
                .map(|typ| {
                    (0..self.amount(typ))
                        .map(|col| cell_to_string(self.get(typ, col, row)))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            writeln!(w, "{}", cells.join(" | "))?;
        }
        Ok(())
    }
}

fn cell_to_string<F: Field>(value: F) -> String {
    if value.is_zero() {
        "0".to_string()
    } else {
        value.to_string()
    }
}

impl Builder {
    pub fn public_inputs(mut self, public_inputs: usize) -> Self {
        self.public_inputs = public_inputs;
        self
    }

    pub fn constants(mut self, constants: usize) -> Self {
        self.constants = constants;
        self
    }

    pub fn selectors(mut self, selectors: usize) -> Self {
        self.selectors = selectors;
        self
    }

    pub fn build<F: Field>(self) -> AssignmentTable<F> {
        AssignmentTable {
            witnesses: vec![vec![]; self.witnesses],
            public_inputs: vec![vec![]; self.public_inputs],
            constants: vec![vec![]; self.constants],
            selectors: vec![vec![]; self.selectors],
        }
    }
}
