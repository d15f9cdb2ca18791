//! The catalogue of lookup tables a circuit may use.

use crate::{
    circuits::{assignment::AssignmentTable, constraints::ConstraintSystem},
    constants::DEFAULT_MAX_USABLE_ROWS,
    error::LookupError,
    lookup::{
        packing::{pack_lookup_tables, pack_lookup_tables_horizontal, parse_table_name},
        table::LookupTableDefinition,
        tables::{range_table, xor_table},
    },
};
use ark_ff::Field;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How lookup tables are laid out in the constant columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupPacking {
    /// One table after the other, one selector per subtable.
    Vertical,
    /// Side by side, folding tall tables, within `max_usable_rows` rows.
    Horizontal { max_usable_rows: usize },
}

impl Default for LookupPacking {
    fn default() -> Self {
        LookupPacking::Horizontal {
            max_usable_rows: DEFAULT_MAX_USABLE_ROWS,
        }
    }
}

/// Lookup table definitions by name, and the `table/subtable` names the
/// circuit reserved.
#[derive(Debug)]
pub struct LookupLibrary<F> {
    tables: BTreeMap<String, LookupTableDefinition<F>>,
    reserved: BTreeSet<String>,
}

impl<F: Field> Default for LookupLibrary<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Field> LookupLibrary<F> {
    /// An empty library.
    pub fn new() -> Self {
        LookupLibrary {
            tables: BTreeMap::new(),
            reserved: BTreeSet::new(),
        }
    }

    /// A library holding the 4-bit xor table and the 8 and 16-bit range tables.
    pub fn with_builtin_tables() -> Self {
        let mut library = Self::new();
        library.register_table(xor_table());
        library.register_table(range_table(8));
        library.register_table(range_table(16));
        library
    }

    /// # Panics
    ///
    /// Will panic if a table with the same name is registered.
    pub fn register_table(&mut self, table: LookupTableDefinition<F>) {
        let name = table.name().to_string();
        let previous = self.tables.insert(name.clone(), table);
        assert!(previous.is_none(), "lookup table {name} registered twice");
    }

    pub fn get_table(&self, name: &str) -> Option<&LookupTableDefinition<F>> {
        self.tables.get(name)
    }

    /// Marks a `table/subtable` as used by the circuit.
    ///
    /// # Panics
    ///
    /// Will panic if the name is malformed or names an unknown table or subtable.
    pub fn reserve_table(&mut self, full_name: &str) {
        let Some((table, subtable)) = parse_table_name(full_name) else {
            panic!("lookup table name {full_name} is not of the form table/subtable");
        };
        let known = self
            .tables
            .get(table)
            .is_some_and(|t| t.get_subtable(subtable).is_some());
        assert!(known, "unknown lookup table {full_name}");
        if self.reserved.insert(full_name.to_string()) {
            debug!("lookup table {full_name} reserved");
        }
    }

    /// Table ids of the reserved `table/subtable` names, from 1 upward in
    /// name order.
    pub fn get_reserved_indices(&self) -> BTreeMap<String, usize> {
        self.reserved
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i + 1))
            .collect()
    }

    /// Tables with at least one reserved subtable, by name.
    pub fn get_reserved_tables(&self) -> Vec<&LookupTableDefinition<F>> {
        self.tables
            .values()
            .filter(|table| {
                self.reserved
                    .iter()
                    .filter_map(|name| parse_table_name(name))
                    .any(|(t, _)| t == table.name())
            })
            .collect()
    }

    /// Installs the reserved indices in `cs` and lays the reserved tables out
    /// in `constant_columns`.
    ///
    /// Returns the row budget the rest of the circuit must respect.
    pub fn pack(
        &self,
        packing: LookupPacking,
        cs: &mut ConstraintSystem<F>,
        assignment: &mut AssignmentTable<F>,
        constant_columns: &[usize],
        usable_rows: usize,
    ) -> Result<usize, LookupError> {
        let reserved_indices = self.get_reserved_indices();
        cs.set_reserved_indices(reserved_indices.clone());
        let tables = self.get_reserved_tables();
        match packing {
            LookupPacking::Vertical => pack_lookup_tables(
                tables,
                &reserved_indices,
                cs,
                assignment,
                constant_columns,
                usable_rows,
            ),
            LookupPacking::Horizontal { max_usable_rows } => pack_lookup_tables_horizontal(
                tables,
                &reserved_indices,
                cs,
                assignment,
                constant_columns,
                usable_rows,
                max_usable_rows,
            ),
        }
    }
}
