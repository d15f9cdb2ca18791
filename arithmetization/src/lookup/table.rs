//! Lookup table definitions: a named grid of field values, generated on first
//! access, plus the row ranges ("subtables") lookup gates may target.

use ark_ff::Field;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Produces the columns of a lookup table.
pub type TableGenerator<F> = Box<dyn Fn() -> Vec<Vec<F>> + Send + Sync>;

/// A slice of a lookup table usable as one lookup target: some of its columns,
/// restricted to the rows `begin..=end`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subtable {
    pub column_indices: Vec<usize>,
    pub begin: usize,
    pub end: usize,
}

impl Subtable {
    /// # Panics
    ///
    /// Will panic if `begin > end`.
    pub fn new(column_indices: Vec<usize>, begin: usize, end: usize) -> Self {
        assert!(begin <= end, "subtable rows {begin}..={end} are reversed");
        Subtable {
            column_indices,
            begin,
            end,
        }
    }

    pub fn rows(&self) -> usize {
        self.end - self.begin + 1
    }

    /// Whether the subtable covers every row of a table with `rows` rows.
    pub fn spans(&self, rows: usize) -> bool {
        self.begin == 0 && self.end + 1 == rows
    }
}

/// A named lookup table.
///
/// The grid is column-major (`columns_number` columns of equal length) and is
/// generated once, the first time it is read.
pub struct LookupTableDefinition<F> {
    name: String,
    columns_number: usize,
    subtables: BTreeMap<String, Subtable>,
    generator: TableGenerator<F>,
    table: OnceCell<Vec<Vec<F>>>,
}

impl<F: Field> LookupTableDefinition<F> {
    pub fn new<G>(name: impl Into<String>, columns_number: usize, generator: G) -> Self
    where
        G: Fn() -> Vec<Vec<F>> + Send + Sync + 'static,
    {
        LookupTableDefinition {
            name: name.into(),
            columns_number,
            subtables: BTreeMap::new(),
            generator: Box::new(generator),
            table: OnceCell::new(),
        }
    }

    /// Adds a subtable.
    ///
    /// # Panics
    ///
    /// Will panic if the subtable name is taken, if a column index is out of
    /// range or if `begin > end`.
    #[must_use]
    pub fn subtable(
        mut self,
        name: impl Into<String>,
        column_indices: Vec<usize>,
        begin: usize,
        end: usize,
    ) -> Self {
        let name = name.into();
        assert!(
            column_indices.iter().all(|&c| c < self.columns_number),
            "subtable {}/{name} uses a column past the {} of the table",
            self.name,
            self.columns_number
        );
        let previous = self
            .subtables
            .insert(name.clone(), Subtable::new(column_indices, begin, end));
        assert!(previous.is_none(), "subtable {}/{name} defined twice", self.name);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns_number(&self) -> usize {
        self.columns_number
    }

    pub fn subtables(&self) -> &BTreeMap<String, Subtable> {
        &self.subtables
    }

    pub fn get_subtable(&self, name: &str) -> Option<&Subtable> {
        self.subtables.get(name)
    }

    /// The columns of the table, generated on first access.
    ///
    /// # Panics
    ///
    /// Will panic if the generator returns a grid of the wrong width, columns
    /// of different lengths, or rows that some subtable does not cover.
    pub fn get_table(&self) -> &[Vec<F>] {
        self.table.get_or_init(|| {
            let table = (self.generator)();
            self.validate(&table);
            table
        })
    }

    /// Number of rows of the table.
    pub fn rows(&self) -> usize {
        self.get_table().first().map_or(0, Vec::len)
    }

    fn validate(&self, table: &[Vec<F>]) {
        assert_eq!(
            table.len(),
            self.columns_number,
            "table {} generated the wrong number of columns",
            self.name
        );
        let rows = table.first().map_or(0, Vec::len);
        assert!(
            table.iter().all(|col| col.len() == rows),
            "table {} has columns of different lengths",
            self.name
        );
        for (name, subtable) in &self.subtables {
            assert!(
                subtable.end < rows,
                "subtable {}/{name} ends at row {} but the table has {rows} rows",
                self.name,
                subtable.end
            );
        }
    }
}

impl<F> fmt::Debug for LookupTableDefinition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupTableDefinition")
            .field("name", &self.name)
            .field("columns_number", &self.columns_number)
            .field("subtables", &self.subtables)
            .field("generated", &self.table.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr as Fp;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn test_table_is_generated_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let table = LookupTableDefinition::new("squares", 2, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let values: Vec<u64> = (0..4).collect();
            vec![
                values.iter().map(|&v| Fp::from(v)).collect(),
                values.iter().map(|&v| Fp::from(v * v)).collect(),
            ]
        })
        .subtable("full", vec![0, 1], 0, 3);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(table.rows(), 4);
        assert_eq!(table.get_table()[1][3], Fp::from(9u64));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[should_panic(expected = "ends at row")]
    fn test_subtable_out_of_range() {
        let table = LookupTableDefinition::new("small", 1, || vec![vec![Fp::from(0u64); 4]])
            .subtable("too_long", vec![0], 0, 4);
        table.get_table();
    }

    #[test]
    #[should_panic(expected = "reversed")]
    fn test_reversed_subtable() {
        Subtable::new(vec![0], 3, 2);
    }

    #[test]
    fn test_spans() {
        assert!(Subtable::new(vec![0], 0, 9).spans(10));
        assert!(!Subtable::new(vec![0], 0, 8).spans(10));
        assert!(!Subtable::new(vec![0], 1, 9).spans(10));
    }
}
