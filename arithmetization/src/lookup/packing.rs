//! Placement of lookup tables in the constant and selector columns.
//!
//! Two strategies are provided:
//! - [`pack_lookup_tables`] stacks the tables one below the other,
//! - [`pack_lookup_tables_horizontal`] puts tables side by side in bands of
//!   columns, folding the tall ones, under a row budget that shrinks until
//!   the layout fits.
//!
//! In both cases row 0 is left empty, and only the subtables present in the
//! reserved indices get a selector and a registered [`LookupTable`].

use crate::{
    circuits::{
        assignment::AssignmentTable, constraints::ConstraintSystem, gate::LookupTable,
        variable::Variable,
    },
    constants::{RESERVED_ROWS, TABLE_NAME_SEPARATOR},
    error::LookupError,
    lookup::table::{LookupTableDefinition, Subtable},
    math::next_power_of_two_minus_3,
};
use ark_ff::Field;
use itertools::Itertools;
use log::{debug, info};
use std::{
    collections::{btree_map::Entry, BTreeMap},
    ops::Range,
};

/// Splits a `table/subtable` name in two.
pub fn parse_table_name(full_name: &str) -> Option<(&str, &str)> {
    full_name.split_once(TABLE_NAME_SEPARATOR)
}

/// Joins a table name and a subtable name.
pub fn full_table_name(table: &str, subtable: &str) -> String {
    format!("{table}{TABLE_NAME_SEPARATOR}{subtable}")
}

/// The subtables of `table` the circuit references, with their table id.
fn referenced_subtables<'a, F: Field>(
    table: &'a LookupTableDefinition<F>,
    reserved_indices: &BTreeMap<String, usize>,
) -> Vec<(&'a str, &'a Subtable, usize)> {
    table
        .subtables()
        .iter()
        .filter_map(|(name, subtable)| {
            reserved_indices
                .get(&full_table_name(table.name(), name))
                .map(|&id| (name.as_str(), subtable, id))
        })
        .collect()
}

/// The tables with at least one referenced subtable, by name.
fn referenced_tables<'a, F, I>(
    lookup_tables: I,
    reserved_indices: &BTreeMap<String, usize>,
) -> Vec<&'a LookupTableDefinition<F>>
where
    F: Field,
    I: IntoIterator<Item = &'a LookupTableDefinition<F>>,
{
    lookup_tables
        .into_iter()
        .filter(|table| !referenced_subtables(*table, reserved_indices).is_empty())
        .sorted_by(|a, b| a.name().cmp(b.name()))
        .collect()
}

fn allocate_selector<F: Field>(
    cs: &mut ConstraintSystem<F>,
    assignment: &AssignmentTable<F>,
) -> Result<usize, LookupError> {
    let selector = cs.allocate_selector();
    if selector >= assignment.selectors_amount() {
        return Err(LookupError::NotEnoughSelectorColumns {
            selector,
            available: assignment.selectors_amount(),
        });
    }
    Ok(selector)
}

/// Copies a column-major grid into `constant_columns`, starting at `row`.
fn write_grid<F: Field>(
    assignment: &mut AssignmentTable<F>,
    grid: &[Vec<F>],
    constant_columns: &[usize],
    row: usize,
) {
    for (column, values) in constant_columns.iter().zip(grid) {
        for (r, value) in values.iter().enumerate() {
            assignment.set_constant(*column, row + r, *value);
        }
    }
}

/// Activates the rows of a subtable and registers the matching lookup table.
fn register_subtable<F: Field>(
    cs: &mut ConstraintSystem<F>,
    table_id: usize,
    selector: usize,
    subtable: &Subtable,
    options: &[&[usize]],
) {
    let mut lookup_table = LookupTable::new(subtable.column_indices.len(), selector);
    for columns in options {
        lookup_table.append_option(
            subtable
                .column_indices
                .iter()
                .map(|&c| Variable::constant(columns[c], 0))
                .collect(),
        );
    }
    cs.register_lookup_table(table_id, lookup_table);
}

/// Places the referenced tables one after the other, from row 1, each in the
/// first `columns_number` entries of `constant_columns`. Every referenced
/// subtable gets its own selector.
///
/// Returns the row budget the rest of the circuit must respect:
/// `usable_rows`, grown to cover the tables.
pub fn pack_lookup_tables<'a, F, I>(
    lookup_tables: I,
    reserved_indices: &BTreeMap<String, usize>,
    cs: &mut ConstraintSystem<F>,
    assignment: &mut AssignmentTable<F>,
    constant_columns: &[usize],
    usable_rows: usize,
) -> Result<usize, LookupError>
where
    F: Field,
    I: IntoIterator<Item = &'a LookupTableDefinition<F>>,
{
    let mut start_row = RESERVED_ROWS;
    let mut end_row = 0;
    for table in referenced_tables(lookup_tables, reserved_indices) {
        if table.columns_number() > constant_columns.len() {
            return Err(LookupError::NotEnoughConstantColumns {
                table: table.name().to_string(),
                required: table.columns_number(),
                available: constant_columns.len(),
            });
        }
        write_grid(assignment, table.get_table(), constant_columns, start_row);

        for (name, subtable, table_id) in referenced_subtables(table, reserved_indices) {
            let selector = allocate_selector(cs, assignment)?;
            assignment.enable_selector_range(
                selector,
                start_row + subtable.begin..start_row + subtable.end + 1,
            );
            register_subtable(cs, table_id, selector, subtable, &[constant_columns]);
            debug!(
                "lookup table {}/{name} (id {table_id}) on rows {}..={} with selector {selector}",
                table.name(),
                start_row + subtable.begin,
                start_row + subtable.end
            );
        }

        start_row += table.rows();
        end_row = start_row;
    }

    let usable_rows = usable_rows.max(end_row);
    info!("lookup tables packed vertically, {usable_rows} usable rows");
    Ok(usable_rows)
}

/// Where one table lands in the constant columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TablePlacement {
    pub name: String,
    /// First column, as an offset into the constant columns handed to the packer.
    pub x: usize,
    /// First row.
    pub y: usize,
    /// Columns of the table before folding.
    pub columns: usize,
    /// Rows of the table after folding.
    pub rows: usize,
    pub folds: usize,
}

impl TablePlacement {
    /// Columns taken by all the folds of the table.
    pub fn width(&self) -> usize {
        self.columns * self.folds
    }

    pub fn rows_range(&self) -> Range<usize> {
        self.y..self.y + self.rows
    }

    /// Constant-column offsets of one fold.
    fn fold_columns(&self, fold: usize) -> Range<usize> {
        let start = self.x + fold * self.columns;
        start..start + self.columns
    }
}

/// A horizontal layout of the lookup tables, in placement order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HorizontalLayout {
    /// The row budget the layout was found under.
    pub max_usable_rows: usize,
    pub placements: Vec<TablePlacement>,
}

impl HorizontalLayout {
    /// Number of constant columns used.
    pub fn width(&self) -> usize {
        self.placements
            .iter()
            .map(|p| p.x + p.width())
            .max()
            .unwrap_or(0)
    }

    /// First row left free below the tables.
    pub fn rows(&self) -> usize {
        self.placements
            .iter()
            .map(|p| p.rows_range().end)
            .max()
            .unwrap_or(0)
    }

    pub fn placement(&self, name: &str) -> Option<&TablePlacement> {
        self.placements.iter().find(|p| p.name == name)
    }
}

struct TableShape<'a> {
    name: &'a str,
    columns: usize,
    rows: usize,
    /// Every referenced subtable covers the whole table.
    foldable: bool,
}

/// Computes where [`pack_lookup_tables_horizontal`] puts the referenced tables
/// in `columns_available` constant columns, starting from a budget of
/// `max_usable_rows` rows and shrinking it until the layout fits.
pub fn horizontal_layout<'a, F, I>(
    lookup_tables: I,
    reserved_indices: &BTreeMap<String, usize>,
    columns_available: usize,
    max_usable_rows: usize,
) -> Result<HorizontalLayout, LookupError>
where
    F: Field,
    I: IntoIterator<Item = &'a LookupTableDefinition<F>>,
{
    let tables = referenced_tables(lookup_tables, reserved_indices);
    let shapes: Vec<TableShape> = tables
        .iter()
        .map(|table| {
            let rows = table.rows();
            TableShape {
                name: table.name(),
                columns: table.columns_number(),
                rows,
                foldable: referenced_subtables(*table, reserved_indices)
                    .iter()
                    .all(|(_, subtable, _)| subtable.spans(rows)),
            }
        })
        .collect();

    for shape in &shapes {
        if shape.columns > columns_available {
            return Err(LookupError::NotEnoughConstantColumns {
                table: shape.name.to_string(),
                required: shape.columns,
                available: columns_available,
            });
        }
        if !shape.foldable && RESERVED_ROWS + shape.rows > max_usable_rows {
            return Err(LookupError::TableTooLong {
                table: shape.name.to_string(),
                rows: shape.rows,
                max_usable_rows,
            });
        }
    }

    let mut max_rows = max_usable_rows;
    loop {
        if let Some(layout) = try_layout(&shapes, columns_available, max_rows) {
            info!(
                "lookup tables laid out in {} columns and {} rows, budget {max_rows}",
                layout.width(),
                layout.rows()
            );
            return Ok(layout);
        }
        // a strictly smaller budget each round
        let next = next_power_of_two_minus_3(max_rows)
            .filter(|&next| next > RESERVED_ROWS)
            .ok_or(LookupError::PackingExhausted {
                max_usable_rows: max_rows,
            })?;
        if shapes
            .iter()
            .any(|shape| !shape.foldable && RESERVED_ROWS + shape.rows > next)
        {
            return Err(LookupError::PackingExhausted {
                max_usable_rows: next,
            });
        }
        debug!("lookup tables do not fit under {max_rows} rows, retrying with {next}");
        max_rows = next;
    }
}

/// One shelf layout attempt under `max_rows`.
///
/// Tables are taken by decreasing width, then increasing rows, then name.
/// Each table not yet placed opens a band of columns at row 1, and the
/// following tables that are no wider and still fit are stacked below it.
fn try_layout(
    shapes: &[TableShape],
    columns_available: usize,
    max_rows: usize,
) -> Option<HorizontalLayout> {
    // rows left below the reserved ones
    let capacity = max_rows.checked_sub(RESERVED_ROWS).filter(|&c| c > 0)?;
    let mut sized = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let folds = if shape.foldable {
            shape.rows.div_ceil(capacity).max(1)
        } else {
            1
        };
        let rows = shape.rows.div_ceil(folds);
        if RESERVED_ROWS + rows > max_rows {
            return None;
        }
        sized.push(TablePlacement {
            name: shape.name.to_string(),
            x: 0,
            y: 0,
            columns: shape.columns,
            rows,
            folds,
        });
    }
    // widest first, then rows: a table only stacks under a band at least as wide
    sized.sort_by(|a, b| {
        b.width()
            .cmp(&a.width())
            .then(a.rows.cmp(&b.rows))
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut placed = vec![false; sized.len()];
    let mut placements = Vec::with_capacity(sized.len());
    let mut x = 0;
    for i in 0..sized.len() {
        if placed[i] {
            continue;
        }
        let band = sized[i].width();
        if x + band > columns_available {
            return None;
        }

        let mut y = RESERVED_ROWS;
        for j in i..sized.len() {
            let candidate = &sized[j];
            let fits = j == i || (candidate.width() <= band && y + candidate.rows <= max_rows);
            if placed[j] || !fits {
                continue;
            }
            placed[j] = true;
            placements.push(TablePlacement { x, y, ..candidate.clone() });
            y += candidate.rows;
        }
        x += band;
    }

    Some(HorizontalLayout {
        max_usable_rows: max_rows,
        placements,
    })
}

/// Splits the rows of a column-major `table` into `folds` groups laid side by
/// side: the result has `columns * folds` columns of `ceil(rows / folds)`
/// rows, group `g` holding the logical rows starting at `g * ceil(rows / folds)`.
/// The last group is padded with the last row of the table.
pub fn fold_table<F: Field>(table: &[Vec<F>], folds: usize) -> Vec<Vec<F>> {
    assert!(folds > 0, "a table is folded at least once");
    let rows = table.first().map_or(0, Vec::len);
    let folded_rows = rows.div_ceil(folds);
    (0..folds)
        .flat_map(|fold| {
            table.iter().map(move |column| {
                (0..folded_rows)
                    .map(|r| column[(fold * folded_rows + r).min(rows - 1)])
                    .collect::<Vec<F>>()
            })
        })
        .collect()
}

/// Places the referenced tables side by side, folding those whose subtables
/// all cover the whole table when they are too tall for the row budget.
///
/// Subtables occupying the same rows share a selector. Every referenced
/// subtable registers one option per fold.
///
/// Returns the row budget the rest of the circuit must respect:
/// `usable_rows`, grown to cover the tables.
pub fn pack_lookup_tables_horizontal<'a, F, I>(
    lookup_tables: I,
    reserved_indices: &BTreeMap<String, usize>,
    cs: &mut ConstraintSystem<F>,
    assignment: &mut AssignmentTable<F>,
    constant_columns: &[usize],
    usable_rows: usize,
    max_usable_rows: usize,
) -> Result<usize, LookupError>
where
    F: Field,
    I: IntoIterator<Item = &'a LookupTableDefinition<F>>,
{
    let tables = referenced_tables(lookup_tables, reserved_indices);
    let layout = horizontal_layout(
        tables.iter().copied(),
        reserved_indices,
        constant_columns.len(),
        max_usable_rows,
    )?;

    let mut selectors: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for placement in &layout.placements {
        let Some(table) = tables.iter().find(|t| t.name() == placement.name) else {
            continue;
        };
        let columns = &constant_columns[placement.x..placement.x + placement.width()];
        write_grid(
            assignment,
            &fold_table(table.get_table(), placement.folds),
            columns,
            placement.y,
        );
        debug!(
            "lookup table {} at column {} row {}, {} folds of {} rows",
            placement.name, placement.x, placement.y, placement.folds, placement.rows
        );

        let options: Vec<&[usize]> = (0..placement.folds)
            .map(|fold| &constant_columns[placement.fold_columns(fold)])
            .collect();
        for (name, subtable, table_id) in referenced_subtables(*table, reserved_indices) {
            let rows = if placement.folds > 1 {
                placement.rows_range()
            } else {
                placement.y + subtable.begin..placement.y + subtable.end + 1
            };
            let selector = match selectors.entry((rows.start, rows.end)) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    let selector = allocate_selector(cs, assignment)?;
                    assignment.enable_selector_range(selector, rows.clone());
                    *e.insert(selector)
                }
            };
            register_subtable(cs, table_id, selector, subtable, &options);
            debug!(
                "lookup table {}/{name} (id {table_id}) on rows {rows:?} with selector {selector}",
                table.name()
            );
        }
    }

    let usable_rows = usable_rows.max(layout.rows());
    info!("lookup tables packed horizontally, {usable_rows} usable rows");
    Ok(usable_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr as Fp;

    #[test]
    fn test_parse_table_name() {
        assert_eq!(parse_table_name("range_16bit/8bit"), Some(("range_16bit", "8bit")));
        assert_eq!(parse_table_name("xor_4bit"), None);
        assert_eq!(full_table_name("xor_4bit", "full"), "xor_4bit/full");
    }

    #[test]
    fn test_fold_table() {
        let column: Vec<Fp> = (0..100u64).map(Fp::from).collect();
        let folded = fold_table(&[column.clone()], 4);
        assert_eq!(folded.len(), 4);
        assert!(folded.iter().all(|group| group.len() == 25));
        for logical in 0..100 {
            assert_eq!(folded[logical / 25][logical % 25], column[logical]);
        }
    }

    #[test]
    fn test_fold_table_pads_with_last_row() {
        let left: Vec<Fp> = (0..10u64).map(Fp::from).collect();
        let right: Vec<Fp> = (100..110u64).map(Fp::from).collect();
        let folded = fold_table(&[left, right], 4);
        // 4 folds of 2 columns, 3 rows each
        assert_eq!(folded.len(), 8);
        assert_eq!(folded[6], vec![Fp::from(9u64); 3]);
        assert_eq!(folded[7], vec![Fp::from(109u64); 3]);
        assert_eq!(folded[2], vec![Fp::from(3u64), Fp::from(4u64), Fp::from(5u64)]);
    }
}
