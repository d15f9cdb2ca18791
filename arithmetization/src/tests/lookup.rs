use crate::{
    circuits::{
        assignment::AssignmentTable, constraints::ConstraintSystem, expr::Expr,
        gate::LookupConstraint, satisfiability::is_satisfied, variable::Variable,
    },
    error::{LookupError, SatisfiabilityError},
    lookup::{
        library::LookupPacking,
        packing::{horizontal_layout, pack_lookup_tables, pack_lookup_tables_horizontal},
        table::LookupTableDefinition,
        tables::range_table,
    },
};
use ark_bn254::Fr as Fp;
use std::collections::BTreeMap;

use super::framework::TestFramework;

/// Value of the cell at `column`, `row` of the tables built by [`table`].
fn cell(column: usize, row: usize) -> Fp {
    Fp::from((1000 * (column + 1) + row) as u64)
}

/// A table with a single `full` subtable covering all of it.
fn table(name: &str, columns: usize, rows: usize) -> LookupTableDefinition<Fp> {
    LookupTableDefinition::new(name, columns, move || {
        (0..columns)
            .map(|c| (0..rows).map(|r| cell(c, r)).collect())
            .collect()
    })
    .subtable("full", (0..columns).collect(), 0, rows - 1)
}

fn reserve_all(names: &[&str]) -> BTreeMap<String, usize> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i + 1))
        .collect()
}

fn empty_circuit(
    constants: usize,
    selectors: usize,
) -> (ConstraintSystem<Fp>, AssignmentTable<Fp>) {
    let assignment = AssignmentTable::<Fp>::create(1)
        .constants(constants)
        .selectors(selectors)
        .build();
    (ConstraintSystem::new(), assignment)
}

#[test]
fn test_vertical_packing_row_accounting() {
    let tables = [table("a", 1, 5), table("b", 2, 3)];
    let reserved = reserve_all(&["a/full", "b/full"]);
    let (mut cs, mut assignment) = empty_circuit(2, 2);

    let usable_rows =
        pack_lookup_tables(&tables, &reserved, &mut cs, &mut assignment, &[0, 1], 0).unwrap();
    assert_eq!(usable_rows, 1 + 5 + 3);

    // row 0 stays empty, then a, then b
    assert_eq!(assignment.constant(0, 0), Fp::from(0u64));
    assert_eq!(assignment.constant(0, 1), cell(0, 0));
    assert_eq!(assignment.constant(0, 5), cell(0, 4));
    assert_eq!(assignment.constant(0, 6), cell(0, 0));
    assert_eq!(assignment.constant(1, 8), cell(1, 2));

    let b = cs.lookup_table(2).unwrap();
    assert_eq!(b.columns_number, 2);
    assert_eq!(
        b.lookup_options,
        vec![vec![Variable::constant(0, 0), Variable::constant(1, 0)]]
    );
    assert!(!assignment.is_selector_enabled(b.tag_index, 5));
    assert!(assignment.is_selector_enabled(b.tag_index, 6));
    assert!(assignment.is_selector_enabled(b.tag_index, 8));
    assert_ne!(cs.lookup_table(1).unwrap().tag_index, b.tag_index);
}

#[test]
fn test_vertical_packing_keeps_a_larger_budget() {
    let tables = [table("a", 1, 5)];
    let reserved = reserve_all(&["a/full"]);
    let (mut cs, mut assignment) = empty_circuit(1, 1);
    let usable_rows =
        pack_lookup_tables(&tables, &reserved, &mut cs, &mut assignment, &[0], 100).unwrap();
    assert_eq!(usable_rows, 100);
}

#[test]
fn test_horizontal_stacks_narrow_table_below() {
    let tables = [table("a", 2, 3), table("b", 1, 2)];
    let reserved = reserve_all(&["a/full", "b/full"]);

    let layout = horizontal_layout(&tables, &reserved, 2, 8).unwrap();
    let a = layout.placement("a").unwrap();
    let b = layout.placement("b").unwrap();
    assert_eq!((a.x, a.y, a.rows_range()), (0, 1, 1..4));
    assert_eq!((b.x, b.y, b.rows_range()), (0, 4, 4..6));
    assert_eq!(layout.width(), 2);

    let (mut cs, mut assignment) = empty_circuit(2, 2);
    let usable_rows = pack_lookup_tables_horizontal(
        &tables,
        &reserved,
        &mut cs,
        &mut assignment,
        &[0, 1],
        0,
        8,
    )
    .unwrap();
    assert_eq!(usable_rows, 6);
    assert_eq!(assignment.constant(1, 3), cell(1, 2));
    assert_eq!(assignment.constant(0, 5), cell(0, 1));
    assert_eq!(assignment.constant(1, 5), Fp::from(0u64));
}

#[test]
fn test_horizontal_runs_out_of_columns() {
    let tables = [table("a", 2, 3), table("b", 1, 6)];
    let reserved = reserve_all(&["a/full", "b/full"]);
    assert_eq!(
        horizontal_layout(&tables, &reserved, 2, 8),
        Err(LookupError::PackingExhausted { max_usable_rows: 5 })
    );
}

#[test]
fn test_horizontal_folds_within_the_budget() {
    let tables = [table("a", 2, 5), table("b", 1, 8)];
    let reserved = reserve_all(&["a/full", "b/full"]);

    // b needs 9 rows under a budget of 8: fold it in two, a goes beside it
    let layout = horizontal_layout(&tables, &reserved, 4, 8).unwrap();
    assert_eq!(layout.max_usable_rows, 8);
    let a = layout.placement("a").unwrap();
    let b = layout.placement("b").unwrap();
    assert_eq!((b.x, b.y, b.rows, b.folds), (0, 1, 4, 2));
    assert_eq!((a.x, a.y, a.rows, a.folds), (2, 1, 5, 1));

    let (mut cs, mut assignment) = empty_circuit(4, 4);
    let usable_rows = pack_lookup_tables_horizontal(
        &tables,
        &reserved,
        &mut cs,
        &mut assignment,
        &[0, 1, 2, 3],
        0,
        8,
    )
    .unwrap();
    assert_eq!(usable_rows, 6);
    for r in 0..8 {
        assert_eq!(assignment.constant(r / 4, 1 + r % 4), cell(0, r));
    }
    assert_eq!(assignment.constant(3, 5), cell(1, 4));

    let registered = cs.lookup_table(2).unwrap();
    assert_eq!(
        registered.lookup_options,
        vec![vec![Variable::constant(0, 0)], vec![Variable::constant(1, 0)]]
    );
}

#[test]
fn test_table_as_tall_as_the_budget_keeps_the_budget() {
    let tables = [table("t", 1, 16)];
    let reserved = reserve_all(&["t/full"]);
    let layout = horizontal_layout(&tables, &reserved, 2, 16).unwrap();
    assert_eq!(layout.max_usable_rows, 16);
    let t = layout.placement("t").unwrap();
    assert_eq!((t.rows, t.folds), (8, 2));
}

#[test]
fn test_horizontal_shrinks_until_tables_stack() {
    let tables = [table("a", 2, 2), table("b", 1, 14)];
    let reserved = reserve_all(&["a/full", "b/full"]);

    // under 16 rows b is unfolded and fits neither below a nor beside it,
    // under 13 rows it folds in two and stacks below a
    let layout = horizontal_layout(&tables, &reserved, 2, 16).unwrap();
    assert_eq!(layout.max_usable_rows, 13);
    let b = layout.placement("b").unwrap();
    assert_eq!((b.x, b.y, b.rows, b.folds), (0, 3, 7, 2));

    let (mut cs, mut assignment) = empty_circuit(2, 2);
    let usable_rows = pack_lookup_tables_horizontal(
        &tables,
        &reserved,
        &mut cs,
        &mut assignment,
        &[0, 1],
        0,
        16,
    )
    .unwrap();
    assert_eq!(usable_rows, 10);
    for r in 0..14 {
        assert_eq!(assignment.constant(r / 7, 3 + r % 7), cell(0, r));
    }
    assert_eq!(
        cs.lookup_table(2).unwrap().lookup_options,
        vec![vec![Variable::constant(0, 0)], vec![Variable::constant(1, 0)]]
    );
    assert_ne!(
        cs.lookup_table(1).unwrap().tag_index,
        cs.lookup_table(2).unwrap().tag_index
    );
}

#[test]
fn test_horizontal_shares_selectors_between_equal_row_ranges() {
    let tables = [table("a", 1, 4), table("b", 1, 4), table("c", 1, 2)];
    let reserved = reserve_all(&["a/full", "b/full", "c/full"]);
    let (mut cs, mut assignment) = empty_circuit(3, 3);
    // c opens the first band, a and b each open one of their own on rows 1..5
    let usable_rows = pack_lookup_tables_horizontal(
        &tables,
        &reserved,
        &mut cs,
        &mut assignment,
        &[0, 1, 2],
        0,
        5,
    )
    .unwrap();
    assert_eq!(usable_rows, 5);

    let tag = |id| cs.lookup_table(id).unwrap().tag_index;
    assert_eq!(tag(1), tag(2));
    assert_ne!(tag(1), tag(3));
    assert_eq!(cs.selectors_used(), 2);
}

#[test]
fn test_errors() {
    let reserved = reserve_all(&["wide/full"]);
    let tables = [table("wide", 3, 2)];
    let (mut cs, mut assignment) = empty_circuit(2, 1);
    assert!(matches!(
        pack_lookup_tables(&tables, &reserved, &mut cs, &mut assignment, &[0, 1], 0),
        Err(LookupError::NotEnoughConstantColumns { required: 3, available: 2, .. })
    ));

    let reserved = reserve_all(&["a/full", "b/full"]);
    let tables = [table("a", 1, 2), table("b", 1, 2)];
    let (mut cs, mut assignment) = empty_circuit(1, 1);
    assert_eq!(
        pack_lookup_tables(&tables, &reserved, &mut cs, &mut assignment, &[0], 0),
        Err(LookupError::NotEnoughSelectorColumns { selector: 1, available: 1 })
    );

    // the 4bit prefix keeps the table from folding
    let range = range_table::<Fp>(8);
    let reserved = reserve_all(&["range_8bit/4bit"]);
    assert!(matches!(
        horizontal_layout([&range], &reserved, 4, 100),
        Err(LookupError::TableTooLong { rows: 256, .. })
    ));
}

#[test]
fn test_unreferenced_tables_are_not_placed() {
    let tables = [table("a", 1, 5), table("b", 1, 3)];
    let reserved = reserve_all(&["b/full"]);
    let (mut cs, mut assignment) = empty_circuit(1, 1);
    let usable_rows =
        pack_lookup_tables(&tables, &reserved, &mut cs, &mut assignment, &[0], 0).unwrap();
    assert_eq!(usable_rows, 4);
    assert_eq!(assignment.constant(0, 1), cell(0, 0));
    assert_eq!(cs.lookup_tables().len(), 1);
}

#[test]
fn test_packing_is_deterministic() {
    let pack = |reversed: bool| {
        let tables = [
            table("c", 1, 9),
            table("a", 2, 3),
            table("b", 1, 6),
            table("d", 3, 1),
        ];
        let reserved = reserve_all(&["a/full", "b/full", "c/full", "d/full"]);
        let ordered: Vec<&LookupTableDefinition<Fp>> = if reversed {
            tables.iter().rev().collect()
        } else {
            tables.iter().collect()
        };
        let (mut cs, mut assignment) = empty_circuit(6, 6);
        let usable_rows = pack_lookup_tables_horizontal(
            ordered,
            &reserved,
            &mut cs,
            &mut assignment,
            &[0, 1, 2, 3, 4, 5],
            0,
            16,
        )
        .unwrap();
        (usable_rows, assignment, cs.lookup_tables().clone())
    };
    // the layout depends on the table names, not on the order they come in
    assert_eq!(pack(false), pack(true));
}

#[test]
fn test_lookup_into_a_folded_table() {
    let mut runner = TestFramework::<Fp>::new(1)
        .constants(4)
        .selectors(2)
        .lookup_table(range_table(4))
        .reserve("range_4bit/full")
        .lookup_packing(LookupPacking::Horizontal { max_usable_rows: 8 })
        .setup()
        .unwrap();
    // 16 rows under a budget of 8: 3 folds of 6 rows, the last one padded
    assert_eq!(runner.usable_rows, 7);

    let table_id = runner.cs.lookup_table_id("range_4bit/full");
    assert_eq!(runner.cs.lookup_table(table_id).unwrap().lookup_options.len(), 3);
    let tag = runner.cs.add_lookup_gate(vec![LookupConstraint {
        table_id,
        lookup_input: vec![Expr::var(Variable::witness(0, 0))],
    }]);
    for (row, value) in [0u64, 5, 13, 15].into_iter().enumerate() {
        runner.assignment.set_witness(0, row, Fp::from(value));
        runner.assignment.enable_selector(tag, row);
    }
    assert_eq!(is_satisfied(&runner.cs, &runner.assignment), Ok(()));

    runner.assignment.set_witness(0, 2, Fp::from(16u64));
    assert!(matches!(
        is_satisfied(&runner.cs, &runner.assignment),
        Err(SatisfiabilityError::LookupNotSatisfied { row: 2, .. })
    ));
}
