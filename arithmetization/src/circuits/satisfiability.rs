//! This module implements the satisfiability check of an assignment table
//! against a constraint system: gates, copy constraints and lookups.

use crate::{
    circuits::{
        assignment::AssignmentTable, constraints::ConstraintSystem, gate::LookupTable,
        variable::Variable,
    },
    error::SatisfiabilityError,
};
use ark_ff::Field;
use std::collections::{hash_map::Entry, HashMap, HashSet};

/// Checks that `assignment` satisfies every constraint of `cs`.
///
/// - every gate constraint evaluates to zero at the rows its selector is on,
/// - every copy constraint holds,
/// - every lookup input, at the rows its tag is on, is an entry of the
///   referenced table.
pub fn is_satisfied<F: Field>(
    cs: &ConstraintSystem<F>,
    assignment: &AssignmentTable<F>,
) -> Result<(), SatisfiabilityError> {
    let rows = assignment.rows_amount();

    for gate in cs.gates() {
        for row in active_rows(assignment, gate.selector_index, rows) {
            let value_of = |v: &Variable| assignment.value_at(v, row);
            for (constraint, expr) in gate.constraints.iter().enumerate() {
                if !expr.evaluate(&value_of).is_zero() {
                    return Err(SatisfiabilityError::GateNotSatisfied {
                        selector: gate.selector_index,
                        row,
                        constraint,
                    });
                }
            }
        }
    }

    for copy in cs.copy_constraints() {
        if assignment.value(&copy.first) != assignment.value(&copy.second) {
            return Err(SatisfiabilityError::CopyConstraintViolated {
                first: copy.first,
                second: copy.second,
            });
        }
    }

    let mut entries: HashMap<usize, HashSet<Vec<F>>> = HashMap::new();
    for lookup_gate in cs.lookup_gates() {
        let tag = lookup_gate.tag_index;
        for row in active_rows(assignment, tag, rows) {
            let value_of = |v: &Variable| assignment.value_at(v, row);
            for (constraint, lookup) in lookup_gate.constraints.iter().enumerate() {
                let known = match entries.entry(lookup.table_id) {
                    Entry::Occupied(e) => e.into_mut(),
                    Entry::Vacant(e) => {
                        let table = cs.lookup_table(lookup.table_id).ok_or(
                            SatisfiabilityError::UnregisteredLookupTable {
                                tag,
                                table_id: lookup.table_id,
                            },
                        )?;
                        e.insert(table_entries(table, assignment, rows))
                    }
                };
                let input: Vec<F> = lookup
                    .lookup_input
                    .iter()
                    .map(|expr| expr.evaluate(&value_of))
                    .collect();
                if !known.contains(&input) {
                    return Err(SatisfiabilityError::LookupNotSatisfied {
                        tag,
                        row,
                        constraint,
                        table_id: lookup.table_id,
                    });
                }
            }
        }
    }

    Ok(())
}

/// Rows in `0..rows` at which `selector` is on. A selector with no column is
/// never on.
fn active_rows<F: Field>(
    assignment: &AssignmentTable<F>,
    selector: usize,
    rows: usize,
) -> impl Iterator<Item = usize> + '_ {
    let exists = selector < assignment.selectors_amount();
    (0..rows).filter(move |&row| exists && assignment.is_selector_enabled(selector, row))
}

/// Every tuple a lookup may match: each option read at each row where the
/// table selector is on.
fn table_entries<F: Field>(
    table: &LookupTable,
    assignment: &AssignmentTable<F>,
    rows: usize,
) -> HashSet<Vec<F>> {
    active_rows(assignment, table.tag_index, rows)
        .flat_map(|row| {
            table.lookup_options.iter().map(move |option| {
                option
                    .iter()
                    .map(|v| assignment.value_at(v, row))
                    .collect::<Vec<F>>()
            })
        })
        .collect()
}
