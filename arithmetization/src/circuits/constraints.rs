//! This module implements the constraint system: the append-only list of
//! gates, lookup gates, copy constraints and lookup tables a circuit is made of.

use crate::circuits::{
    expr::{collect_variables, Expr},
    gate::{CopyConstraint, Gate, LookupConstraint, LookupGate, LookupTable},
    variable::{ColumnType, Variable},
};
use ark_ff::Field;
use log::trace;
use std::collections::{hash_map::Entry, BTreeMap, HashMap};

/// The shared constraint system every component writes into.
///
/// Gates, lookup gates and lookup tables draw their selectors from a single
/// id space, in allocation order.
#[derive(Clone, Debug)]
pub struct ConstraintSystem<F: Field> {
    gates: Vec<Gate<F>>,
    lookup_gates: Vec<LookupGate<F>>,
    copy_constraints: Vec<CopyConstraint>,
    /// Registered lookup tables, by table id.
    lookup_tables: BTreeMap<usize, LookupTable>,
    /// Lookup table ids by `table/subtable` name.
    reserved_indices: BTreeMap<String, usize>,
    /// Selector of every gate, by constraint list.
    gate_selectors: HashMap<Vec<Expr<F>>, usize>,
    /// Selector of every lookup gate, by constraint list.
    lookup_gate_selectors: HashMap<Vec<LookupConstraint<F>>, usize>,
    next_selector: usize,
}

impl<F: Field> Default for ConstraintSystem<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Field> ConstraintSystem<F> {
    pub fn new() -> Self {
        ConstraintSystem {
            gates: vec![],
            lookup_gates: vec![],
            copy_constraints: vec![],
            lookup_tables: BTreeMap::new(),
            reserved_indices: BTreeMap::new(),
            gate_selectors: HashMap::new(),
            lookup_gate_selectors: HashMap::new(),
            next_selector: 0,
        }
    }

    /// Reserves a fresh selector id.
    pub fn allocate_selector(&mut self) -> usize {
        let selector = self.next_selector;
        self.next_selector += 1;
        selector
    }

    /// Number of selector ids handed out so far.
    pub fn selectors_used(&self) -> usize {
        self.next_selector
    }

    /// Registers a gate and returns its selector.
    /// A gate identical to an already registered one shares its selector.
    ///
    /// # Panics
    ///
    /// Will panic if a constraint references a selector column.
    pub fn add_gate(&mut self, constraints: Vec<Expr<F>>) -> usize {
        assert_no_selector(collect_variables(&constraints).iter());
        match self.gate_selectors.entry(constraints) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let selector_index = self.next_selector;
                self.next_selector += 1;
                self.gates.push(Gate {
                    selector_index,
                    constraints: e.key().clone(),
                });
                e.insert(selector_index);
                trace!("gate #{} gets selector {selector_index}", self.gates.len() - 1);
                selector_index
            }
        }
    }

    /// Registers a lookup gate and returns its tag (selector).
    /// A lookup gate identical to an already registered one shares its tag.
    ///
    /// # Panics
    ///
    /// Will panic if a lookup input references a selector column.
    pub fn add_lookup_gate(&mut self, constraints: Vec<LookupConstraint<F>>) -> usize {
        assert_no_selector(
            collect_variables(constraints.iter().flat_map(|c| c.lookup_input.iter())).iter(),
        );
        match self.lookup_gate_selectors.entry(constraints) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let tag_index = self.next_selector;
                self.next_selector += 1;
                self.lookup_gates.push(LookupGate {
                    tag_index,
                    constraints: e.key().clone(),
                });
                e.insert(tag_index);
                tag_index
            }
        }
    }

    pub fn add_copy_constraint(&mut self, first: Variable, second: Variable) {
        self.copy_constraints.push(CopyConstraint::new(first, second));
    }

    pub fn gates(&self) -> &[Gate<F>] {
        &self.gates
    }

    pub fn lookup_gates(&self) -> &[LookupGate<F>] {
        &self.lookup_gates
    }

    pub fn copy_constraints(&self) -> &[CopyConstraint] {
        &self.copy_constraints
    }

    /// Drops the copy constraint at `index`, returning it.
    /// Only meant for tooling that probes how a circuit reacts to a missing wire.
    pub fn remove_copy_constraint(&mut self, index: usize) -> CopyConstraint {
        self.copy_constraints.remove(index)
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn num_lookup_gates(&self) -> usize {
        self.lookup_gates.len()
    }

    /// Installs the `table/subtable` name to table id map the circuit uses.
    pub fn set_reserved_indices(&mut self, reserved_indices: BTreeMap<String, usize>) {
        self.reserved_indices = reserved_indices;
    }

    pub fn get_reserved_indices(&self) -> &BTreeMap<String, usize> {
        &self.reserved_indices
    }

    /// Table id of a `table/subtable` name.
    ///
    /// # Panics
    ///
    /// Will panic if the name was not reserved.
    pub fn lookup_table_id(&self, name: &str) -> usize {
        match self.reserved_indices.get(name) {
            Some(id) => *id,
            None => panic!("lookup table `{name}` is not among the reserved lookup tables"),
        }
    }

    /// Registers the table answering lookups to `table_id`.
    ///
    /// # Panics
    ///
    /// Will panic if the id is already taken.
    pub fn register_lookup_table(&mut self, table_id: usize, table: LookupTable) {
        let previous = self.lookup_tables.insert(table_id, table);
        assert!(previous.is_none(), "lookup table id {table_id} registered twice");
    }

    pub fn lookup_tables(&self) -> &BTreeMap<usize, LookupTable> {
        &self.lookup_tables
    }

    pub fn lookup_table(&self, table_id: usize) -> Option<&LookupTable> {
        self.lookup_tables.get(&table_id)
    }
}

fn assert_no_selector<'a, I: Iterator<Item = &'a Variable>>(vars: I) {
    for v in vars {
        assert!(
            v.typ != ColumnType::Selector,
            "selector {v} cannot be an operand of a constraint"
        );
    }
}
