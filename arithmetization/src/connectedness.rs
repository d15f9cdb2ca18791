//! This module implements the connectedness checker: a static analysis
//! telling whether the constraints active on the rows of a component link its
//! input variables to its output variables, and whether some of them touch
//! cells linked to neither (an "island").
//!
//! Cells are flattened into addresses and merged in a [`DisjointSet`] along
//! two kinds of edges:
//! - the variables of a gate (or lookup gate) active at a row of the window,
//! - the two ends of every copy constraint.
//!
//! The address space is made of, in order:
//! - the witness and constant cells of the window, `row_size` per row,
//! - the public input cells, column by column,
//! - one slot per input or output variable lying outside both.
//!
//! Cells outside the address space are ignored, and so are edges touching them.

use crate::{
    circuits::{
        assignment::AssignmentTable, constraints::ConstraintSystem, variable::ColumnType,
        variable::Variable,
    },
    union_find::DisjointSet,
};
use ark_ff::{Field, PrimeField};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    io::{Result as IoResult, Write},
    ops::Range,
};

/// How the inputs and outputs of a component must be linked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectednessType {
    None,
    /// Every output shares a zone with some input, and every input with some output.
    Weak,
    /// All the inputs and outputs share a single zone.
    Strong,
}

/// Whether constraints outside the zones of the inputs and outputs are an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IslandsCheck {
    None,
    Islands,
}

/// Configuration of [`check_connectedness`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectednessCheck {
    pub kind: ConnectednessType,
    pub islands: IslandsCheck,
}

impl ConnectednessCheck {
    pub fn none() -> Self {
        ConnectednessCheck {
            kind: ConnectednessType::None,
            islands: IslandsCheck::None,
        }
    }

    pub fn weak() -> Self {
        ConnectednessCheck {
            kind: ConnectednessType::Weak,
            islands: IslandsCheck::None,
        }
    }

    pub fn strong() -> Self {
        ConnectednessCheck {
            kind: ConnectednessType::Strong,
            islands: IslandsCheck::None,
        }
    }

    #[must_use]
    pub fn with_islands(mut self) -> Self {
        self.islands = IslandsCheck::Islands;
        self
    }
}

/// Maps absolute cells to addresses.
#[derive(Clone, Debug)]
struct AddressSpace {
    window: Range<usize>,
    witnesses_amount: usize,
    constants_amount: usize,
    public_inputs_amount: usize,
    public_rows: usize,
    /// Slots of the boundary variables outside the window and public inputs.
    boundary: BTreeMap<Variable, usize>,
    size: usize,
}

impl AddressSpace {
    fn new<F: Field>(
        assignment: &AssignmentTable<F>,
        boundary: &[Variable],
        start_row: usize,
        rows_amount: usize,
    ) -> Self {
        let public_inputs_amount = assignment.public_inputs_amount();
        let public_rows = (0..public_inputs_amount)
            .map(|c| assignment.public_input_column_size(c))
            .max()
            .unwrap_or(0);
        let witnesses_amount = assignment.witnesses_amount();
        let constants_amount = assignment.constants_amount();
        let mut space = AddressSpace {
            window: start_row..start_row + rows_amount,
            witnesses_amount,
            constants_amount,
            public_inputs_amount,
            public_rows,
            boundary: BTreeMap::new(),
            size: 0,
        };
        space.size = space.row_size() * rows_amount + public_inputs_amount * public_rows;
        for var in boundary {
            if space.address(var).is_none() {
                space.boundary.insert(*var, space.size);
                space.size += 1;
            }
        }
        space
    }

    fn row_size(&self) -> usize {
        self.witnesses_amount + self.constants_amount
    }

    fn window_cell(&self, row: usize, offset: usize) -> usize {
        (row - self.window.start) * self.row_size() + offset
    }

    fn address(&self, var: &Variable) -> Option<usize> {
        if var.relative {
            return None;
        }
        let row = var.absolute_row();
        let in_window = self.window.contains(&row);
        let address = match var.typ {
            ColumnType::Witness if in_window && var.index < self.witnesses_amount => {
                Some(self.window_cell(row, var.index))
            }
            ColumnType::Constant if in_window && var.index < self.constants_amount => {
                Some(self.window_cell(row, self.witnesses_amount + var.index))
            }
            ColumnType::PublicInput
                if var.index < self.public_inputs_amount && row < self.public_rows =>
            {
                Some(
                    self.row_size() * self.window.len()
                        + var.index * self.public_rows
                        + row,
                )
            }
            _ => None,
        };
        address.or_else(|| self.boundary.get(var).copied())
    }
}

/// The zones of the cells of one component window.
#[derive(Clone, Debug)]
pub struct ConnectednessZones {
    zones: DisjointSet,
    space: AddressSpace,
    /// Addresses touched by an active constraint or a copy constraint.
    touched: BTreeSet<usize>,
}

impl ConnectednessZones {
    /// Number of addresses.
    pub fn len(&self) -> usize {
        self.space.size
    }

    pub fn is_empty(&self) -> bool {
        self.space.size == 0
    }

    /// Address of an absolute variable, if it belongs to the address space.
    pub fn address(&self, var: &Variable) -> Option<usize> {
        self.space.address(var)
    }

    /// Zone of an absolute variable, if it belongs to the address space.
    pub fn zone(&self, var: &Variable) -> Option<usize> {
        self.address(var).map(|address| self.zones.find(address))
    }

    /// Zone of an address.
    ///
    /// # Panics
    ///
    /// Will panic if the address is out of range.
    pub fn zone_of(&self, address: usize) -> usize {
        self.zones.find(address)
    }

    pub fn same_zone(&self, a: usize, b: usize) -> bool {
        self.zones.same_set(a, b)
    }

    fn touched(&self) -> impl Iterator<Item = usize> + '_ {
        self.touched.iter().copied()
    }

    /// Merges the given addresses into one zone.
    fn link(&mut self, addresses: &[usize]) {
        if let Some((&first, rest)) = addresses.split_first() {
            self.touched.insert(first);
            for &address in rest {
                self.zones.union_set(first, address);
                self.touched.insert(address);
            }
        }
    }
}

/// Rows of `window` at which `selector` is on.
fn active_rows<'a, F: Field>(
    assignment: &'a AssignmentTable<F>,
    selector: usize,
    window: Range<usize>,
) -> impl Iterator<Item = usize> + 'a {
    let exists = selector < assignment.selectors_amount();
    window.filter(move |&row| exists && assignment.is_selector_enabled(selector, row))
}

/// Builds the zones of the window `start_row..start_row + rows_amount`.
///
/// Every gate and lookup gate of `cs` contributes at the rows of the window
/// where it is active. Every copy constraint of `cs` with both ends in the
/// address space contributes.
pub fn generate_connectedness_zones<F: Field>(
    cs: &ConstraintSystem<F>,
    assignment: &AssignmentTable<F>,
    inputs: &[Variable],
    outputs: &[Variable],
    start_row: usize,
    rows_amount: usize,
) -> ConnectednessZones {
    let boundary: Vec<Variable> = inputs.iter().chain(outputs).copied().collect();
    let space = AddressSpace::new(assignment, &boundary, start_row, rows_amount);
    let mut zones = ConnectednessZones {
        zones: DisjointSet::new(space.size),
        space,
        touched: BTreeSet::new(),
    };
    let window = start_row..start_row + rows_amount;

    let gates = cs
        .gates()
        .iter()
        .map(|gate| (gate.selector_index, gate.variables()));
    let lookup_gates = cs
        .lookup_gates()
        .iter()
        .map(|gate| (gate.tag_index, gate.variables()));
    for (selector, variables) in gates.chain(lookup_gates) {
        for row in active_rows(assignment, selector, window.clone()) {
            let addresses: Vec<usize> = variables
                .iter()
                .filter_map(|v| v.resolve(row))
                .filter_map(|v| zones.address(&v))
                .collect();
            trace!("selector {selector} at row {row} links {addresses:?}");
            zones.link(&addresses);
        }
    }

    for copy in cs.copy_constraints() {
        if let (Some(first), Some(second)) =
            (zones.address(&copy.first), zones.address(&copy.second))
        {
            zones.link(&[first, second]);
        }
    }

    zones
}

/// All the inputs and outputs lie in the zone of the first of them.
pub fn check_strong_connectedness(
    zones: &ConnectednessZones,
    inputs: &[Variable],
    outputs: &[Variable],
) -> bool {
    let mut boundary = inputs.iter().chain(outputs);
    let Some(first) = boundary.next() else {
        return true;
    };
    let root = zones.zone(first);
    for var in boundary {
        if root.is_none() || zones.zone(var) != root {
            debug!("strong connectedness: {var} is not wired to {first}");
            return false;
        }
    }
    root.is_some()
}

/// Every output lies in the zone of some input, and every input in the zone
/// of some output.
pub fn check_weak_connectedness(
    zones: &ConnectednessZones,
    inputs: &[Variable],
    outputs: &[Variable],
) -> bool {
    let input_zones: BTreeSet<usize> = inputs.iter().filter_map(|v| zones.zone(v)).collect();
    let output_zones: BTreeSet<usize> = outputs.iter().filter_map(|v| zones.zone(v)).collect();

    let reaches = |vars: &[Variable], targets: &BTreeSet<usize>, what: &str| {
        vars.iter().all(|var| {
            let wired = zones.zone(var).is_some_and(|zone| targets.contains(&zone));
            if !wired {
                debug!("weak connectedness: {var} is not wired to any {what}");
            }
            wired
        })
    };
    reaches(outputs, &input_zones, "input") && reaches(inputs, &output_zones, "output")
}

/// Every cell touched by an active constraint or a copy constraint lies in
/// the zone of some input or output.
pub fn check_islands(
    zones: &ConnectednessZones,
    inputs: &[Variable],
    outputs: &[Variable],
) -> bool {
    let expected_zones: BTreeSet<usize> = inputs
        .iter()
        .chain(outputs)
        .filter_map(|v| zones.zone(v))
        .collect();
    for address in zones.touched() {
        if !expected_zones.contains(&zones.zone_of(address)) {
            debug!("islands: address {address} is not wired to any input or output");
            return false;
        }
    }
    true
}

/// Builds the zones of a component window and runs the requested checks.
pub fn check_connectedness<F: Field>(
    cs: &ConstraintSystem<F>,
    assignment: &AssignmentTable<F>,
    inputs: &[Variable],
    outputs: &[Variable],
    start_row: usize,
    rows_amount: usize,
    check: ConnectednessCheck,
) -> bool {
    if check == ConnectednessCheck::none() {
        return true;
    }
    let zones =
        generate_connectedness_zones(cs, assignment, inputs, outputs, start_row, rows_amount);

    let connected = match check.kind {
        ConnectednessType::None => true,
        ConnectednessType::Weak => check_weak_connectedness(&zones, inputs, outputs),
        ConnectednessType::Strong => check_strong_connectedness(&zones, inputs, outputs),
    };
    connected
        && match check.islands {
            IslandsCheck::None => true,
            IslandsCheck::Islands => check_islands(&zones, inputs, outputs),
        }
}

/// Dumps the window and the public inputs with every cell replaced by its
/// zone, in the format of [`AssignmentTable::export_table`].
pub fn export_connectedness_zones<F: PrimeField, W: Write>(
    zones: &ConnectednessZones,
    w: &mut W,
) -> IoResult<()> {
    let space = &zones.space;
    let mut table = AssignmentTable::<F>::create(space.witnesses_amount)
        .constants(space.constants_amount)
        .public_inputs(space.public_inputs_amount)
        .build::<F>();
    let zone = |address| F::from(zones.zone_of(address) as u64);

    for (i, row) in space.window.clone().enumerate() {
        for c in 0..space.witnesses_amount {
            table.set_witness(c, i, zone(space.window_cell(row, c)));
        }
        for c in 0..space.constants_amount {
            table.set_constant(c, i, zone(space.window_cell(row, space.witnesses_amount + c)));
        }
    }
    for c in 0..space.public_inputs_amount {
        for row in 0..space.public_rows {
            if let Some(address) = space.address(&Variable::public_input_at(c, row)) {
                table.set_public_input(c, row, zone(address));
            }
        }
    }
    table.export_table(w)
}
