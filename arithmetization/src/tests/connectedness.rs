use crate::{
    circuits::{
        assignment::AssignmentTable, constraints::ConstraintSystem, expr::Expr,
        variable::Variable,
    },
    component::{
        arithmetic::{Addition, ArithmeticInput, Multiplication},
        check_component_connectedness,
        running_sum::{RunningSum, RunningSumInput},
        Component,
    },
    connectedness::{
        check_connectedness, check_islands, check_strong_connectedness,
        check_weak_connectedness, generate_connectedness_zones, ConnectednessCheck,
    },
};
use ark_bn254::Fr as Fp;
use itertools::Itertools;
use proptest::prelude::*;
use std::collections::VecDeque;

use super::framework::TestFramework;

fn addition_input() -> ArithmeticInput {
    ArithmeticInput {
        x: Variable::public_input_at(0, 0),
        y: Variable::public_input_at(0, 1),
    }
}

/// An addition on row 0, plus, if `island` is set, a multiplication gate
/// active on the same row over columns no copy constraint reaches.
fn addition_circuit(island: bool) -> (ConstraintSystem<Fp>, AssignmentTable<Fp>) {
    let mut runner = TestFramework::<Fp>::new(6).public_inputs(1).setup().unwrap();
    runner.place(&Addition { witness: [0, 1, 2] }, &addition_input(), 0);
    if island {
        let stray = Multiplication { witness: [3, 4, 5] };
        let selectors = <Multiplication as Component<Fp>>::generate_gates(&stray, &mut runner.cs);
        stray.enable_selectors(&selectors, &mut runner.assignment, 0);
    }
    (runner.cs, runner.assignment)
}

#[test]
fn test_island_is_detected() {
    let addition = Addition { witness: [0, 1, 2] };
    let input = addition_input();

    let (cs, assignment) = addition_circuit(true);
    let strong = ConnectednessCheck::strong();
    assert!(check_component_connectedness(
        &addition,
        &cs,
        &assignment,
        &input,
        0,
        strong
    ));
    assert!(!check_component_connectedness(
        &addition,
        &cs,
        &assignment,
        &input,
        0,
        strong.with_islands()
    ));

    let (cs, assignment) = addition_circuit(false);
    assert!(check_component_connectedness(
        &addition,
        &cs,
        &assignment,
        &input,
        0,
        strong.with_islands()
    ));
}

#[test]
fn test_weak_but_not_strong() {
    // two independent wires through one row
    let mut cs = ConstraintSystem::<Fp>::new();
    let assignment = AssignmentTable::<Fp>::create(2).public_inputs(1).build();
    let inputs = [Variable::public_input_at(0, 0), Variable::public_input_at(0, 1)];
    let outputs = [Variable::witness_at(0, 3), Variable::witness_at(1, 3)];
    cs.add_copy_constraint(inputs[0], outputs[0]);
    cs.add_copy_constraint(inputs[1], outputs[1]);

    let zones = generate_connectedness_zones(&cs, &assignment, &inputs, &outputs, 3, 1);
    assert!(check_weak_connectedness(&zones, &inputs, &outputs));
    assert!(!check_strong_connectedness(&zones, &inputs, &outputs));
    assert!(check_islands(&zones, &inputs, &outputs));

    // the second output is not wired to any input
    assert!(!check_weak_connectedness(
        &zones,
        &inputs[..1],
        &outputs
    ));
    assert!(check_connectedness(
        &cs,
        &assignment,
        &inputs[..1],
        &outputs[..1],
        3,
        1,
        ConnectednessCheck::strong().with_islands()
    ));
}

#[test]
fn test_removing_any_copy_constraint_breaks_the_running_sum() {
    let terms = 4;
    let component = RunningSum::new([0, 1, 2], terms);
    let input = RunningSumInput {
        values: (0..terms).map(|row| Variable::public_input_at(0, row)).collect(),
    };
    let mut runner = TestFramework::<Fp>::new(3).public_inputs(1).setup().unwrap();
    runner.place(&component, &input, 1);

    let strong = ConnectednessCheck::strong();
    assert!(runner.connected(&component, &input, 1, strong));

    // 4 inputs and 3 row-to-row links
    assert_eq!(runner.cs.copy_constraints().len(), 7);
    for i in 0..runner.cs.copy_constraints().len() {
        let mut cs = runner.cs.clone();
        let removed = cs.remove_copy_constraint(i);
        assert!(
            !check_component_connectedness(&component, &cs, &runner.assignment, &input, 1, strong),
            "still connected without {} = {}",
            removed.first,
            removed.second
        );
    }
}

const COLUMNS: usize = 3;
const ROWS: usize = 6;

fn w(column: usize, rotation: i32) -> Expr<Fp> {
    Expr::var(Variable::witness(column, rotation))
}

/// Connected components of the graph built from the same edges the
/// checker merges, by breadth-first search.
fn reference_components(
    cs: &ConstraintSystem<Fp>,
    assignment: &AssignmentTable<Fp>,
    address: impl Fn(&Variable) -> Option<usize>,
    size: usize,
) -> Vec<usize> {
    let mut adjacency = vec![vec![]; size];
    let mut add_edge = |a: usize, b: usize| {
        adjacency[a].push(b);
        adjacency[b].push(a);
    };
    for gate in cs.gates() {
        for row in 0..ROWS {
            if !assignment.is_selector_enabled(gate.selector_index, row) {
                continue;
            }
            let addresses: Vec<usize> = gate
                .variables()
                .iter()
                .filter_map(|v| v.resolve(row))
                .filter_map(|v| address(&v))
                .collect();
            for (a, b) in addresses.iter().tuple_windows() {
                add_edge(*a, *b);
            }
        }
    }
    for copy in cs.copy_constraints() {
        if let (Some(a), Some(b)) = (address(&copy.first), address(&copy.second)) {
            add_edge(a, b);
        }
    }

    let mut component = vec![usize::MAX; size];
    for start in 0..size {
        if component[start] != usize::MAX {
            continue;
        }
        component[start] = start;
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for &next in &adjacency[node] {
                if component[next] == usize::MAX {
                    component[next] = start;
                    queue.push_back(next);
                }
            }
        }
    }
    component
}

fn arb_cell() -> impl Strategy<Value = (usize, usize)> {
    (0..COLUMNS, 0..ROWS)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_zones_match_reachability(
        gates in prop::collection::vec(
            (0..COLUMNS, 0..COLUMNS, -1i32..=1, prop::collection::vec(any::<bool>(), ROWS)),
            0..5,
        ),
        copies in prop::collection::vec((arb_cell(), arb_cell()), 0..8),
    ) {
        let mut cs = ConstraintSystem::<Fp>::new();
        let mut assignment = AssignmentTable::<Fp>::create(COLUMNS)
            .selectors(gates.len())
            .build();
        for (left, right, rotation, active) in &gates {
            let selector = cs.add_gate(vec![w(*left, 0) * w(*right, *rotation)]);
            for (row, on) in active.iter().enumerate() {
                if *on {
                    assignment.enable_selector(selector, row);
                }
            }
        }
        for ((c1, r1), (c2, r2)) in &copies {
            cs.add_copy_constraint(Variable::witness_at(*c1, *r1), Variable::witness_at(*c2, *r2));
        }

        let zones = generate_connectedness_zones(&cs, &assignment, &[], &[], 0, ROWS);
        prop_assert_eq!(zones.len(), COLUMNS * ROWS);
        let reference = reference_components(&cs, &assignment, |v| zones.address(v), zones.len());

        for (a, b) in (0..zones.len()).cartesian_product(0..zones.len()) {
            prop_assert_eq!(zones.same_zone(a, b), reference[a] == reference[b]);
        }
    }
}
