#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use springx::{
    network_from_json, solve_partitioned, AnalysisError, Solution, SolverOptions, SpringNetwork,
};

const TOLERANCE: f64 = 1.0e-3;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Chain fixed at `v1` and loaded at the three free nodes.
fn chain_network() -> SpringNetwork {
    let mut network = SpringNetwork::new();
    network
        .add_restricted_node(0.0, "v1")
        .expect("v1 declaration succeeds");
    network
        .add_unrestricted_node(-4.0, "v2")
        .expect("v2 declaration succeeds");
    network
        .add_unrestricted_node(-8.0, "v3")
        .expect("v3 declaration succeeds");
    network
        .add_unrestricted_node(20.0, "v4")
        .expect("v4 declaration succeeds");
    network
        .add_spring("v1", "v2", 10.0, "e1")
        .expect("e1 declaration succeeds");
    network
        .add_spring("v2", "v3", 8.0, "e2")
        .expect("e2 declaration succeeds");
    network
        .add_spring("v3", "v4", 12.0, "e3")
        .expect("e3 declaration succeeds");
    network
}

/// Branching network supported at both `v4` and `v5`.
fn branching_network() -> SpringNetwork {
    let mut network = SpringNetwork::new();
    network
        .add_restricted_node(0.0, "v4")
        .expect("v4 declaration succeeds");
    network
        .add_restricted_node(0.0, "v5")
        .expect("v5 declaration succeeds");
    network
        .add_unrestricted_node(5.0, "v1")
        .expect("v1 declaration succeeds");
    network
        .add_unrestricted_node(4.0, "v2")
        .expect("v2 declaration succeeds");
    network
        .add_unrestricted_node(0.0, "v3")
        .expect("v3 declaration succeeds");
    network
        .add_spring("v4", "v2", 10.0, "e1")
        .expect("e1 declaration succeeds");
    network
        .add_spring("v2", "v3", 4.0, "e2")
        .expect("e2 declaration succeeds");
    network
        .add_spring("v3", "v5", 3.0, "e3")
        .expect("e3 declaration succeeds");
    network
        .add_spring("v2", "v1", 8.0, "e4")
        .expect("e4 declaration succeeds");
    network
}

fn assert_symmetric(solution: &Solution) {
    let global = &solution.stiffness().global;
    for i in 0..global.nrows() {
        for j in 0..global.ncols() {
            assert_eq!(global[(i, j)], global[(j, i)]);
        }
    }
}

fn assert_consistent(solution: &Solution) {
    for value in solution.residual().iter() {
        assert_relative_eq!(*value, 0.0, epsilon = 1.0e-9);
    }
    assert_relative_eq!(solution.equilibrium_imbalance(), 0.0, epsilon = 1.0e-9);
}

#[test]
fn chain_matches_hand_calculation() {
    init_logging();
    let solution = chain_network().solve().expect("chain analysis succeeds");

    let expected = [("v1", 0.0), ("v2", 0.8), ("v3", 2.3), ("v4", 3.967)];
    for (id, displacement) in expected {
        let solved = solution
            .node_displacement(id)
            .expect("displacement available");
        assert_relative_eq!(solved, displacement, epsilon = TOLERANCE);
    }

    let reaction = solution.node_force("v1").expect("reaction available");
    assert_relative_eq!(reaction, -8.0, epsilon = TOLERANCE);

    let expected_forces = [("e1", 8.0), ("e2", 12.0), ("e3", 20.0)];
    for (id, force) in expected_forces {
        let member = solution.member_force(id).expect("member force available");
        assert_relative_eq!(member.internal_force, force, epsilon = TOLERANCE);
        assert_relative_eq!(member.delta, member.u_j - member.u_i);
        assert!(member.is_tension());
    }

    assert_symmetric(&solution);
    assert_consistent(&solution);
}

#[test]
fn chain_exposes_partitioned_vectors() {
    let solution = chain_network().solve().expect("chain analysis succeeds");

    let displacements = solution.displacements();
    assert_eq!(displacements.restricted.len(), 1);
    assert_eq!(displacements.unrestricted.len(), 3);
    assert_eq!(displacements.global.len(), 4);
    assert_eq!(displacements.global[0], displacements.restricted[0]);

    let forces = solution.forces();
    assert_eq!(forces.unrestricted.as_slice(), &[-4.0, -8.0, 20.0]);
    assert_relative_eq!(forces.global[0], forces.restricted[0]);

    let placeholders: Vec<_> = solution
        .boundary()
        .force
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(placeholders, vec!["P_v1", "-4", "-8", "20"]);
}

#[test]
fn branching_network_is_in_equilibrium() {
    init_logging();
    let solution = branching_network()
        .solve()
        .expect("branching analysis succeeds");

    let stiffness = solution.stiffness();
    assert_eq!(stiffness.kuu.shape(), (3, 3));
    assert!(stiffness.kuu.determinant().abs() > 1.0e-9);

    let applied = 5.0 + 4.0 + 0.0;
    let reactions = solution.node_force("v4").expect("v4 reaction available")
        + solution.node_force("v5").expect("v5 reaction available");
    assert_relative_eq!(applied + reactions, 0.0, epsilon = TOLERANCE);

    for member in solution.member_forces().values() {
        assert!(member.internal_force.is_finite());
    }

    // Nodal equilibrium at v2, which is the `to` end of e1 and the `from` end of e2 and e4.
    let e1 = solution.member_force("e1").expect("e1 available").internal_force;
    let e2 = solution.member_force("e2").expect("e2 available").internal_force;
    let e4 = solution.member_force("e4").expect("e4 available").internal_force;
    assert_relative_eq!(e1 - e2 - e4, 4.0, epsilon = 1.0e-9);
    // The only load beyond v2 along e4 is the 5.0 at v1.
    assert_relative_eq!(e4, 5.0, epsilon = 1.0e-9);

    assert_symmetric(&solution);
    assert_consistent(&solution);
}

#[test]
fn partitions_match_global_offsets() {
    let solution = branching_network()
        .solve()
        .expect("branching analysis succeeds");
    let blocks = solution.stiffness();
    let r = solution.dof_order().restricted_count();
    let u = solution.dof_order().unrestricted_count();

    for i in 0..r {
        for j in 0..r {
            assert_eq!(blocks.krr[(i, j)], blocks.global[(i, j)]);
        }
        for j in 0..u {
            assert_eq!(blocks.kru[(i, j)], blocks.global[(i, r + j)]);
        }
    }
    for i in 0..u {
        for j in 0..r {
            assert_eq!(blocks.kur[(i, j)], blocks.global[(r + i, j)]);
        }
        for j in 0..u {
            assert_eq!(blocks.kuu[(i, j)], blocks.global[(r + i, r + j)]);
        }
    }
}

#[test]
fn repeated_solves_are_identical() {
    let network = branching_network();
    let first = network.solve().expect("first analysis succeeds");
    let second = network.solve().expect("second analysis succeeds");
    assert_eq!(first, second);
}

#[test]
fn partitioned_solve_reuses_snapshot_blocks() {
    let solution = branching_network()
        .solve()
        .expect("branching analysis succeeds");
    let resolved = solve_partitioned(
        solution.stiffness(),
        solution.boundary(),
        &SolverOptions::default(),
    )
    .expect("snapshot blocks are well posed");
    assert_eq!(resolved.displacements, solution.displacements().unrestricted);
    assert_eq!(resolved.reactions, solution.forces().restricted);
}

#[test]
fn acceptance_does_not_depend_on_stiffness_scale() {
    for scale in [1.0e-13, 1.0, 1.0e13] {
        let mut network = SpringNetwork::new();
        network
            .add_restricted_node(0.0, "wall")
            .expect("wall declaration succeeds");
        network
            .add_unrestricted_node(scale, "tip")
            .expect("tip declaration succeeds");
        network
            .add_spring("wall", "tip", scale, "s")
            .expect("s declaration succeeds");

        let solution = network.solve().expect("scaled analysis succeeds");
        let tip = solution.node_displacement("tip").expect("tip solved");
        assert_relative_eq!(tip, 1.0, epsilon = 1.0e-12);
    }
}

#[test]
fn disconnected_free_node_is_ill_posed() {
    init_logging();
    let mut network = chain_network();
    network
        .add_unrestricted_node(3.0, "island")
        .expect("island declaration succeeds");

    let error = network.solve().expect_err("singular system rejected");
    assert!(matches!(error, AnalysisError::IllPosedSystem { .. }));
}

#[test]
fn floating_subnetwork_is_ill_posed() {
    let mut network = chain_network();
    network
        .add_unrestricted_node(1.0, "a")
        .expect("a declaration succeeds");
    network
        .add_unrestricted_node(-1.0, "b")
        .expect("b declaration succeeds");
    network
        .add_spring("a", "b", 6.0, "ab")
        .expect("ab declaration succeeds");

    let error = network
        .solve_with(&SolverOptions::default())
        .expect_err("rigid body mode rejected");
    assert!(matches!(error, AnalysisError::IllPosedSystem { .. }));
}

#[test]
fn json_description_solves_like_built_network() {
    let json = r#"{
        "nodes": [
            { "id": "v1", "restricted": true, "value": 0.0 },
            { "id": "v2", "restricted": false, "value": -4.0 },
            { "id": "v3", "restricted": false, "value": -8.0 },
            { "id": "v4", "restricted": false, "value": 20.0 }
        ],
        "springs": [
            { "id": "e1", "from": "v1", "to": "v2", "stiffness": 10.0 },
            { "id": "e2", "from": "v2", "to": "v3", "stiffness": 8.0 },
            { "id": "e3", "from": "v3", "to": "v4", "stiffness": 12.0 }
        ]
    }"#;
    let loaded = network_from_json(json)
        .expect("description loads")
        .solve()
        .expect("loaded analysis succeeds");
    let built = chain_network().solve().expect("built analysis succeeds");
    assert_eq!(loaded, built);
}

#[test]
fn solution_snapshot_serializes() {
    let solution = chain_network().solve().expect("chain analysis succeeds");
    let json = solution.to_json().expect("snapshot serializes");
    let value: serde_json::Value = serde_json::from_str(&json).expect("snapshot is valid json");

    let ids: Vec<_> = value["member_forces"]
        .as_object()
        .expect("member forces are an object")
        .keys()
        .cloned()
        .collect();
    assert_eq!(ids, vec!["e1", "e2", "e3"]);
    let e2 = value["member_forces"]["e2"]["internal_force"]
        .as_f64()
        .expect("internal force is numeric");
    assert_relative_eq!(e2, 12.0, epsilon = TOLERANCE);
}
