//! Driver tests: convergence diagnostics and exactness against brute-force
//! enumeration where the scheme is exact (trees; graphs fully absorbed by
//! their neighborhoods).

use approx::assert_relative_eq;

use tnmp::{
    approximate_marginals, IsingModel, Propagation, PropagationOptions, SpinGraph,
};

/// Reference marginals by summing over all 2^n spin configurations.
/// Node ids must be contiguous in 0..n. State 0 is spin +1.
fn enumerate_marginals(model: &IsingModel, beta: f64) -> Vec<[f64; 2]> {
    let nodes = model.graph().nodes();
    let edges = model.graph().edges();
    let n = nodes.len();
    assert!(n <= 20);

    let spin = |assignment: usize, node: usize| -> f64 {
        if assignment >> node & 1 == 0 {
            1.0
        } else {
            -1.0
        }
    };

    let mut marginals = vec![[0.0f64; 2]; n];
    let mut partition = 0.0;
    for assignment in 0..(1usize << n) {
        let mut energy = 0.0;
        for &(u, v) in &edges {
            energy += model.coupling(u, v).unwrap() * spin(assignment, u) * spin(assignment, v);
        }
        for &node in &nodes {
            energy += model.field(node).unwrap() * spin(assignment, node);
        }
        let weight = (beta * energy).exp();
        partition += weight;
        for &node in &nodes {
            let state = usize::from(spin(assignment, node) < 0.0);
            marginals[node][state] += weight;
        }
    }
    for marginal in &mut marginals {
        marginal[0] /= partition;
        marginal[1] /= partition;
    }
    marginals
}

#[test]
fn tree_marginals_are_exact() {
    //     0
    //     |
    //     1 - 2
    //     |
    //     3 - 4
    let graph = SpinGraph::from_edges([(0, 1), (1, 2), (1, 3), (3, 4)]).unwrap();
    let couplings = [
        ((0, 1), 1.0),
        ((1, 2), -0.8),
        ((1, 3), 0.5),
        ((3, 4), 1.2),
    ];
    let fields = vec![0.3, -0.2, 0.1, 0.0, 0.4];
    let model = IsingModel::new(graph, couplings, fields).unwrap();
    let beta = 0.7;

    let options = PropagationOptions {
        radius: 1,
        beta,
        max_sweeps: 50,
        tolerance: 1e-12,
    };
    let (marginals, diagnostics) = approximate_marginals(&model, options).unwrap();
    assert!(diagnostics.converged);

    let exact = enumerate_marginals(&model, beta);
    for node in 0..5 {
        assert_relative_eq!(marginals[&node][0], exact[node][0], epsilon = 1e-9);
        assert_relative_eq!(marginals[&node][1], exact[node][1], epsilon = 1e-9);
    }
}

#[test]
fn fully_absorbed_cycle_is_exact_without_messages() {
    // At radius 2 every neighborhood of a 4-cycle swallows the whole
    // graph: no boundary, no message slots, and each marginal is the
    // exact partition-function marginal.
    let graph = SpinGraph::from_edges([(0, 1), (1, 2), (2, 3), (0, 3)]).unwrap();
    let couplings = [
        ((0, 1), 0.9),
        ((1, 2), 0.9),
        ((2, 3), 0.9),
        ((0, 3), 0.9),
    ];
    let fields = vec![0.2, -0.1, 0.3, 0.0];
    let model = IsingModel::new(graph, couplings, fields).unwrap();
    let beta = 0.8;

    let propagation = Propagation::prepare(&model, 2).unwrap();
    assert!(propagation.message_slots().is_empty());
    for node in 0..4 {
        assert!(propagation.boundary(node).unwrap().is_empty());
    }

    let options = PropagationOptions {
        radius: 2,
        beta,
        ..Default::default()
    };
    let (marginals, diagnostics) = approximate_marginals(&model, options).unwrap();
    assert!(diagnostics.converged);
    assert_eq!(diagnostics.sweeps_run, 0);

    let exact = enumerate_marginals(&model, beta);
    for node in 0..4 {
        assert_relative_eq!(marginals[&node][0], exact[node][0], epsilon = 1e-10);
    }
}

#[test]
fn loopy_graph_converges_to_normalized_marginals() {
    // 6-cycle at radius 1: genuinely approximate, but the sweeps must
    // converge and every marginal must stay a distribution.
    let graph = SpinGraph::from_edges((0..6).map(|i| (i, (i + 1) % 6))).unwrap();
    let mut fields = vec![0.0; 6];
    fields[0] = 0.5;
    let couplings: Vec<((usize, usize), f64)> = graph
        .edges()
        .into_iter()
        .map(|edge| (edge, -1.0))
        .collect();
    let model = IsingModel::new(graph, couplings, fields).unwrap();

    let options = PropagationOptions {
        radius: 1,
        beta: 0.6,
        max_sweeps: 200,
        tolerance: 1e-10,
    };
    let (marginals, diagnostics) = approximate_marginals(&model, options).unwrap();
    assert!(diagnostics.converged);
    assert!(diagnostics.sweeps_run > 0);
    assert!(diagnostics.final_max_delta < 1e-10);

    for node in 0..6 {
        let marginal = marginals[&node];
        assert!(marginal[0] >= 0.0 && marginal[1] >= 0.0);
        assert_relative_eq!(marginal[0] + marginal[1], 1.0, epsilon = 1e-12);
    }
    // The antiferromagnetic coupling flips the field's preference on the
    // pinned spin's neighbors.
    assert!(marginals[&0][0] > 0.5);
    assert!(marginals[&1][0] < 0.5);
    assert!(marginals[&5][0] < 0.5);
}

#[test]
fn radius_controls_the_quality_of_the_approximation() {
    // On a 6-cycle, radius 4 absorbs the loop entirely and reproduces the
    // exact marginals; radius 1 does not have to.
    let graph = SpinGraph::from_edges((0..6).map(|i| (i, (i + 1) % 6))).unwrap();
    let mut fields = vec![0.0; 6];
    fields[2] = 0.4;
    let couplings: Vec<((usize, usize), f64)> = graph
        .edges()
        .into_iter()
        .map(|edge| (edge, 1.1))
        .collect();
    let model = IsingModel::new(graph, couplings, fields).unwrap();
    let beta = 0.9;
    let exact = enumerate_marginals(&model, beta);

    let options = PropagationOptions {
        radius: 4,
        beta,
        ..Default::default()
    };
    let (marginals, diagnostics) = approximate_marginals(&model, options).unwrap();
    assert!(diagnostics.converged);
    for node in 0..6 {
        assert_relative_eq!(marginals[&node][0], exact[node][0], epsilon = 1e-9);
    }
}
