//! Ferromagnetic open chain with one pinned end.
//!
//! A positive field on spin 0 propagates down the chain through the
//! couplings; the magnetization profile decays with distance from the pin.
//!
//! Run:
//!   cargo run -p tnmp --example ising_chain
//!   RUST_LOG=debug cargo run -p tnmp --example ising_chain

use tnmp::{approximate_marginals, IsingModel, PropagationOptions, SpinGraph};

fn main() -> Result<(), tnmp::PropagationError> {
    env_logger::init();

    let n = 8;
    let graph = SpinGraph::from_edges((0..n - 1).map(|i| (i, i + 1)))?;
    let couplings: Vec<((usize, usize), f64)> = graph
        .edges()
        .into_iter()
        .map(|edge| (edge, 1.0))
        .collect();
    let mut fields = vec![0.0; n];
    fields[0] = 1.0;
    let model = IsingModel::new(graph, couplings, fields)?;

    let options = PropagationOptions {
        radius: 1,
        beta: 0.8,
        ..Default::default()
    };
    let (marginals, diagnostics) = approximate_marginals(&model, options)?;

    println!(
        "converged: {} after {} sweeps (max delta {:.3e})",
        diagnostics.converged, diagnostics.sweeps_run, diagnostics.final_max_delta
    );
    for node in 0..n {
        let marginal = marginals[&node];
        println!(
            "spin {node}: P(+1) = {:.6}  magnetization = {:+.6}",
            marginal[0],
            marginal[0] - marginal[1]
        );
    }
    Ok(())
}
