//! Plain structural parameters of a net

use std::fmt;

use crate::error::Error;
use crate::network::GNet;

/// Input/output/gate counts and the longest combinational path
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainParameters {
    /// Number of primary inputs
    pub num_inputs: usize,
    /// Number of primary outputs
    pub num_outputs: usize,
    /// Number of gates, boundary nodes included
    pub num_gates: usize,
    /// Number of AND gates
    pub num_ands: usize,
    /// Number of inverters
    pub num_inverted_edges: usize,
    /// Number of edges on the longest path
    pub longest_path: usize,
}

/// Collect the plain parameters of a net
pub fn collect(net: &GNet) -> Result<PlainParameters, Error> {
    let mut parameters = PlainParameters {
        num_inputs: net.n_source_links(),
        num_outputs: net.n_target_links(),
        num_gates: net.n_gates(),
        ..PlainParameters::default()
    };
    for (_, gate) in net.gates() {
        if gate.is_and() {
            parameters.num_ands += 1;
        }
        if gate.is_not() {
            parameters.num_inverted_edges += 1;
        }
    }

    let order = net.topological_order()?;
    let mut distances = vec![0usize; order.len()];
    let index_of: std::collections::HashMap<_, _> = order
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i))
        .collect();
    for (i, &id) in order.iter().enumerate() {
        for &input in net.gate(id).inputs() {
            distances[i] = distances[i].max(distances[index_of[&input]] + 1);
        }
        parameters.longest_path = parameters.longest_path.max(distances[i]);
    }
    Ok(parameters)
}

impl fmt::Display for PlainParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of Inputs: {}", self.num_inputs)?;
        writeln!(f, "Number of Outputs: {}", self.num_outputs)?;
        writeln!(f, "Number of Gates: {}", self.num_gates)?;
        writeln!(f, "Number of And Gates: {}", self.num_ands)?;
        writeln!(f, "Number of Inverted Edges: {}", self.num_inverted_edges)?;
        writeln!(f, "Longest Path: {}", self.longest_path)
    }
}
