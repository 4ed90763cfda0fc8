use std::collections::VecDeque;
use std::fmt;

use crate::error::Error;
use crate::network::symbol::GateSymbol;

/// Dense opaque identifier of a gate in a [`GNet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GateId(u32);

impl GateId {
    pub(crate) fn new(index: usize) -> GateId {
        GateId(index as u32)
    }

    /// Internal slot index of the gate
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fan-out edge of a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Consumer gate
    pub target: GateId,
}

/// A single gate: its function, predecessors and successors
#[derive(Debug, Clone)]
pub struct Gate {
    func: GateSymbol,
    inputs: Vec<GateId>,
    links: Vec<Link>,
}

impl Gate {
    /// Function of the gate
    pub fn func(&self) -> GateSymbol {
        self.func
    }

    /// Predecessor list; a gate used twice appears twice
    pub fn inputs(&self) -> &[GateId] {
        &self.inputs
    }

    /// Successor list; one entry per consuming input
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Whether the gate has no predecessors
    pub fn is_source(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Whether the gate is a primary output sink
    pub fn is_target(&self) -> bool {
        self.func == GateSymbol::Out
    }

    /// Whether the gate is an inverter
    pub fn is_not(&self) -> bool {
        self.func == GateSymbol::Not
    }

    /// Whether the gate is a conjunction
    pub fn is_and(&self) -> bool {
        self.func == GateSymbol::And
    }

    /// Whether the gate is a constant value
    pub fn is_value(&self) -> bool {
        self.func.is_value()
    }
}

/// Gate-level netlist: a directed acyclic multigraph of gates
///
/// Gates are stored in dense slots and keep both their predecessor list and
/// the derived successor links. Erasing a gate leaves a hole; identifiers of
/// live gates are stable.
#[derive(Debug, Clone, Default)]
pub struct GNet {
    gates: Vec<Option<Gate>>,
    n_gates: usize,
}

impl GNet {
    /// Create an empty net
    pub fn new() -> GNet {
        GNet::default()
    }

    /// Number of live gates
    pub fn n_gates(&self) -> usize {
        self.n_gates
    }

    /// Whether the identifier refers to a live gate
    pub fn contains(&self, id: GateId) -> bool {
        self.gates.get(id.index()).is_some_and(|g| g.is_some())
    }

    /// Access a gate; panics on a stale or foreign identifier
    pub fn gate(&self, id: GateId) -> &Gate {
        self.gates[id.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("gate {id} was erased or never existed"))
    }

    fn gate_mut(&mut self, id: GateId) -> &mut Gate {
        self.gates[id.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("gate {id} was erased or never existed"))
    }

    /// Iterate the live gates in slot order
    pub fn gates(&self) -> impl Iterator<Item = (GateId, &Gate)> {
        self.gates
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.as_ref().map(|g| (GateId::new(i), g)))
    }

    /// Iterate the identifiers of the live gates in slot order
    pub fn gate_ids(&self) -> impl Iterator<Item = GateId> + '_ {
        self.gates().map(|(id, _)| id)
    }

    /// Number of primary input gates
    pub fn n_source_links(&self) -> usize {
        self.gates()
            .filter(|(_, g)| g.func() == GateSymbol::In)
            .count()
    }

    /// Number of primary output gates
    pub fn n_target_links(&self) -> usize {
        self.gates().filter(|(_, g)| g.is_target()).count()
    }

    /// Gates with no predecessors (primary inputs and constants)
    pub fn sources(&self) -> Vec<GateId> {
        self.gates()
            .filter(|(_, g)| g.is_source())
            .map(|(id, _)| id)
            .collect()
    }

    /// Add a gate with the given function and predecessors
    pub fn add_gate(&mut self, func: GateSymbol, inputs: &[GateId]) -> GateId {
        let id = GateId::new(self.gates.len());
        self.gates.push(Some(Gate {
            func,
            inputs: inputs.to_vec(),
            links: Vec::new(),
        }));
        self.n_gates += 1;
        for &input in inputs {
            self.gate_mut(input).links.push(Link { target: id });
        }
        id
    }

    /// Add a primary input gate
    pub fn add_input(&mut self) -> GateId {
        self.add_gate(GateSymbol::In, &[])
    }

    /// Add a primary output sink fed by `node`
    pub fn add_out(&mut self, node: GateId) -> GateId {
        self.add_gate(GateSymbol::Out, &[node])
    }

    /// Replace the function and predecessors of an existing gate
    pub fn set_gate(&mut self, id: GateId, func: GateSymbol, inputs: &[GateId]) {
        let old_inputs = std::mem::take(&mut self.gate_mut(id).inputs);
        for input in old_inputs {
            self.unlink(input, id);
        }
        let gate = self.gate_mut(id);
        gate.func = func;
        gate.inputs = inputs.to_vec();
        for &input in inputs {
            self.gate_mut(input).links.push(Link { target: id });
        }
    }

    /// Erase a gate, detaching it from its predecessors
    ///
    /// The gate must not be referenced by any live consumer; callers rewire
    /// or erase consumers first.
    pub fn erase_gate(&mut self, id: GateId) {
        let gate = self.gates[id.index()]
            .take()
            .unwrap_or_else(|| panic!("gate {id} was erased or never existed"));
        self.n_gates -= 1;
        for input in gate.inputs {
            if self.contains(input) {
                self.unlink(input, id);
            }
        }
        debug_assert!(
            gate.links.iter().all(|l| !self.contains(l.target)),
            "gate {id} erased while still referenced"
        );
    }

    /// Remove one fan-out entry of `producer` pointing at `consumer`
    fn unlink(&mut self, producer: GateId, consumer: GateId) {
        let links = &mut self.gate_mut(producer).links;
        if let Some(pos) = links.iter().position(|l| l.target == consumer) {
            links.remove(pos);
        }
    }

    /// Kahn-style topological order of the live gates
    ///
    /// Fails with the identifier of one gate on a cycle.
    pub fn topological_order(&self) -> Result<Vec<GateId>, Error> {
        let mut pending = vec![0usize; self.gates.len()];
        for (_, gate) in self.gates() {
            for link in gate.links() {
                pending[link.target.index()] += 1;
            }
        }

        let mut queue: VecDeque<GateId> = self
            .gates()
            .filter(|(id, _)| pending[id.index()] == 0)
            .map(|(id, _)| id)
            .collect();
        let mut order = Vec::with_capacity(self.n_gates);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            for link in self.gate(id).links() {
                let t = link.target.index();
                pending[t] -= 1;
                if pending[t] == 0 {
                    queue.push_back(link.target);
                }
            }
        }

        if order.len() != self.n_gates {
            let stuck = self
                .gate_ids()
                .find(|id| pending[id.index()] != 0)
                .expect("some gate must be unprocessed");
            return Err(Error::CombinationalLoop(stuck));
        }
        Ok(order)
    }

    /// Check consistency of the datastructure
    pub fn check(&self) {
        for (id, gate) in self.gates() {
            for &input in gate.inputs() {
                assert!(self.contains(input), "gate {id} has a stale input {input}");
                let back = self
                    .gate(input)
                    .links()
                    .iter()
                    .filter(|l| l.target == id)
                    .count();
                let fwd = gate.inputs().iter().filter(|&&i| i == input).count();
                assert_eq!(back, fwd, "inconsistent links between {input} and {id}");
            }
            for link in gate.links() {
                assert!(
                    self.contains(link.target),
                    "gate {id} has a stale link {}",
                    link.target
                );
            }
        }
    }
}

impl fmt::Display for GNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Net with {} inputs, {} outputs, {} gates:",
            self.n_source_links(),
            self.n_target_links(),
            self.n_gates()
        )?;
        for (id, gate) in self.gates() {
            write!(f, "\t{}{}(", gate.func(), id)?;
            for (i, input) in gate.inputs().iter().enumerate() {
                if i != 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{input}")?;
            }
            writeln!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut net = GNet::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let a = net.add_gate(GateSymbol::And, &[i0, i1]);
        let o = net.add_out(a);

        assert_eq!(net.n_gates(), 4);
        assert_eq!(net.n_source_links(), 2);
        assert_eq!(net.n_target_links(), 1);
        assert_eq!(net.gate(a).inputs(), &[i0, i1]);
        assert_eq!(net.gate(i0).links(), &[Link { target: a }]);
        assert!(net.gate(o).is_target());
        assert!(net.gate(i0).is_source());
        assert!(net.gate(a).is_and());
        net.check();
    }

    #[test]
    fn test_duplicate_input() {
        let mut net = GNet::new();
        let i0 = net.add_input();
        let a = net.add_gate(GateSymbol::And, &[i0, i0]);
        assert_eq!(net.gate(i0).links().len(), 2);
        net.check();

        let i1 = net.add_input();
        net.set_gate(a, GateSymbol::Or, &[i0, i1]);
        assert_eq!(net.gate(i0).links().len(), 1);
        assert_eq!(net.gate(i1).links().len(), 1);
        net.check();
    }

    #[test]
    fn test_erase() {
        let mut net = GNet::new();
        let i0 = net.add_input();
        let n = net.add_gate(GateSymbol::Not, &[i0]);
        let o = net.add_out(n);

        net.erase_gate(o);
        assert!(!net.contains(o));
        assert!(net.gate(n).links().is_empty());
        net.erase_gate(n);
        assert!(net.gate(i0).links().is_empty());
        assert_eq!(net.n_gates(), 1);
        net.check();
    }

    #[test]
    fn test_topological_order() {
        let mut net = GNet::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let a = net.add_gate(GateSymbol::And, &[i0, i1]);
        let b = net.add_gate(GateSymbol::Or, &[a, i1]);
        let o = net.add_out(b);

        let order = net.topological_order().unwrap();
        assert_eq!(order.len(), 5);
        let pos = |id: GateId| order.iter().position(|&x| x == id).unwrap();
        assert!(pos(i0) < pos(a));
        assert!(pos(i1) < pos(a));
        assert!(pos(a) < pos(b));
        assert!(pos(b) < pos(o));
    }

    #[test]
    fn test_topological_order_cycle() {
        let mut net = GNet::new();
        let i0 = net.add_input();
        let a = net.add_gate(GateSymbol::And, &[i0]);
        let b = net.add_gate(GateSymbol::And, &[a]);
        net.set_gate(a, GateSymbol::And, &[i0, b]);

        assert!(matches!(
            net.topological_order(),
            Err(Error::CombinationalLoop(_))
        ));
    }
}
