//! Structural predicates and net surgery built on the walker framework

use std::collections::{HashMap, HashSet, VecDeque};

use crate::cuts::Cut;
use crate::error::Error;
use crate::network::{GNet, GateId};
use crate::traverse::{Visitor, VisitorFlag, Walker};

/// Neighbors of a node: successors when `forward`, predecessors otherwise
pub fn next_nodes(net: &GNet, node: GateId, forward: bool) -> Vec<GateId> {
    if forward {
        net.gate(node).links().iter().map(|l| l.target).collect()
    } else {
        net.gate(node).inputs().to_vec()
    }
}

/// Check that `cut` is indeed a cut for `gate`
///
/// BFS backward from the gate; reaching a source before a cut member means
/// the cut is invalid, and the offending source is reported.
pub fn check_cut(net: &GNet, gate: GateId, cut: &Cut) -> Result<(), Error> {
    let mut bfs = VecDeque::new();
    let mut seen = HashSet::new();
    bfs.push_back(gate);
    while let Some(cur) = bfs.pop_front() {
        if !cut.contains(&cur) {
            if net.gate(cur).is_source() {
                return Err(Error::NotACut { gate, src: cur });
            }
            for &input in net.gate(cur).inputs() {
                if seen.insert(input) {
                    bfs.push_back(input);
                }
            }
        }
    }
    Ok(())
}

/// Dominator sets of all nodes, over a topological order
///
/// A source dominates itself; any other node is dominated by itself plus
/// the intersection of its predecessors' dominator sets.
pub fn find_dominators(
    net: &GNet,
    topo_order: &[GateId],
) -> HashMap<GateId, HashSet<GateId>> {
    let mut dominators: HashMap<GateId, HashSet<GateId>> = HashMap::new();
    for &current in topo_order {
        let inputs = net.gate(current).inputs();
        let mut set = if inputs.is_empty() {
            HashSet::new()
        } else {
            intersect(&dominators, inputs)
        };
        set.insert(current);
        dominators.insert(current, set);
    }
    dominators
}

/// Intersection of the dominator sets of the given nodes, starting from the
/// smallest set
fn intersect(
    dominators: &HashMap<GateId, HashSet<GateId>>,
    inputs: &[GateId],
) -> HashSet<GateId> {
    let smallest = inputs
        .iter()
        .min_by_key(|input| dominators[input].len())
        .expect("inputs are non-empty");
    let mut last = dominators[smallest].clone();
    for input in inputs {
        if last.is_empty() {
            break;
        }
        if input == smallest {
            continue;
        }
        let set = &dominators[input];
        last.retain(|elem| set.contains(elem));
    }
    last
}

/// All nodes of the maximum cone of `start`, in the chosen direction
pub fn cone_set(net: &GNet, start: GateId, forward: bool) -> HashSet<GateId> {
    let mut cone = HashSet::new();
    let mut bfs = VecDeque::new();
    bfs.push_back(start);
    while let Some(cur) = bfs.pop_front() {
        if !cone.insert(cur) {
            continue;
        }
        for node in next_nodes(net, cur, forward) {
            bfs.push_back(node);
        }
    }
    cone
}

/// All nodes of the cone of `start` bounded by `cut`; cut members are
/// included but not expanded
pub fn cone_set_to_cut(net: &GNet, start: GateId, cut: &Cut, forward: bool) -> HashSet<GateId> {
    let mut cone = HashSet::new();
    let mut bfs = VecDeque::new();
    bfs.push_back(start);
    while let Some(cur) = bfs.pop_front() {
        if !cone.insert(cur) || cut.contains(&cur) {
            continue;
        }
        for node in next_nodes(net, cur, forward) {
            bfs.push_back(node);
        }
    }
    cone
}

/// Minimum and maximum BFS distance from `start` to the members of `cut`
///
/// Cut members are frontier nodes and are never traversed through; other
/// nodes are expanded once. Returns `(min, max)`; a start that is itself in
/// the cut reports `(0, 0)`.
pub fn heights(net: &GNet, start: GateId, cut: &Cut) -> (i32, i32) {
    let mut min_height = i32::MAX;
    let mut max_height = -1;
    let mut bfs = VecDeque::new();
    let mut visited = HashSet::new();
    bfs.push_back((start, 0));
    while let Some((current, height)) = bfs.pop_front() {
        if cut.contains(&current) {
            min_height = min_height.min(height);
            max_height = max_height.max(height);
        } else {
            if !visited.insert(current) {
                continue;
            }
            for &input in net.gate(current).inputs() {
                bfs.push_back((input, height + 1));
            }
        }
    }
    (min_height, max_height)
}

/// Counts surviving fan-out while descending from a removed node; nodes
/// whose entire fan-out is gone are scheduled for erasure
struct LinksRemoveVisitor {
    start: GateId,
    removed: Vec<GateId>,
    removed_set: HashSet<GateId>,
}

impl LinksRemoveVisitor {
    fn new(start: GateId) -> LinksRemoveVisitor {
        LinksRemoveVisitor {
            start,
            removed: Vec::new(),
            removed_set: HashSet::from([start]),
        }
    }
}

impl Visitor for LinksRemoveVisitor {
    fn on_node_begin(&mut self, net: &GNet, node: GateId) -> VisitorFlag {
        if node == self.start {
            return VisitorFlag::Continue;
        }
        let alive = net
            .gate(node)
            .links()
            .iter()
            .filter(|l| !self.removed_set.contains(&l.target))
            .count();
        if alive == 0 {
            self.removed.push(node);
            self.removed_set.insert(node);
        }
        VisitorFlag::Continue
    }

    fn on_node_end(&mut self, _net: &GNet, _node: GateId) -> VisitorFlag {
        VisitorFlag::Continue
    }
}

/// Remove `start` and, recursively, every predecessor whose only remaining
/// consumers were removed as well
///
/// Consumers of `start` itself are rewired: OUT sinks are erased, other
/// gates lose the corresponding input.
pub fn rm_recursive(net: &mut GNet, start: GateId) {
    let mut visitor = LinksRemoveVisitor::new(start);
    Walker::new(net, &mut visitor).walk_cone(start, false);
    let removed = visitor.removed;

    let links = net.gate(start).links().to_vec();
    for link in links {
        let consumer = link.target;
        if net.gate(consumer).is_target() {
            net.erase_gate(consumer);
        } else {
            let gate = net.gate(consumer);
            let func = gate.func();
            let mut inputs = gate.inputs().to_vec();
            if let Some(pos) = inputs.iter().position(|&x| x == start) {
                inputs.remove(pos);
            }
            net.set_gate(consumer, func, &inputs);
        }
    }
    net.erase_gate(start);

    // `removed` is ordered consumers-first, so producers are erased last
    for gate in removed {
        net.erase_gate(gate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::generators::testcases;
    use crate::network::GateSymbol;

    #[test]
    fn test_check_cut() {
        let t = testcases::and_tree();
        let cut = Cut::from([t.a, t.b]);
        assert!(check_cut(&t.net, t.root, &cut).is_ok());

        let partial = Cut::from([t.a]);
        match check_cut(&t.net, t.root, &partial) {
            Err(Error::NotACut { gate, src }) => {
                assert_eq!(gate, t.root);
                assert!(t.inputs.contains(&src));
            }
            other => panic!("expected NotACut, got {other:?}"),
        }

        let trivial = Cut::from([t.root]);
        assert!(check_cut(&t.net, t.root, &trivial).is_ok());
    }

    #[test]
    fn test_find_dominators() {
        let d = testcases::diamond();
        let order = d.net.topological_order().unwrap();
        let dominators = find_dominators(&d.net, &order);

        assert_eq!(dominators[&d.i1], HashSet::from([d.i1]));
        assert_eq!(dominators[&d.x], HashSet::from([d.i1, d.x]));
        // both branches join: only the common input and the node itself remain
        assert_eq!(dominators[&d.y], HashSet::from([d.i1, d.y]));
    }

    #[test]
    fn test_cone_set() {
        let t = testcases::and_tree();
        let backward = cone_set(&t.net, t.root, false);
        assert_eq!(backward.len(), 7);
        assert!(!backward.contains(&t.out));

        let forward = cone_set(&t.net, t.a, true);
        assert_eq!(forward, HashSet::from([t.a, t.root, t.out]));

        let bounded = cone_set_to_cut(&t.net, t.root, &Cut::from([t.a, t.b]), false);
        assert_eq!(bounded, HashSet::from([t.root, t.a, t.b]));
    }

    #[test]
    fn test_heights() {
        let t = testcases::and_tree();
        let direct = Cut::from([t.a, t.b]);
        assert_eq!(heights(&t.net, t.root, &direct), (1, 1));

        let mixed = Cut::from([t.a, t.inputs[2], t.inputs[3]]);
        assert_eq!(heights(&t.net, t.root, &mixed), (1, 2));

        let trivial = Cut::from([t.root]);
        assert_eq!(heights(&t.net, t.root, &trivial), (0, 0));
    }

    #[test]
    fn test_rm_recursive_whole_net() {
        let t = testcases::and_tree();
        let mut net = t.net;
        rm_recursive(&mut net, t.root);
        assert_eq!(net.n_gates(), 0);
    }

    #[test]
    fn test_rm_recursive_keeps_shared_logic() {
        let t = testcases::and_tree();
        let mut net = t.net;
        // `a` gains a second consumer that must survive the removal
        net.add_out(t.a);
        rm_recursive(&mut net, t.root);

        // left: i1, i2, a and its new OUT
        assert_eq!(net.n_gates(), 4);
        assert!(net.contains(t.a));
        assert!(net.contains(t.inputs[0]));
        assert!(net.contains(t.inputs[1]));
        assert!(!net.contains(t.b));
        assert!(!net.contains(t.root));
        net.check();
    }

    #[test]
    fn test_rm_recursive_rewires_consumers() {
        let mut net = GNet::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let a = net.add_gate(GateSymbol::And, &[i0, i1]);
        let b = net.add_gate(GateSymbol::Or, &[a, i1]);
        net.add_out(b);

        rm_recursive(&mut net, a);
        // `b` survives with `a` stripped from its inputs; `i0` fed only `a`
        assert!(net.contains(b));
        assert_eq!(net.gate(b).inputs(), &[i1]);
        assert!(!net.contains(i0));
        assert!(!net.contains(a));
        net.check();
    }
}
