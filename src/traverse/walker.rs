use std::collections::{HashSet, VecDeque};

use crate::analysis::{cone_set, cone_set_to_cut, next_nodes};
use crate::cuts::Cut;
use crate::error::Error;
use crate::network::{GNet, GateId};
use crate::traverse::visitor::{Visitor, VisitorFlag};

/// Drives a [`Visitor`] over a net in topological order
///
/// All walks call `on_node_begin` and, if it returns
/// [`VisitorFlag::Continue`], `on_node_end` on each visited node.
pub struct Walker<'a, V> {
    net: &'a GNet,
    visitor: &'a mut V,
}

impl<'a, V: Visitor> Walker<'a, V> {
    /// * `net` - net to be traced.
    /// * `visitor` - node handler.
    pub fn new(net: &'a GNet, visitor: &'a mut V) -> Walker<'a, V> {
        Walker { net, visitor }
    }

    /// Trace the whole net in topological (or reverse-topological) order
    pub fn walk(&mut self, forward: bool) -> Result<(), Error> {
        let order = self.net.topological_order()?;
        self.walk_sequence(&order, forward);
        Ok(())
    }

    /// Trace an explicit node sequence, forward or reversed
    pub fn walk_sequence(&mut self, nodes: &[GateId], forward: bool) {
        if forward {
            for &node in nodes {
                if call_visitor(self.net, &mut *self.visitor, node) == VisitorFlag::FinishAllNodes {
                    return;
                }
            }
        } else {
            for &node in nodes.iter().rev() {
                if call_visitor(self.net, &mut *self.visitor, node) == VisitorFlag::FinishAllNodes {
                    return;
                }
            }
        }
    }

    /// Trace the maximum cone of `start`, from the vertex toward the
    /// sources (`forward = false`) or the targets (`forward = true`)
    pub fn walk_cone(&mut self, start: GateId, forward: bool) {
        let accessed = cone_set(self.net, start, forward);
        self.run_bounded(vec![start], accessed, forward);
    }

    /// Trace the cone between `start` and `cut`, from the vertex toward
    /// the cut
    pub fn walk_cone_cut(&mut self, start: GateId, cut: &Cut, forward: bool) {
        let accessed = cone_set_to_cut(self.net, start, cut, forward);
        self.run_bounded(vec![start], accessed, forward);
    }

    /// Trace the cone between `cut` and `end`, from the cut toward the
    /// vertex; nodes are visited in a topologically consistent order
    pub fn walk_cut_cone(&mut self, cut: &Cut, end: GateId, forward: bool) {
        let accessed = cone_set_to_cut(self.net, end, cut, forward);
        self.run_bounded(cut.iter().copied().collect(), accessed, !forward);
    }

    /// Trace from a frontier of nodes; neighbors in `used` are treated as
    /// already satisfied and do not block a visit
    pub fn walk_frontier<I>(&mut self, start: I, used: &HashSet<GateId>)
    where
        I: IntoIterator<Item = GateId>,
    {
        let net = self.net;
        let visitor = &mut *self.visitor;
        let mut call = |node| call_visitor(net, &mut *visitor, node);
        frontier_walk(net, start.into_iter().collect(), used, true, &mut call);
    }

    fn run_bounded(&mut self, seeds: Vec<GateId>, mut accessed: HashSet<GateId>, forward: bool) {
        let net = self.net;
        let visitor = &mut *self.visitor;
        let mut call = |node| call_visitor(net, &mut *visitor, node);
        bounded_walk(net, seeds, &mut accessed, forward, &mut call);
    }
}

pub(crate) fn call_visitor<V: Visitor>(net: &GNet, visitor: &mut V, node: GateId) -> VisitorFlag {
    let flag = visitor.on_node_begin(net, node);
    if flag != VisitorFlag::Continue {
        return flag;
    }
    visitor.on_node_end(net, node)
}

/// BFS over the `accessed` region, popping a node only once every
/// direction-relevant neighbor has been consumed
pub(crate) fn bounded_walk(
    net: &GNet,
    seeds: Vec<GateId>,
    accessed: &mut HashSet<GateId>,
    forward: bool,
    call: &mut dyn FnMut(GateId) -> VisitorFlag,
) {
    let mut bfs: VecDeque<GateId> = seeds.into();
    while let Some(&cur) = bfs.front() {
        if accessed.contains(&cur) {
            if neighbors_consumed(net, accessed, cur, forward) {
                accessed.remove(&cur);
                let flag = call(cur);
                match flag {
                    VisitorFlag::FinishAllNodes => return,
                    VisitorFlag::FinishFurtherNodes => continue,
                    VisitorFlag::Continue | VisitorFlag::Skip => {}
                }
                for node in next_nodes(net, cur, forward) {
                    bfs.push_back(node);
                }
                if flag == VisitorFlag::Skip {
                    continue;
                }
            } else {
                // revisit the blocking neighbors first; the current node is
                // re-enqueued once one of them is consumed
                for node in next_nodes(net, cur, !forward) {
                    if accessed.contains(&node) {
                        bfs.push_back(node);
                    }
                }
            }
        }
        bfs.pop_front();
    }
}

/// BFS from a frontier; `used` nodes never block a visit
pub(crate) fn frontier_walk(
    net: &GNet,
    seeds: VecDeque<GateId>,
    used: &HashSet<GateId>,
    forward: bool,
    call: &mut dyn FnMut(GateId) -> VisitorFlag,
) {
    let mut visited: HashSet<GateId> = HashSet::new();
    let mut bfs = seeds;
    while let Some(&cur) = bfs.front() {
        if !visited.contains(&cur) {
            if frontier_ready(net, &visited, used, cur, forward) {
                visited.insert(cur);
                let flag = call(cur);
                match flag {
                    VisitorFlag::FinishAllNodes => return,
                    VisitorFlag::FinishFurtherNodes => continue,
                    VisitorFlag::Continue | VisitorFlag::Skip => {}
                }
                for node in next_nodes(net, cur, forward) {
                    bfs.push_back(node);
                }
                if flag == VisitorFlag::Skip {
                    continue;
                }
            } else {
                for node in next_nodes(net, cur, !forward) {
                    if !visited.contains(&node) {
                        bfs.push_back(node);
                    }
                }
            }
        }
        bfs.pop_front();
    }
}

/// Whether no direction-relevant neighbor of `node` is still accessed
fn neighbors_consumed(net: &GNet, accessed: &HashSet<GateId>, node: GateId, forward: bool) -> bool {
    if forward {
        net.gate(node)
            .inputs()
            .iter()
            .all(|input| !accessed.contains(input))
    } else {
        net.gate(node)
            .links()
            .iter()
            .all(|link| !accessed.contains(&link.target))
    }
}

/// Whether every direction-relevant neighbor of `node` is visited or
/// assumed satisfied
fn frontier_ready(
    net: &GNet,
    visited: &HashSet<GateId>,
    used: &HashSet<GateId>,
    node: GateId,
    forward: bool,
) -> bool {
    if forward {
        net.gate(node)
            .inputs()
            .iter()
            .all(|input| visited.contains(input) || used.contains(input))
    } else {
        net.gate(node)
            .links()
            .iter()
            .all(|link| visited.contains(&link.target) || used.contains(&link.target))
    }
}
