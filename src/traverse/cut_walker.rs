use std::collections::HashSet;

use crate::analysis::{cone_set, cone_set_to_cut};
use crate::cuts::{Cut, CutStorage};
use crate::error::Error;
use crate::network::{GNet, GateId};
use crate::traverse::visitor::{CutVisitor, VisitorFlag};
use crate::traverse::walker::{bounded_walk, frontier_walk};

/// Drives a [`CutVisitor`] over a net and, between `on_node_begin` and
/// `on_node_end` of each node, over the stored cuts of that node
///
/// During cut iteration `Continue` and `FinishFurtherNodes` proceed to the
/// next cut, while `Skip` and `FinishAllNodes` stop the iteration and are
/// reported as the node's flag.
pub struct CutWalker<'a, V> {
    net: &'a GNet,
    visitor: &'a mut V,
    storage: &'a CutStorage,
}

impl<'a, V: CutVisitor> CutWalker<'a, V> {
    /// * `net` - net to be traced.
    /// * `visitor` - node and cut handler.
    /// * `storage` - cuts of all nodes.
    pub fn new(net: &'a GNet, visitor: &'a mut V, storage: &'a CutStorage) -> CutWalker<'a, V> {
        CutWalker {
            net,
            visitor,
            storage,
        }
    }

    /// Trace the whole net in topological (or reverse-topological) order
    pub fn walk(&mut self, forward: bool) -> Result<(), Error> {
        let order = self.net.topological_order()?;
        self.walk_sequence(&order, forward);
        Ok(())
    }

    /// Trace an explicit node sequence, forward or reversed
    pub fn walk_sequence(&mut self, nodes: &[GateId], forward: bool) {
        let net = self.net;
        let storage = self.storage;
        let visitor = &mut *self.visitor;
        if forward {
            for &node in nodes {
                if call_cut_visitor(net, &mut *visitor, storage, node) == VisitorFlag::FinishAllNodes
                {
                    return;
                }
            }
        } else {
            for &node in nodes.iter().rev() {
                if call_cut_visitor(net, &mut *visitor, storage, node) == VisitorFlag::FinishAllNodes
                {
                    return;
                }
            }
        }
    }

    /// Trace the maximum cone of `start`
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
    /// vertex
    pub fn walk_cut_cone(&mut self, cut: &Cut, end: GateId, forward: bool) {
        let accessed = cone_set_to_cut(self.net, end, cut, forward);
        self.run_bounded(cut.iter().copied().collect(), accessed, !forward);
    }

    fn run_bounded(&mut self, seeds: Vec<GateId>, mut accessed: HashSet<GateId>, forward: bool) {
        let net = self.net;
        let storage = self.storage;
        let visitor = &mut *self.visitor;
        let mut call = |node| call_cut_visitor(net, &mut *visitor, storage, node);
        bounded_walk(net, seeds, &mut accessed, forward, &mut call);
    }

    /// Trace from a frontier of nodes; see [`Walker::walk_frontier`](crate::traverse::Walker::walk_frontier)
    pub fn walk_frontier<I>(&mut self, start: I, used: &HashSet<GateId>)
    where
        I: IntoIterator<Item = GateId>,
    {
        let net = self.net;
        let storage = self.storage;
        let visitor = &mut *self.visitor;
        let mut call = |node| call_cut_visitor(net, &mut *visitor, storage, node);
        frontier_walk(net, start.into_iter().collect(), used, true, &mut call);
    }
}

fn call_cut_visitor<V: CutVisitor>(
    net: &GNet,
    visitor: &mut V,
    storage: &CutStorage,
    node: GateId,
) -> VisitorFlag {
    let flag = visitor.on_node_begin(net, node);
    if flag != VisitorFlag::Continue {
        return flag;
    }

    if let Some(cuts) = storage.cuts_of(node) {
        for cut in cuts {
            match visitor.on_cut(net, node, cut) {
                VisitorFlag::Continue | VisitorFlag::FinishFurtherNodes => {}
                flag @ (VisitorFlag::FinishAllNodes | VisitorFlag::Skip) => return flag,
            }
        }
    }

    visitor.on_node_end(net, node)
}
