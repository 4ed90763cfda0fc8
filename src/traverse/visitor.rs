use crate::cuts::Cut;
use crate::network::{GNet, GateId};

/// Flow control returned by every visitor callback
///
/// Walks interpret the flags as follows:
/// * `Continue` - proceed normally.
/// * `Skip` - in cut iteration, stop handling the remaining cuts of the
///   current node; elsewhere behaves like `Continue`.
/// * `FinishFurtherNodes` - in bounded walks, do not descend past the
///   current node.
/// * `FinishAllNodes` - abort the entire walk immediately; propagates
///   through nested walkers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorFlag {
    /// Proceed normally
    Continue,
    /// Stop handling the cuts of the current node
    Skip,
    /// Do not descend past the current node
    FinishFurtherNodes,
    /// Abort the entire walk
    FinishAllNodes,
}

/// Handler driven over the nodes of a walk
pub trait Visitor {
    /// Starts handling a traced node
    fn on_node_begin(&mut self, net: &GNet, node: GateId) -> VisitorFlag;

    /// Finishes handling a traced node
    fn on_node_end(&mut self, net: &GNet, node: GateId) -> VisitorFlag;
}

/// Handler additionally driven over every stored cut of each node
pub trait CutVisitor: Visitor {
    /// Handles one cut of the current node
    fn on_cut(&mut self, net: &GNet, node: GateId, cut: &Cut) -> VisitorFlag;
}
