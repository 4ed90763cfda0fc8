//! Extraction of the sub-net between a cut and a root

use std::collections::HashMap;
use std::rc::Rc;

use crate::cuts::Cut;
use crate::network::{GNet, GateId, GateSymbol};
use crate::traverse::{Visitor, VisitorFlag, Walker};

/// An extracted cone together with the ordered identifiers of its inputs
///
/// The i-th binding is the cone-net gate standing for the i-th leaf of the
/// original cut under the ordering the caller requested.
#[derive(Debug, Clone)]
pub struct BoundGNet {
    /// The standalone cone net, with a single OUT sink
    pub net: Rc<GNet>,
    /// Cone-net inputs, one per ordered leaf
    pub input_bindings: Vec<GateId>,
}

/// Builds a fresh net for the cone between a cut and a root
///
/// Frontier nodes of the cut become IN gates, except constants, which are
/// reproduced. The root receives an OUT sink unless it already is one.
pub struct ConeVisitor<'a> {
    cut: &'a Cut,
    root: GateId,
    net: GNet,
    // old gate -> gate of the cone net
    match_map: HashMap<GateId, GateId>,
    result_cut: Cut,
}

impl<'a> ConeVisitor<'a> {
    /// * `cut` - leaves bounding the cone.
    /// * `root` - node the cone is extracted for.
    pub fn new(cut: &'a Cut, root: GateId) -> ConeVisitor<'a> {
        ConeVisitor {
            cut,
            root,
            net: GNet::new(),
            match_map: HashMap::new(),
            result_cut: Cut::new(),
        }
    }

    /// The cone net, the old-to-new correspondence and the effectively used
    /// subset of the cut
    pub fn into_parts(self) -> (GNet, HashMap<GateId, GateId>, Cut) {
        (self.net, self.match_map, self.result_cut)
    }

    /// Nonredundant subset of the cut actually feeding the cone
    pub fn result_cut(&self) -> &Cut {
        &self.result_cut
    }
}

impl Visitor for ConeVisitor<'_> {
    fn on_node_begin(&mut self, net: &GNet, node: GateId) -> VisitorFlag {
        let gate = net.gate(node);
        let signals: Vec<GateId> = gate
            .inputs()
            .iter()
            .filter_map(|input| self.match_map.get(input).copied())
            .collect();

        if self.cut.contains(&node) && signals.is_empty() {
            // frontier: a free input, or the original constant
            let func = if gate.is_value() {
                gate.func()
            } else {
                GateSymbol::In
            };
            let new_gate = self.net.add_gate(func, &[]);
            self.match_map.insert(node, new_gate);
            self.result_cut.insert(node);
        } else {
            let new_gate = self.net.add_gate(gate.func(), &signals);
            self.match_map.insert(node, new_gate);
        }

        if node == self.root {
            if gate.func() != GateSymbol::Out {
                self.net.add_out(self.match_map[&node]);
            }
            return VisitorFlag::FinishAllNodes;
        }
        VisitorFlag::Continue
    }

    fn on_node_end(&mut self, _net: &GNet, _node: GateId) -> VisitorFlag {
        VisitorFlag::Continue
    }
}

/// Extract the cone of `root` above `cut`, binding its inputs in the order
/// given by `order`
///
/// Every node of `order` must lie on a path of the cone; use
/// [`ConeVisitor`] directly to detect over-approximated cuts first.
pub fn extract_cone(net: &GNet, root: GateId, cut: &Cut, order: &[GateId]) -> BoundGNet {
    let mut visitor = ConeVisitor::new(cut, root);
    Walker::new(net, &mut visitor).walk_cut_cone(cut, root, false);
    let (cone, match_map, _) = visitor.into_parts();
    let input_bindings = order.iter().map(|gate| match_map[gate]).collect();
    BoundGNet {
        net: Rc::new(cone),
        input_bindings,
    }
}

/// Extract the cone of `root` using the order itself as the cut
pub fn extract_cone_ordered(net: &GNet, root: GateId, order: &[GateId]) -> BoundGNet {
    let cut: Cut = order.iter().copied().collect();
    let mut visitor = ConeVisitor::new(&cut, root);
    Walker::new(net, &mut visitor).walk_cut_cone(&cut, root, false);
    let (cone, match_map, _) = visitor.into_parts();
    let input_bindings = order.iter().map(|gate| match_map[gate]).collect();
    BoundGNet {
        net: Rc::new(cone),
        input_bindings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::generators::testcases;

    #[test]
    fn test_extract_and_tree() {
        let t = testcases::and_tree();
        let cut = Cut::from([t.a, t.b]);
        let order = [t.a, t.b];
        let bound = extract_cone(&t.net, t.root, &cut, &order);

        // 2 inputs + 1 AND + 1 OUT
        assert_eq!(bound.net.n_gates(), 4);
        assert_eq!(bound.net.n_source_links(), 2);
        assert_eq!(bound.net.n_target_links(), 1);
        assert_eq!(bound.input_bindings.len(), 2);
        for &binding in &bound.input_bindings {
            assert_eq!(bound.net.gate(binding).func(), GateSymbol::In);
        }
        bound.net.check();
    }

    #[test]
    fn test_extract_trivial() {
        let t = testcases::and_tree();
        let cut = Cut::from([t.root]);
        let bound = extract_cone(&t.net, t.root, &cut, &[t.root]);
        // the root collapses to one free input plus the OUT sink
        assert_eq!(bound.net.n_gates(), 2);
        assert_eq!(bound.net.n_source_links(), 1);
    }

    #[test]
    fn test_over_approximated_cut() {
        let t = testcases::and_tree();
        // i1 and i2 are hidden behind a; only a and b are effective
        let cut = Cut::from([t.inputs[0], t.inputs[1], t.a, t.b]);
        let mut visitor = ConeVisitor::new(&cut, t.root);
        Walker::new(&t.net, &mut visitor).walk_cut_cone(&cut, t.root, false);

        assert_eq!(visitor.result_cut(), &Cut::from([t.a, t.b]));
        let (cone, _, result) = visitor.into_parts();
        assert!(result.len() < cut.len());
        assert_eq!(cone.n_gates(), 4);
        assert_eq!(cone.n_source_links(), 2);
    }

    #[test]
    fn test_constants_are_reproduced() {
        let c = testcases::const_mix();
        let cut = Cut::from([c.zero, c.one, c.i1]);
        let order: Vec<GateId> = cut.iter().copied().collect();
        let bound = extract_cone(&c.net, c.root, &cut, &order);

        let mut has_zero = false;
        let mut has_one = false;
        let mut has_in = false;
        for source in bound.net.sources() {
            let gate = bound.net.gate(source);
            has_zero |= gate.func() == GateSymbol::Zero;
            has_one |= gate.func() == GateSymbol::One;
            has_in |= gate.func() == GateSymbol::In;
        }
        assert!(has_zero);
        assert!(has_one);
        assert!(has_in);
    }

    #[test]
    fn test_extract_through_inverter() {
        let n = testcases::inverter_and();
        let cut = Cut::from([n.i1, n.i2]);
        let order = [n.i1, n.i2];
        let bound = extract_cone(&n.net, n.b, &cut, &order);

        // the inverter is part of the cone: IN, IN, NOT, AND, OUT
        assert_eq!(bound.net.n_gates(), 5);
        assert_eq!(bound.net.n_source_links(), 2);
        let has_not = bound.net.gates().any(|(_, g)| g.is_not());
        assert!(has_not);
    }
}
