use crate::cuts::storage::{Cut, CutStorage};
use crate::error::Error;
use crate::network::{GNet, GateId};
use crate::traverse::{Visitor, VisitorFlag, Walker};

/// Enumerates the K-feasible cuts of every gate into a [`CutStorage`]
///
/// Inverters are transparent: a NOT on an input is replaced by its own
/// driver, NOT gates enumerate nothing, and no cut ever contains one.
pub struct CutsFindVisitor<'a> {
    cut_size: usize,
    max_cuts: usize,
    storage: &'a mut CutStorage,
    legacy: bool,
}

impl<'a> CutsFindVisitor<'a> {
    /// Sentinel for `max_cuts` lifting the per-gate cap
    pub const ALL_CUTS: usize = 0;

    /// * `cut_size` - maximum number of leaves per cut.
    /// * `max_cuts` - soft cap on the cuts of a single gate, checked after
    ///   each insertion; [`CutsFindVisitor::ALL_CUTS`] lifts it.
    /// * `legacy` - keep every feasible combination instead of pruning
    ///   subsumed cuts; kept for diagnostic comparison.
    pub fn new(
        cut_size: usize,
        storage: &'a mut CutStorage,
        max_cuts: usize,
        legacy: bool,
    ) -> CutsFindVisitor<'a> {
        CutsFindVisitor {
            cut_size,
            max_cuts,
            storage,
            legacy,
        }
    }

    /// Enumerate `vertex` and any not-yet-enumerated effective input first
    ///
    /// The walker already delivers nodes in topological order; the explicit
    /// work stack only fires for inputs reached through collapsed
    /// inverters.
    fn ensure_cuts(&mut self, net: &GNet, vertex: GateId) {
        let mut stack = vec![vertex];
        while let Some(&v) = stack.last() {
            if self.storage.cuts_of(v).is_some_and(|c| !c.is_empty()) {
                stack.pop();
                continue;
            }
            let missing: Vec<GateId> = net
                .gate(v)
                .inputs()
                .iter()
                .map(|&input| effective_input(net, input))
                .filter(|&input| self.storage.cuts_of(input).is_none_or(|c| c.is_empty()))
                .collect();
            if missing.is_empty() {
                stack.pop();
                self.enumerate_node(net, v);
            } else {
                stack.extend(missing);
            }
        }
    }

    fn enumerate_node(&mut self, net: &GNet, vertex: GateId) {
        // the trivial cut comes first and can never be pruned
        self.storage
            .cuts
            .entry(vertex)
            .or_default()
            .insert(Cut::from([vertex]));

        let inputs: Vec<GateId> = net
            .gate(vertex)
            .inputs()
            .iter()
            .map(|&input| effective_input(net, input))
            .collect();
        if inputs.is_empty() {
            return;
        }

        // materialized in a stable order so runs are reproducible
        let input_cuts: Vec<Vec<Cut>> = inputs
            .iter()
            .map(|input| {
                let mut cuts: Vec<Cut> = self.storage.cuts[input].iter().cloned().collect();
                cuts.sort();
                cuts
            })
            .collect();

        let mut cursors = vec![0usize; input_cuts.len()];
        loop {
            let collected = collect_union(&cursors, &input_cuts, self.cut_size);

            let mut increment_all = false;
            if let Some(collected) = collected {
                let inserted = if self.legacy {
                    self.insert_plain(vertex, collected)
                } else {
                    self.insert_pruned(vertex, collected, &mut increment_all)
                };
                if !inserted {
                    // soft cap reached: remaining combinations are skipped
                    return;
                }
            }

            if increment_all {
                // a single-node cut dominates whole slots; step every cursor
                let mut advanced = false;
                for (slot, cursor) in cursors.iter_mut().enumerate() {
                    *cursor += 1;
                    if *cursor == input_cuts[slot].len() {
                        *cursor = 0;
                    } else {
                        advanced = true;
                    }
                }
                if !advanced {
                    break;
                }
            } else {
                let mut slot = 0;
                while slot < cursors.len() {
                    cursors[slot] += 1;
                    if cursors[slot] < input_cuts[slot].len() {
                        break;
                    }
                    cursors[slot] = 0;
                    slot += 1;
                }
                if slot == cursors.len() {
                    break;
                }
            }
        }
    }

    /// Legacy insertion: no pruning. Returns false once the cap trips.
    fn insert_plain(&mut self, vertex: GateId, collected: Cut) -> bool {
        let cuts = self.storage.cuts.entry(vertex).or_default();
        cuts.insert(collected);
        self.max_cuts == Self::ALL_CUTS || cuts.len() <= self.max_cuts
    }

    /// Subsumption insertion keeping the cut set an anti-chain under ⊆.
    /// Returns false once the cap trips.
    fn insert_pruned(&mut self, vertex: GateId, collected: Cut, increment_all: &mut bool) -> bool {
        let cuts = self.storage.cuts.entry(vertex).or_default();

        let mut dominated = false;
        let mut to_remove = Vec::new();
        for existing in cuts.iter() {
            if existing.len() > collected.len() {
                if collected.is_subset(existing) {
                    to_remove.push(existing.clone());
                }
            } else if existing.is_subset(&collected) {
                dominated = true;
                break;
            }
        }
        if dominated {
            return true;
        }

        for cut in &to_remove {
            cuts.remove(cut);
        }
        *increment_all = collected.len() == 1;
        cuts.insert(collected);
        self.max_cuts == Self::ALL_CUTS || cuts.len() <= self.max_cuts
    }
}

impl Visitor for CutsFindVisitor<'_> {
    fn on_node_begin(&mut self, net: &GNet, node: GateId) -> VisitorFlag {
        if !net.gate(node).is_not() {
            self.ensure_cuts(net, node);
        }
        VisitorFlag::Continue
    }

    fn on_node_end(&mut self, _net: &GNet, _node: GateId) -> VisitorFlag {
        VisitorFlag::Continue
    }
}

/// Driver of an input, looking through any chain of inverters
fn effective_input(net: &GNet, mut id: GateId) -> GateId {
    while net.gate(id).is_not() {
        id = net.gate(id).inputs()[0];
    }
    id
}

/// Union of the cuts under the cursors, or None when it exceeds `cut_size`
fn collect_union(cursors: &[usize], input_cuts: &[Vec<Cut>], cut_size: usize) -> Option<Cut> {
    let mut collected = Cut::new();
    for (slot, &cursor) in cursors.iter().enumerate() {
        collected.extend(input_cuts[slot][cursor].iter().copied());
        if collected.len() > cut_size {
            return None;
        }
    }
    Some(collected)
}

/// Enumerate the K-feasible cuts of every non-NOT gate of the net
///
/// * `cut_size` - maximum cut size K, at least 1.
/// * `max_cuts` - per-gate soft cap; 0 means unlimited.
/// * `legacy` - disable subsumption pruning (diagnostic mode).
pub fn find_cuts(
    net: &GNet,
    cut_size: usize,
    max_cuts: usize,
    legacy: bool,
) -> Result<CutStorage, Error> {
    if cut_size == 0 {
        return Err(Error::InvalidCutSize);
    }
    let mut storage = CutStorage::new();
    let mut visitor = CutsFindVisitor::new(cut_size, &mut storage, max_cuts, legacy);
    Walker::new(net, &mut visitor).walk(true)?;
    Ok(storage)
}
