use std::collections::{BTreeSet, HashMap, HashSet};

use crate::network::GateId;

/// A cut: an unordered set of gate identifiers
///
/// Equality is set equality; the ordered representation keeps hashing
/// order-independent and iteration deterministic.
pub type Cut = BTreeSet<GateId>;

/// The cuts of a single gate
pub type Cuts = HashSet<Cut>;

/// Per-gate cut sets produced by an enumeration pass
///
/// Within the set of one gate no two cuts are in a subset relation
/// (see [`find_cuts`](crate::cuts::find_cuts)), except in legacy mode.
#[derive(Debug, Clone, Default)]
pub struct CutStorage {
    /// Mapping from each enumerated gate to its cuts
    pub cuts: HashMap<GateId, Cuts>,
}

impl CutStorage {
    /// Create an empty storage
    pub fn new() -> CutStorage {
        CutStorage::default()
    }

    /// Cuts of one gate, if enumerated
    pub fn cuts_of(&self, gate: GateId) -> Option<&Cuts> {
        self.cuts.get(&gate)
    }

    /// Total number of stored cuts
    pub fn n_cuts(&self) -> usize {
        self.cuts.values().map(|c| c.len()).sum()
    }
}
