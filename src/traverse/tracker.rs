use std::fs;
use std::path::{Path, PathBuf};

use crate::cuts::Cut;
use crate::error::Error;
use crate::io::Dot;
use crate::network::{GNet, GateId};
use crate::traverse::visitor::{CutVisitor, Visitor, VisitorFlag};

/// Environment variable naming the directory for trace output
pub const HOME_VAR: &str = "KERF_HOME";

/// Wraps a [`CutVisitor`] and dumps a DOT snapshot of the net after every
/// visited node, for debugging walks step by step
///
/// Snapshots land in `$KERF_HOME/<sub_catalog>/onNodeEnd<n>_<gate>.dot`.
pub struct TrackerVisitor<'a, V> {
    sub_catalog: PathBuf,
    visitor: &'a mut V,
    counter: usize,
}

impl<'a, V: CutVisitor> TrackerVisitor<'a, V> {
    /// Wrap `visitor`, tracing into `$KERF_HOME/<sub_catalog>`
    pub fn new(sub_catalog: impl AsRef<Path>, visitor: &'a mut V) -> Result<Self, Error> {
        let home = std::env::var(HOME_VAR).map_err(|_| Error::HomeNotSet)?;
        let sub_catalog = Path::new(&home).join(sub_catalog);
        fs::create_dir_all(&sub_catalog)?;
        Ok(TrackerVisitor {
            sub_catalog,
            visitor,
            counter: 0,
        })
    }
}

impl<V: CutVisitor> Visitor for TrackerVisitor<'_, V> {
    fn on_node_begin(&mut self, net: &GNet, node: GateId) -> VisitorFlag {
        self.visitor.on_node_begin(net, node)
    }

    fn on_node_end(&mut self, net: &GNet, node: GateId) -> VisitorFlag {
        let path = self
            .sub_catalog
            .join(format!("onNodeEnd{}_{}.dot", self.counter, node));
        if let Err(err) = Dot::new(net).print_file(&path) {
            log::error!("failed to write {}: {}", path.display(), err);
        }
        self.counter += 1;
        self.visitor.on_node_end(net, node)
    }
}

impl<V: CutVisitor> CutVisitor for TrackerVisitor<'_, V> {
    fn on_cut(&mut self, net: &GNet, node: GateId, cut: &Cut) -> VisitorFlag {
        self.visitor.on_cut(net, node, cut)
    }
}
