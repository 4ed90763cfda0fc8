//! Cancellable traversals of a net driven by visitors

mod cut_walker;
mod tracker;
mod visitor;
mod walker;

pub use cut_walker::CutWalker;
pub use tracker::{TrackerVisitor, HOME_VAR};
pub use visitor::{CutVisitor, Visitor, VisitorFlag};
pub use walker::Walker;
