//! K-feasible cut enumeration

mod enumerate;
mod storage;

pub use enumerate::{find_cuts, CutsFindVisitor};
pub use storage::{Cut, CutStorage, Cuts};
