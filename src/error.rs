use thiserror::Error;

use crate::network::{GateId, GateSymbol};

/// Errors reported by the analysis passes and the readers
#[derive(Debug, Error)]
pub enum Error {
    /// Cut enumeration requires a cut size of at least 1
    #[error("cut size must be at least 1")]
    InvalidCutSize,

    /// The net is not a DAG; carries one gate on a cycle
    #[error("combinational loop involving gate {0}")]
    CombinationalLoop(GateId),

    /// A claimed cut lets a source through; carries the offending source
    #[error("no cut for gate {gate}: source {src} is reachable")]
    NotACut { gate: GateId, src: GateId },

    /// A cone input gate is not bound to a truth-table variable
    #[error("cone input {0} is not bound to a variable")]
    UnboundInput(GateId),

    /// A cone contains a gate without combinational semantics
    #[error("gate {gate} with function {func} has no combinational semantics")]
    NoSemantics { gate: GateId, func: GateSymbol },

    /// A cone is bound to more inputs than a truth table supports
    #[error("cone is bound to {0} inputs, at most 6 are supported")]
    TooManyInputs(usize),

    /// A cone has no output gate to read the truth table from
    #[error("cone has no output gate")]
    MissingOutput,

    /// The tracing home directory is not configured
    #[error("KERF_HOME is not set")]
    HomeNotSet,

    /// Malformed input file
    #[error("parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },

    /// Underlying I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
